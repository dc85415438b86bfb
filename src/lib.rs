/// Password hashing and verification.
pub mod auth;
/// Single-use CSRF token store, redis-backed or in-process.
pub mod csrf;
/// Database layer: open, migrate, user and topic CRUD.
pub mod db;
/// Data types: User, Topic.
pub mod models;
/// Fixed-size page windows over the topic listing.
pub mod pagination;
/// Axum-based web server and router.
pub mod web;
