use axum::extract::{Form, Path, Query, State};
use axum::response::{Html, Redirect};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::db::Database;
use crate::models::{Topic, User};
use crate::pagination::{self, Paginator};

use super::AppState;
use super::errors::AppError;
use super::session;
use super::templates::{
    self, IndexTemplate, LoginTemplate, SignupTemplate, TopicCreateTemplate, TopicDeleteTemplate,
    TopicDetailTemplate, TopicEditTemplate,
};

#[derive(Deserialize)]
pub struct IndexParams {
    /// Raw so that garbage degrades to page 1 instead of a 400.
    page: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
}

#[derive(Deserialize)]
pub struct SignupForm {
    username: String,
    password: String,
    confirm_password: String,
}

#[derive(Deserialize)]
pub struct TopicCreateForm {
    csrf_token: String,
    title: String,
    text: String,
}

#[derive(Deserialize)]
pub struct TopicEditForm {
    title: String,
    text: String,
}

/// Paginated topic listing, newest first.
pub async fn index(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<IndexParams>,
) -> Result<Html<String>, AppError> {
    let number = pagination::requested_page(params.page.as_deref());

    let (username, page) = state.with_db(|db| {
        let username = session::resolve(db, &jar)?.map(|u| u.username);
        let paginator = Paginator::new(db.count_topics().map_err(AppError::Internal)?);
        let topics = db
            .list_topics_page(pagination::PAGE_SIZE, paginator.offset(number))
            .map_err(AppError::Internal)?;
        Ok((username, paginator.page(number, topics)))
    })?;

    templates::render(&IndexTemplate { username, page })
}

pub async fn login_form() -> Result<Html<String>, AppError> {
    templates::render(&LoginTemplate)
}

pub async fn login_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(CookieJar, Redirect), AppError> {
    let (user, token) = state.with_db(|db| session::login(db, &form.username, &form.password))?;

    tracing::info!(username = %user.username, "user logged in");
    Ok((jar.add(session::session_cookie(token)), Redirect::to("/")))
}

pub async fn signup_form() -> Result<Html<String>, AppError> {
    templates::render(&SignupTemplate)
}

pub async fn signup_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<SignupForm>,
) -> Result<(CookieJar, Redirect), AppError> {
    let (user, token) = state.with_db(|db| {
        session::signup(db, &form.username, &form.password, &form.confirm_password)
    })?;

    tracing::info!(username = %user.username, "account created");
    Ok((jar.add(session::session_cookie(token)), Redirect::to("/")))
}

/// Issue a CSRF token for the current user and embed it in the form.
pub async fn topic_create_form(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Html<String>, AppError> {
    let user = state
        .with_db(|db| session::resolve(db, &jar))?
        .ok_or(AppError::LoginRequired)?;

    let csrf_token = state
        .csrf
        .issue(&user.username)
        .await
        .map_err(AppError::Internal)?;

    templates::render(&TopicCreateTemplate {
        username: user.username,
        csrf_token,
    })
}

/// Commit a new topic. The submitted CSRF token must verify against the
/// user who is posting, not whoever it was issued to.
pub async fn topic_create_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<TopicCreateForm>,
) -> Result<Redirect, AppError> {
    let user = state
        .with_db(|db| session::resolve(db, &jar))?
        .ok_or(AppError::LoginRequired)?;

    let accepted = state
        .csrf
        .verify(&form.csrf_token, &user.username)
        .await
        .map_err(AppError::Internal)?;
    if !accepted {
        tracing::warn!(username = %user.username, "rejected topic submission: bad CSRF token");
        return Err(AppError::CsrfRejected);
    }

    let topic = state.with_db(|db| {
        db.insert_topic(&form.title, &form.text, user.id)
            .map_err(AppError::Internal)
    })?;
    tracing::info!(topic_id = topic.id, author = %user.username, "topic created");
    Ok(Redirect::to("/"))
}

pub async fn topic_detail(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(topic_id): Path<i64>,
) -> Result<Html<String>, AppError> {
    let (user, topic, author_name) = state.with_db(|db| {
        let user = session::resolve(db, &jar)?;
        let topic = db
            .get_topic(topic_id)
            .map_err(AppError::Internal)?
            .ok_or_else(|| AppError::NotFound(format!("topic not found: {topic_id}")))?;
        let author = db
            .get_user(topic.author_id)
            .map_err(AppError::Internal)?
            .ok_or_else(|| AppError::Internal(format!("topic {topic_id} has no author row")))?;
        Ok((user, topic, author.username))
    })?;

    let is_author = user.as_ref().is_some_and(|u| u.id == topic.author_id);
    templates::render(&TopicDetailTemplate {
        username: user.map(|u| u.username),
        topic,
        author_name,
        is_author,
    })
}

pub async fn topic_edit_form(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(topic_id): Path<i64>,
) -> Result<Html<String>, AppError> {
    let (user, topic) = state.with_db(|db| authorize_author(db, &jar, topic_id))?;
    templates::render(&TopicEditTemplate {
        username: user.username,
        topic,
    })
}

pub async fn topic_edit_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(topic_id): Path<i64>,
    Form(form): Form<TopicEditForm>,
) -> Result<Redirect, AppError> {
    let user = state.with_db(|db| {
        let (user, topic) = authorize_author(db, &jar, topic_id)?;
        db.update_topic(topic.id, &form.title, &form.text)
            .map_err(AppError::Internal)?;
        Ok(user)
    })?;

    tracing::info!(topic_id, author = %user.username, "topic edited");
    Ok(Redirect::to(&format!("/topic/{topic_id}")))
}

pub async fn topic_delete_form(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(topic_id): Path<i64>,
) -> Result<Html<String>, AppError> {
    let (user, topic) = state.with_db(|db| authorize_author(db, &jar, topic_id))?;
    templates::render(&TopicDeleteTemplate {
        username: user.username,
        topic,
    })
}

pub async fn topic_delete_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(topic_id): Path<i64>,
) -> Result<Redirect, AppError> {
    let user = state.with_db(|db| {
        let (user, topic) = authorize_author(db, &jar, topic_id)?;
        db.delete_topic(topic.id).map_err(AppError::Internal)?;
        Ok(user)
    })?;

    tracing::info!(topic_id, author = %user.username, "topic deleted");
    Ok(Redirect::to("/"))
}

/// Edit/delete gauntlet. A session must resolve and it must belong to the
/// topic's author; anonymous and non-author callers are silently bounced
/// back to the index. A missing topic is a 404.
fn authorize_author(
    db: &Database,
    jar: &CookieJar,
    topic_id: i64,
) -> Result<(User, Topic), AppError> {
    let Some(user) = session::resolve(db, jar)? else {
        tracing::warn!(topic_id, "rejected topic mutation: no session");
        return Err(AppError::Forbidden);
    };
    let topic = db
        .get_topic(topic_id)
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound(format!("topic not found: {topic_id}")))?;
    if user.id != topic.author_id {
        tracing::warn!(topic_id, username = %user.username, "rejected topic mutation: not the author");
        return Err(AppError::Forbidden);
    }
    Ok((user, topic))
}
