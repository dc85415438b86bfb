#![allow(deprecated)]
use cucumber::{given, then, when};

use crate::ForumWorld;

use super::common_steps::{open_db, record_response, server_url};

// ---------------------------------------------------------------------------
// Given steps
// ---------------------------------------------------------------------------

/// Seed `count` topics titled "Topic 1" through "Topic N" under a fresh user.
#[given(expr = "{int} topics posted by {string}")]
async fn n_topics_posted_by(world: &mut ForumWorld, count: i64, username: String) {
    let db = open_db(world);
    let hash = agora::auth::hash_password("hunter2").expect("hashing failed");
    let token = uuid::Uuid::new_v4().to_string();
    let user = db
        .insert_user(&username, &hash, &token)
        .expect("failed to seed user");

    for i in 1..=count {
        let topic = db
            .insert_topic(&format!("Topic {i}"), "seeded text", user.id)
            .expect("failed to seed topic");
        world.topic_ids.insert(format!("Topic {i}"), topic.id);
    }
}

// ---------------------------------------------------------------------------
// When / Then steps
// ---------------------------------------------------------------------------

#[when(expr = "I open page {string} of the index")]
async fn open_index_page(world: &mut ForumWorld, page: String) {
    let response = world
        .client
        .get(server_url(world, &format!("/?page={page}")))
        .send()
        .await
        .expect("request failed");
    record_response(world, response).await;
}

#[then(expr = "the listing shows {int} topics")]
async fn listing_shows_n_topics(world: &mut ForumWorld, expected: i64) {
    let shown = world.last_body.matches("<li><a href=\"/topic/").count();
    assert_eq!(
        shown, expected as usize,
        "unexpected listing size, body: {}",
        world.last_body
    );
}

#[then(expr = "the pager shows {string}")]
async fn pager_shows(world: &mut ForumWorld, label: String) {
    assert!(
        world.last_body.contains(&label),
        "pager label {label:?} missing: {}",
        world.last_body
    );
}

#[then("there is a next page link")]
async fn has_next_page_link(world: &mut ForumWorld) {
    assert!(
        world.last_body.contains("Next &raquo;"),
        "expected a next page link"
    );
}

#[then("there is no next page link")]
async fn has_no_next_page_link(world: &mut ForumWorld) {
    assert!(
        !world.last_body.contains("Next &raquo;"),
        "unexpected next page link"
    );
}

#[then("there is a previous page link")]
async fn has_previous_page_link(world: &mut ForumWorld) {
    assert!(
        world.last_body.contains("&laquo; Previous"),
        "expected a previous page link"
    );
}

#[then("there is no previous page link")]
async fn has_no_previous_page_link(world: &mut ForumWorld) {
    assert!(
        !world.last_body.contains("&laquo; Previous"),
        "unexpected previous page link"
    );
}
