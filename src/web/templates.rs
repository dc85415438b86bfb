use askama::Template;
use axum::response::Html;

use crate::models::Topic;
use crate::pagination::PageInfo;

use super::errors::AppError;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub username: Option<String>,
    pub page: PageInfo<Topic>,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate;

#[derive(Template)]
#[template(path = "signup.html")]
pub struct SignupTemplate;

#[derive(Template)]
#[template(path = "topic_create.html")]
pub struct TopicCreateTemplate {
    pub username: String,
    pub csrf_token: String,
}

#[derive(Template)]
#[template(path = "topic_detail.html")]
pub struct TopicDetailTemplate {
    pub username: Option<String>,
    pub topic: Topic,
    pub author_name: String,
    pub is_author: bool,
}

#[derive(Template)]
#[template(path = "topic_edit.html")]
pub struct TopicEditTemplate {
    pub username: String,
    pub topic: Topic,
}

#[derive(Template)]
#[template(path = "topic_delete.html")]
pub struct TopicDeleteTemplate {
    pub username: String,
    pub topic: Topic,
}

/// Render a template to a full HTML response.
pub fn render<T: Template>(template: &T) -> Result<Html<String>, AppError> {
    template
        .render()
        .map(Html)
        .map_err(|e| AppError::Internal(format!("template render failed: {e}")))
}
