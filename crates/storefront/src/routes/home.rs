//! Home page: hero slider plus the course grid.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::{IntoResponse, Response};
use tower_sessions::Session;
use tracing::instrument;

use crate::catalog::{self, Course};
use crate::error::AppError;
use crate::filters;

use super::PageContext;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub ctx: PageContext,
    pub featured: &'static [Course],
    pub courses: &'static [Course],
}

/// Display the home page.
#[instrument(skip(session))]
pub async fn show(session: &Session) -> Result<Response, AppError> {
    let ctx = PageContext::gather(session).await?;

    Ok(HomeTemplate {
        ctx,
        featured: catalog::featured(),
        courses: catalog::all(),
    }
    .into_response())
}
