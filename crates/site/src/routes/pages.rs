//! Content-managed standalone pages (donate, volunteer).
//!
//! These routes are fixed URLs whose body is editor-controlled. A page the
//! editors have not published yet is a 404, same as a bad slug.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::services::cms::Page;
use crate::state::AppState;

/// Standalone content page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/content.html")]
pub struct ContentPageTemplate {
    pub page: Page,
}

/// Display the donate page.
#[instrument(skip(state))]
pub async fn donate(State(state): State<AppState>) -> Result<ContentPageTemplate> {
    render_page(&state, "donate").await
}

/// Display the volunteer page.
#[instrument(skip(state))]
pub async fn volunteer(State(state): State<AppState>) -> Result<ContentPageTemplate> {
    render_page(&state, "volunteer").await
}

async fn render_page(state: &AppState, slug: &str) -> Result<ContentPageTemplate> {
    let page = match state.cms().page(slug).await {
        Ok(Some(page)) => page,
        Ok(None) => return Err(AppError::NotFound(format!("page {slug}"))),
        Err(e) => {
            tracing::error!(error = %e, slug = %slug, "failed to fetch page");
            return Err(AppError::NotFound(format!("page {slug}")));
        }
    };

    Ok(ContentPageTemplate { page })
}
