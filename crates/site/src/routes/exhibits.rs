//! Exhibit listing and detail route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::services::cms::Exhibit;
use crate::state::AppState;

/// Exhibit listing template.
#[derive(Template, WebTemplate)]
#[template(path = "exhibits/index.html")]
pub struct ExhibitIndexTemplate {
    pub exhibits: Vec<Exhibit>,
}

/// Exhibit detail template.
#[derive(Template, WebTemplate)]
#[template(path = "exhibits/show.html")]
pub struct ExhibitShowTemplate {
    pub exhibit: Exhibit,
}

/// Display the exhibit listing.
///
/// Degrades to an empty listing if the content API is unavailable.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    let exhibits = state.cms().exhibits().await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to fetch exhibit listing");
        Vec::new()
    });

    ExhibitIndexTemplate { exhibits }
}

/// Display a single exhibit.
///
/// An unpublished slug and a content API failure both render as 404; a
/// detail page has nothing sensible to show without the document.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<ExhibitShowTemplate> {
    let exhibit = match state.cms().exhibit(&slug).await {
        Ok(Some(exhibit)) => exhibit,
        Ok(None) => return Err(AppError::NotFound(format!("exhibit {slug}"))),
        Err(e) => {
            tracing::error!(error = %e, slug = %slug, "failed to fetch exhibit");
            return Err(AppError::NotFound(format!("exhibit {slug}")));
        }
    };

    Ok(ExhibitShowTemplate { exhibit })
}
