//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::filters;
use crate::middleware::OptionalMember;
use crate::services::cms::Exhibit;
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    /// Exhibits flagged for the home page.
    pub featured: Vec<Exhibit>,
    /// Whether a member is signed in (switches the nav).
    pub signed_in: bool,
}

/// Display the home page.
///
/// A content API outage degrades to an empty featured section rather than
/// an error page.
#[instrument(skip(state, member))]
pub async fn home(
    State(state): State<AppState>,
    OptionalMember(member): OptionalMember,
) -> impl IntoResponse {
    let featured = state.cms().featured_exhibits().await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to fetch featured exhibits");
        Vec::new()
    });

    HomeTemplate {
        featured,
        signed_in: member.is_some(),
    }
}
