//! Crawler endpoints: robots.txt and sitemap.xml.

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::state::AppState;

/// Static routes always present in the sitemap.
const STATIC_ROUTES: &[&str] = &["/", "/exhibits", "/donate", "/volunteer", "/contact"];

/// Serve robots.txt.
///
/// The studio and the admin API are kept out of crawlers; everything else
/// is public.
pub async fn robots_txt(State(state): State<AppState>) -> impl IntoResponse {
    let body = format!(
        "User-agent: *\n\
         Disallow: /studio/\n\
         Disallow: /api/\n\
         \n\
         Sitemap: {}/sitemap.xml\n",
        state.config().base_url.trim_end_matches('/'),
    );

    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body)
}

/// Serve sitemap.xml.
///
/// Exhibit URLs come from the content API; an outage degrades to the
/// static routes only.
#[instrument(skip(state))]
pub async fn sitemap_xml(State(state): State<AppState>) -> impl IntoResponse {
    let base = state.config().base_url.trim_end_matches('/').to_string();

    let slugs = state.cms().exhibit_slugs().await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to fetch exhibit slugs for sitemap");
        Vec::new()
    });

    let mut body = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for route in STATIC_ROUTES {
        body.push_str(&format!("  <url><loc>{base}{route}</loc></url>\n"));
    }
    for slug in slugs {
        body.push_str(&format!("  <url><loc>{base}/exhibits/{slug}</loc></url>\n"));
    }
    body.push_str("</urlset>\n");

    ([(header::CONTENT_TYPE, "application/xml")], body)
}
