//! Front-end static assets.

use std::path::Path;

use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

/// `/` serves `index.html`; `/static/*` serves the rest of the directory verbatim.
pub fn routes(static_dir: &Path) -> Router {
    Router::new()
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .nest_service("/static", ServeDir::new(static_dir))
}
