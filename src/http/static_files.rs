//! Static page and asset serving for the front door.

use std::path::{Component, Path, PathBuf};

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::{debug, error};

/// Page served when no static resource matches a GET path.
const NOT_FOUND_PAGE: &str = "error.html";

/// Serve a named HTML page from the static root with the given status.
pub(crate) async fn page(root: &Path, name: &str, status: StatusCode) -> Response {
    match tokio::fs::read(root.join(name)).await {
        Ok(bytes) => (status, [(header::CONTENT_TYPE, "text/html")], bytes).into_response(),
        Err(e) => {
            error!(page = name, error = %e, "Static page unreadable");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Serve an arbitrary GET path from the static root.
///
/// A matching regular file is streamed with a content type inferred
/// from its extension (default `text/plain`); anything else gets the
/// 404 page. Paths with non-normal components (`..`, roots) never match.
pub(crate) async fn serve(root: &Path, request_path: &str) -> Response {
    let Some(path) = resolve(root, request_path) else {
        debug!(path = request_path, "No static resource matched");
        return page(root, NOT_FOUND_PAGE, StatusCode::NOT_FOUND).await;
    };

    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            let content_type = mime_guess::from_path(&path)
                .first_raw()
                .unwrap_or("text/plain");
            (StatusCode::OK, [(header::CONTENT_TYPE, content_type)], bytes).into_response()
        }
        Err(e) => {
            debug!(path = request_path, error = %e, "Static resource unreadable");
            page(root, NOT_FOUND_PAGE, StatusCode::NOT_FOUND).await
        }
    }
}

/// Map a request path onto the static root, refusing traversal.
fn resolve(root: &Path, request_path: &str) -> Option<PathBuf> {
    let relative = request_path.trim_start_matches('/');
    if relative.is_empty() {
        return None;
    }
    let traversal = Path::new(relative)
        .components()
        .any(|c| !matches!(c, Component::Normal(_)));
    if traversal {
        return None;
    }
    let path = root.join(relative);
    path.is_file().then_some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_rejects_traversal() {
        let root = Path::new("static");
        assert!(resolve(root, "/../etc/passwd").is_none());
        assert!(resolve(root, "/a/../../b").is_none());
    }

    #[test]
    fn resolve_rejects_empty_and_missing() {
        let root = Path::new("static");
        assert!(resolve(root, "/").is_none());
        assert!(resolve(root, "/no-such-file.png").is_none());
    }

    #[test]
    fn resolve_finds_existing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("style.css"), "body {}").unwrap();
        let path = resolve(dir.path(), "/style.css").unwrap();
        assert!(path.ends_with("style.css"));
    }
}
