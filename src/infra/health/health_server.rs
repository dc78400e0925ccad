// Liveness endpoint so the hosting platform's health check sees the process as up.

use axum::{routing::get, Router};

pub const LIVENESS_BODY: &str = "MentionGuardBot is running!";

pub fn router() -> Router {
    Router::new().route("/", get(home))
}

async fn home() -> &'static str {
    LIVENESS_BODY
}

/// Serve the liveness endpoint on all interfaces until the process exits.
pub async fn serve(port: u16) -> Result<(), std::io::Error> {
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!("Starting liveness server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router()).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_root_reports_running() {
        let response = router()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], LIVENESS_BODY.as_bytes());
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let response = router()
            .oneshot(Request::builder().uri("/status").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
