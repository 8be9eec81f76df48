pub mod handlers;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::chatbot::ContextTracker;
use crate::core::config::BotConfig;
use crate::core::error::Result;
use crate::knowledge::KnowledgeBase;


pub struct AppState {
    pub tracker: Arc<ContextTracker>,
}

impl AppState {
    pub fn new(tracker: ContextTracker) -> Self {
        Self {
            tracker: Arc::new(tracker),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/send_message", post(handlers::send_message))
        .route("/health", get(handlers::health_check))
        .route("/session/:id", get(handlers::get_session))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .with_state(state)
}

/// Loads the knowledge base, binds `host:port` and serves until Ctrl-C.
pub async fn run_server(config: BotConfig) -> Result<()> {
    info!("🎓 College Chatbot Web Server Starting...");

    let kb = Arc::new(KnowledgeBase::load_or_empty(&config.knowledge_base_path));
    let tracker = ContextTracker::from_config(kb, &config);
    match tracker.selector().similarity().index() {
        Ok(index) => info!(
            "   📚 TF-IDF index: {} patterns, {} terms",
            index.len(),
            index.vocabulary_size()
        ),
        Err(e) => info!("   📚 TF-IDF index disabled: {}", e),
    }

    let app = router(Arc::new(AppState::new(tracker)));

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    info!("🌐 Listening on {}", listener.local_addr()?);
    info!("⏹️  Press CTRL+C to stop");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutdown signal received");
            }
        })
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use super::*;
    use crate::APOLOGY_REPLY;
    use crate::chatbot::{FixedPicker, InMemorySessionStore, ResponseSelector};

    fn app() -> Router {
        let kb = Arc::new(
            KnowledgeBase::from_json_str(include_str!("../../data/college_data.json")).unwrap(),
        );
        let selector = ResponseSelector::new(kb, Arc::new(FixedPicker(0)));
        let tracker = ContextTracker::new(
            Arc::new(selector),
            Arc::new(InMemorySessionStore::new(16, 3600)),
        );
        router(Arc::new(AppState::new(tracker)))
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/send_message")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_send_message_replies() {
        let response = app().oneshot(post_json(r#"{"message": "hi"}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(
            body["reply"],
            "Hello! Welcome to College Helpdesk! How can I assist you today?"
        );
    }

    #[tokio::test]
    async fn test_malformed_body_gets_apology() {
        for body in [r#"{"msg": "hi"}"#, "not json", r#"{"message": 42}"#] {
            let response = app().oneshot(post_json(body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(json_body(response).await["reply"], APOLOGY_REPLY);
        }
    }

    #[tokio::test]
    async fn test_session_roundtrip() {
        let app = app();
        let response = app
            .clone()
            .oneshot(post_json(r#"{"message": "hostel", "session_id": "abc"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(Request::get("/session/abc").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["question_count"], 1);
        assert_eq!(body["last_topic"], "facilities");

        let response = app
            .oneshot(Request::get("/session/nobody").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_health_and_index() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["intents"], 11);

        let response = app()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("/send_message"));
    }
}
