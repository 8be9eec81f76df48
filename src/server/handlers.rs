use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{Html, IntoResponse},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use super::AppState;
use crate::APOLOGY_REPLY;
use crate::chatbot::DEFAULT_SESSION_ID;
use crate::utils::safe_truncate_ellipsis;

const INDEX_HTML: &str = include_str!("../../static/index.html");


#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageRequest {
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
}


#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageResponse {
    pub reply: String,
}

impl SendMessageResponse {
    fn apology() -> Json<Self> {
        Json(Self {
            reply: APOLOGY_REPLY.to_string(),
        })
    }
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "intents": state.tracker.selector().knowledge_base().len(),
    }))
}

/// Every failure maps to the apology reply with a 200.
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Json<SendMessageResponse> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!("Rejected /send_message body: {}", rejection.body_text());
            return SendMessageResponse::apology();
        }
    };

    let session_id = request
        .session_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SESSION_ID.to_string());
    info!(
        "💬 [{}] {}",
        session_id,
        safe_truncate_ellipsis(&request.message, 80)
    );

    let tracker = Arc::clone(&state.tracker);
    let message = request.message;
    let result =
        tokio::task::spawn_blocking(move || tracker.respond_with_stage(&message, &session_id))
            .await;

    match result {
        Ok(reply) => {
            info!("↪ {} stage (tag: {:?})", reply.stage, reply.tag);
            Json(SendMessageResponse { reply: reply.text })
        }
        Err(e) => {
            error!("Response pipeline failed: {}", e);
            SendMessageResponse::apology()
        }
    }
}

pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    match state.tracker.sessions().get(&session_id) {
        Some(context) => Json(serde_json::json!({
            "session_id": session_id,
            "last_topic": context.last_topic,
            "question_count": context.question_count,
            "asked_about": context.asked_about,
        }))
        .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "session not found" })),
        )
            .into_response(),
    }
}
