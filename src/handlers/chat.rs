use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::services::chat;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub session_id: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

pub async fn post_message(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    if req.session_id.trim().is_empty() {
        return Err(AppError::BadRequest("session_id must not be empty".to_string()));
    }
    if req.message.trim().is_empty() {
        return Err(AppError::BadRequest("message must not be empty".to_string()));
    }

    // Processing failures degrade to an apology reply; the chat surface
    // never returns a 5xx for a message the user can simply resend.
    let reply = match chat::process_message(&state, &req.session_id, &req.message).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::error!(error = %e, session = %req.session_id, "message processing failed");
            "Sorry, I'm having trouble right now. Please try again in a moment.".to_string()
        }
    };

    Ok(Json(ChatResponse { reply }))
}
