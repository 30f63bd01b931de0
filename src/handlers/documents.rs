use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::services::rag::{self, IngestDocument};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct DocumentUpload {
    pub name: String,
    /// Raw text, used as-is.
    pub text: Option<String>,
    /// Base64-encoded PDF bytes; text is extracted server-side.
    pub content_base64: Option<String>,
}

#[derive(Deserialize)]
pub struct IngestRequest {
    pub documents: Vec<DocumentUpload>,
}

#[derive(Serialize)]
pub struct IngestResponse {
    pub indexed_chunks: usize,
    pub skipped_documents: usize,
}

/// Ingest a document batch: extract, chunk, build a fresh index snapshot
/// and swap it in. Documents that fail extraction are skipped; a batch
/// that yields nothing leaves the previous index installed.
pub async fn ingest(
    State(state): State<Arc<AppState>>,
    Json(req): Json<IngestRequest>,
) -> Result<Json<IngestResponse>, AppError> {
    if req.documents.is_empty() {
        return Err(AppError::BadRequest("no documents provided".to_string()));
    }

    let mut extracted: Vec<IngestDocument> = Vec::new();
    let mut skipped = 0usize;

    for doc in &req.documents {
        let text = match (&doc.text, &doc.content_base64) {
            (Some(text), _) => Some(text.clone()),
            (None, Some(encoded)) => {
                match base64::engine::general_purpose::STANDARD.decode(encoded) {
                    Ok(bytes) => match rag::extract_pdf_text(&bytes) {
                        Ok(text) => Some(text),
                        Err(e) => {
                            tracing::warn!(document = %doc.name, error = %e, "failed to extract document, skipping");
                            None
                        }
                    },
                    Err(e) => {
                        tracing::warn!(document = %doc.name, error = %e, "invalid base64 payload, skipping");
                        None
                    }
                }
            }
            (None, None) => {
                tracing::warn!(document = %doc.name, "document has neither text nor content, skipping");
                None
            }
        };

        match text {
            Some(text) => extracted.push(IngestDocument {
                name: doc.name.clone(),
                text,
            }),
            None => skipped += 1,
        }
    }

    let indexed_chunks = match rag::build_index(&extracted, state.config.chunk_max_chars) {
        Some(index) => {
            let count = index.len();
            state.install_index(Some(Arc::new(index)));
            tracing::info!(chunks = count, documents = extracted.len(), "installed new retrieval index");
            count
        }
        None => {
            tracing::warn!("no text extracted from batch, keeping previous index");
            0
        }
    };

    Ok(Json(IngestResponse {
        indexed_chunks,
        skipped_documents: skipped,
    }))
}

#[derive(Serialize)]
pub struct ClearResponse {
    pub cleared: bool,
}

pub async fn clear(State(state): State<Arc<AppState>>) -> Json<ClearResponse> {
    let had_index = state.current_index().is_some();
    state.install_index(None);
    tracing::info!("cleared retrieval index");
    Json(ClearResponse { cleared: had_index })
}
