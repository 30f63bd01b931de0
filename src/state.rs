use std::sync::{Arc, Mutex, RwLock};

use rusqlite::Connection;

use crate::config::AppConfig;
use crate::services::ai::AnswerProvider;
use crate::services::mailer::MailProvider;
use crate::services::rag::SimilarityIndex;

pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: AppConfig,
    pub llm: Box<dyn AnswerProvider>,
    pub mailer: Box<dyn MailProvider>,
    /// Immutable retrieval snapshot. Ingestion builds a full replacement
    /// and swaps it in; readers clone the Arc and query without the lock.
    pub rag: RwLock<Option<Arc<SimilarityIndex>>>,
}

impl AppState {
    pub fn current_index(&self) -> Option<Arc<SimilarityIndex>> {
        self.rag.read().unwrap().clone()
    }

    pub fn install_index(&self, index: Option<Arc<SimilarityIndex>>) {
        *self.rag.write().unwrap() = index;
    }
}
