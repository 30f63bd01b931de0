//! Document retrieval: chunking, TF-IDF indexing, and context assembly
//! for grounding generated answers.

pub mod chunk;
pub mod extract;
pub mod index;

pub use chunk::chunk_text;
pub use extract::extract_pdf_text;
pub use index::{ScoredChunk, SimilarityIndex};

pub const DEFAULT_TOP_K: usize = 4;

/// One document handed to ingestion: already-extracted text.
pub struct IngestDocument {
    pub name: String,
    pub text: String,
}

/// Chunk every document and build one index snapshot over the flat chunk
/// sequence. Returns None when no document produced any chunk, in which
/// case the caller keeps its previous index.
pub fn build_index(documents: &[IngestDocument], max_chars: usize) -> Option<SimilarityIndex> {
    let mut all_chunks: Vec<String> = Vec::new();
    for doc in documents {
        let chunks = chunk_text(&doc.text, max_chars);
        tracing::debug!(document = %doc.name, chunks = chunks.len(), "chunked document");
        all_chunks.extend(chunks);
    }

    if all_chunks.is_empty() {
        return None;
    }
    Some(SimilarityIndex::build(all_chunks))
}

/// Select the top-k most similar chunks and join their text with blank
/// lines, in rank order. Empty context when no index is installed or
/// nothing is relevant.
pub fn retrieve(
    index: Option<&SimilarityIndex>,
    query: &str,
    top_k: usize,
) -> (String, Vec<ScoredChunk>) {
    let Some(index) = index else {
        return (String::new(), vec![]);
    };

    let scored = index.query(query, top_k);
    if scored.is_empty() {
        return (String::new(), vec![]);
    }

    let context = scored
        .iter()
        .filter_map(|s| index.chunk(s.index))
        .collect::<Vec<_>>()
        .join("\n\n");
    (context, scored)
}
