//! Line-packing text chunker.
//!
//! Splits extracted document text into bounded chunks: lines are trimmed,
//! empty lines dropped, and consecutive lines greedily packed (joined by a
//! single space) until the joined chunk would exceed `max_chars`. A single
//! line longer than `max_chars` becomes its own oversized chunk.

/// Deterministic, order-preserving, no overlap. Never emits empty chunks.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let joined_len = if current.is_empty() {
            line.len()
        } else {
            current.len() + 1 + line.len()
        };

        if joined_len > max_chars && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(line);
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
