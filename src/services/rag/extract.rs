/// Extract plain text from an in-memory PDF. Pages the extractor cannot
/// handle are skipped by the library; a document that yields no text at
/// all surfaces as an error so ingestion can skip it.
pub fn extract_pdf_text(bytes: &[u8]) -> anyhow::Result<String> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| anyhow::anyhow!("failed to extract text from PDF: {e}"))?;

    if text.trim().is_empty() {
        anyhow::bail!("no extractable text in PDF");
    }
    Ok(text)
}
