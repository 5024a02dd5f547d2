use anyhow::Context as _;

use crate::error::GifscaleResult;

/// Whether a source argument names a remote resource rather than a file.
pub fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Loads the raw bytes of a source GIF from a local path or an absolute
/// http/https URL. All blocking I/O happens here, before the pipeline runs.
pub fn load_source(source: &str) -> GifscaleResult<Vec<u8>> {
    if is_url(source) {
        tracing::debug!(url = source, "fetching source");
        let response = reqwest::blocking::get(source)
            .with_context(|| format!("fetch '{source}'"))?
            .error_for_status()
            .with_context(|| format!("fetch '{source}'"))?;
        let bytes = response
            .bytes()
            .with_context(|| format!("read response body of '{source}'"))?;
        Ok(bytes.to_vec())
    } else {
        let bytes = std::fs::read(source).with_context(|| format!("read '{source}'"))?;
        Ok(bytes)
    }
}
