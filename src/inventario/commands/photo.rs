//! Item photos are stored inline as `data:<mime>;base64,<payload>` URIs, so the
//! state slot and the report HTML are self-contained.

use crate::error::{InventarioError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fs;
use std::path::Path;

/// Encodes image bytes as a data URI, sniffing the format from the content.
pub fn encode_data_uri(bytes: &[u8]) -> Result<String> {
    let format = image::guess_format(bytes)
        .map_err(|_| InventarioError::validation("The selected file is not a supported image."))?;
    Ok(format!(
        "data:{};base64,{}",
        format.to_mime_type(),
        STANDARD.encode(bytes)
    ))
}

/// Reads an image file and encodes it with [`encode_data_uri`].
pub fn load_image_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(InventarioError::Io)?;
    encode_data_uri(&bytes)
}

/// Splits a base64 data URI into its mime type and decoded bytes.
pub fn decode_data_uri(uri: &str) -> Option<(String, Vec<u8>)> {
    let rest = uri.strip_prefix("data:")?;
    let (mime, payload) = rest.split_once(";base64,")?;
    let bytes = STANDARD.decode(payload.trim()).ok()?;
    Some((mime.to_string(), bytes))
}

/// True for a data URI with a mime type and a non-empty, decodable payload.
pub fn is_data_uri(uri: &str) -> bool {
    decode_data_uri(uri)
        .is_some_and(|(mime, bytes)| mime.contains('/') && !bytes.is_empty())
}
