// SPDX-License-Identifier: MIT OR Apache-2.0
//! Sequence metadata embedded in PNG text chunks.
//!
//! A sequence image carries a text chunk with keyword [`METADATA_KEYWORD`]
//! whose text is a JSON object; its `sequence` member is the sequence array.

use pictograph_animator_core::SequenceData;
use std::io::Cursor;

/// Keyword of the text chunk holding the sequence metadata
pub const METADATA_KEYWORD: &str = "metadata";

/// Reasons a sequence cannot be read from (or written to) an image
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The image has no metadata chunk, or the metadata has no sequence
    #[error("no embedded sequence")]
    NoEmbeddedSequence,

    /// The bytes are not a readable PNG
    #[error("corrupt container: {0}")]
    CorruptContainer(#[from] png::DecodingError),

    /// The metadata text is not a sequence in JSON form
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Writing the PNG failed
    #[error("failed to encode container: {0}")]
    Encode(#[from] png::EncodingError),
}

/// Extract the embedded sequence from PNG bytes
pub fn extract_sequence(bytes: &[u8]) -> Result<SequenceData, CodecError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_ignore_text_chunk(false);
    let mut reader = decoder.read_info()?;

    // Text chunks may also follow the image data
    let text = match metadata_text(reader.info())? {
        Some(text) => text,
        None => {
            reader.finish()?;
            metadata_text(reader.info())?.ok_or(CodecError::NoEmbeddedSequence)?
        }
    };

    parse_payload(&text)
}

/// Parse a metadata JSON object and take its `sequence` member
pub fn parse_payload(text: &str) -> Result<SequenceData, CodecError> {
    let mut payload: serde_json::Value = serde_json::from_str(text)?;
    let sequence = payload
        .get_mut("sequence")
        .map(serde_json::Value::take)
        .ok_or(CodecError::NoEmbeddedSequence)?;
    Ok(SequenceData::from_json_value(sequence)?)
}

/// Write a minimal 1x1 PNG carrying `data` as its metadata chunk
pub fn embed_sequence(data: &SequenceData) -> Result<Vec<u8>, CodecError> {
    let text = serde_json::to_string(&serde_json::json!({ "sequence": data }))?;

    let mut output = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut output, 1, 1);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        // tEXt is Latin-1 only
        if text.chars().all(|c| u32::from(c) <= 0xFF) {
            encoder.add_text_chunk(METADATA_KEYWORD.to_string(), text)?;
        } else {
            encoder.add_itxt_chunk(METADATA_KEYWORD.to_string(), text)?;
        }

        let mut writer = encoder.write_header()?;
        writer.write_image_data(&[0, 0, 0, 0])?;
        writer.finish()?;
    }

    Ok(output)
}

fn metadata_text(info: &png::Info<'_>) -> Result<Option<String>, CodecError> {
    if let Some(chunk) = info
        .uncompressed_latin1_text
        .iter()
        .find(|chunk| chunk.keyword == METADATA_KEYWORD)
    {
        return Ok(Some(chunk.text.clone()));
    }

    match info
        .utf8_text
        .iter()
        .find(|chunk| chunk.keyword == METADATA_KEYWORD)
    {
        Some(chunk) => Ok(Some(chunk.get_text()?)),
        None => Ok(None),
    }
}
