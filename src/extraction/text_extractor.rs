// src/extraction/text_extractor.rs
//! Multi-strategy PDF text extraction with fallback.
//!
//! Different PDF encodings and font setups defeat different extractors, so
//! extraction tries a fixed ordered list of strategies and takes the first
//! non-empty result in full. Strategies are never merged. `pdf-extract` can
//! panic on malformed input rather than returning errors, so that call is
//! wrapped in `catch_unwind` and a panic counts the same as empty output.

use lopdf::content::Content;
use lopdf::{Document, Object};
use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("file is not a readable PDF document")]
    InvalidDocument,
    #[error("no extractable text found in document")]
    Empty,
}

pub struct TextExtractor;

impl TextExtractor {
    /// Extract plain text from PDF bytes.
    ///
    /// Tries `pdf-extract` first, then a lower-level content-stream walk via
    /// `lopdf`. Returns the first trimmed non-empty result; fails with
    /// [`ExtractionError::Empty`] when both strategies produce nothing.
    pub fn extract(bytes: &[u8]) -> Result<String, ExtractionError> {
        if let Some(text) = Self::extract_with_pdf_extract(bytes) {
            return Ok(text);
        }

        if let Some(text) = Self::extract_with_lopdf(bytes) {
            return Ok(text);
        }

        warn!("all extraction strategies yielded empty text");
        Err(ExtractionError::Empty)
    }

    /// Check whether the bytes parse as a PDF at all.
    ///
    /// Pre-flight gate before committing to full extraction: tries the
    /// primary reader first, then the lower-level parser.
    pub fn validate(bytes: &[u8]) -> bool {
        let owned = bytes.to_vec();
        let opened = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem(&owned).is_ok()
        }));
        if let Ok(true) = opened {
            return true;
        }

        Document::load_mem(bytes).is_ok()
    }

    /// Strategy A: `pdf_extract::extract_text_from_mem`.
    fn extract_with_pdf_extract(bytes: &[u8]) -> Option<String> {
        let owned = bytes.to_vec(); // owned copy for the unwind boundary
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem(&owned)
        }));

        match result {
            Ok(Ok(text)) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            Ok(Err(e)) => {
                warn!("pdf-extract strategy failed: {}", e);
                None
            }
            Err(_) => {
                warn!("pdf-extract strategy panicked on malformed input");
                None
            }
        }
    }

    /// Strategy B: walk every page's content stream with lopdf and collect
    /// the text-showing operators.
    fn extract_with_lopdf(bytes: &[u8]) -> Option<String> {
        let doc = match Document::load_mem(bytes) {
            Ok(doc) => doc,
            Err(e) => {
                warn!("lopdf strategy failed to parse document: {}", e);
                return None;
            }
        };

        let mut text = String::new();

        for (_page_number, page_id) in doc.get_pages() {
            let content = match doc.get_page_content(page_id) {
                Ok(content) => content,
                Err(_) => continue,
            };
            let operations = match Content::decode(&content) {
                Ok(decoded) => decoded.operations,
                Err(_) => continue,
            };

            for op in operations {
                match op.operator.as_str() {
                    "Tj" | "TJ" | "'" | "\"" => {
                        for operand in &op.operands {
                            if let Some(s) = decode_text_operand(operand) {
                                text.push_str(&s);
                            }
                        }
                    }
                    // Line-positioning operators mark line breaks in reading order
                    "Td" | "TD" | "T*" => text.push('\n'),
                    _ => {}
                }
            }
            text.push('\n');
        }

        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

/// Decode one text-showing operand: UTF-8, then UTF-16BE (BOM-prefixed),
/// then Latin-1 as last resort. TJ arrays interleave strings with kerning
/// offsets; large negative offsets stand in for inter-word spacing.
fn decode_text_operand(operand: &Object) -> Option<String> {
    match operand {
        Object::String(bytes, _) => {
            if let Ok(s) = String::from_utf8(bytes.clone()) {
                return Some(s);
            }
            if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
                let units: Vec<u16> = bytes[2..]
                    .chunks(2)
                    .filter(|chunk| chunk.len() == 2)
                    .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
                    .collect();
                if let Ok(s) = String::from_utf16(&units) {
                    return Some(s);
                }
            }
            Some(bytes.iter().map(|&b| b as char).collect())
        }
        Object::Array(items) => {
            let mut text = String::new();
            for item in items {
                match item {
                    Object::String(_, _) => {
                        if let Some(s) = decode_text_operand(item) {
                            text.push_str(&s);
                        }
                    }
                    Object::Integer(n) if *n < -100 => text.push(' '),
                    _ => {}
                }
            }
            Some(text)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_rejects_garbage_bytes() {
        let result = TextExtractor::extract(b"this is not a pdf at all");
        assert!(matches!(result, Err(ExtractionError::Empty)));
    }

    #[test]
    fn test_extract_rejects_empty_pdf_shell() {
        let result = TextExtractor::extract(b"%PDF-1.4\n%%EOF\n");
        assert!(matches!(result, Err(ExtractionError::Empty)));
    }

    #[test]
    fn test_validate_rejects_non_pdf() {
        assert!(!TextExtractor::validate(b"plain text file"));
        assert!(!TextExtractor::validate(b""));
    }

    #[test]
    fn test_decode_utf8_operand() {
        let operand = Object::String(b"Jane Doe".to_vec(), lopdf::StringFormat::Literal);
        assert_eq!(decode_text_operand(&operand).as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_decode_utf16be_operand() {
        // "Hi" as UTF-16BE with BOM
        let operand = Object::String(
            vec![0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69],
            lopdf::StringFormat::Hexadecimal,
        );
        assert_eq!(decode_text_operand(&operand).as_deref(), Some("Hi"));
    }

    #[test]
    fn test_decode_array_operand_with_kerning() {
        let operand = Object::Array(vec![
            Object::String(b"Jane".to_vec(), lopdf::StringFormat::Literal),
            Object::Integer(-250),
            Object::String(b"Doe".to_vec(), lopdf::StringFormat::Literal),
        ]);
        assert_eq!(decode_text_operand(&operand).as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_decode_non_text_operand() {
        assert_eq!(decode_text_operand(&Object::Integer(42)), None);
    }
}
