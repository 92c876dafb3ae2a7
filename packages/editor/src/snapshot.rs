//! Persisting documents as JSON snapshots.
//!
//! Strict loading validates every region; the lenient variant falls back to
//! the default document so a corrupt save never blocks the designer.

use crate::document::Document;
use crate::errors::{EditorError, Result};
use crate::region::Position;
use crate::tree::check_region;
use std::path::Path;
use tracing::{debug, warn};

pub fn to_json(document: &Document) -> Result<String> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// Parse and validate a snapshot
pub fn from_json(json: &str) -> Result<Document> {
    let mut document: Document = serde_json::from_str(json)?;
    validate(&document)?;
    document.clamp_page_index();
    Ok(document)
}

/// Parse a snapshot, or the default document when it is malformed
pub fn from_json_or_default(json: &str) -> Document {
    match from_json(json) {
        Ok(document) => document,
        Err(err) => {
            warn!(error = %err, "Malformed snapshot; starting from default document");
            Document::default()
        }
    }
}

pub fn load_file(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref();
    debug!(path = %path.display(), "Loading snapshot");
    let content = std::fs::read_to_string(path)?;
    from_json(&content)
}

pub fn save_file(document: &Document, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    debug!(path = %path.display(), pages = document.pages.len(), "Saving snapshot");
    std::fs::write(path, to_json(document)?)?;
    Ok(())
}

/// Every page must exist and every region must be a well-formed tree
pub fn validate(document: &Document) -> Result<()> {
    if document.pages.is_empty() {
        return Err(EditorError::InvalidSnapshot("document has no pages".into()));
    }
    for page in &document.pages {
        for position in Position::ALL {
            check_region(page.region(position), position.root_id()).map_err(|err| {
                EditorError::InvalidSnapshot(format!("page {} {}: {}", page.id, position, err))
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Page;
    use serde_json::json;

    #[test]
    fn test_round_trip_preserves_document() {
        let mut doc = Document::default();
        doc.pages.push(Page::blank("2"));
        doc.current_page_index = 1;
        doc.config.watermark.watermark_text = "Draft".into();

        let back = from_json(&to_json(&doc).unwrap()).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_out_of_range_page_index_is_clamped() {
        let mut value = serde_json::to_value(Document::default()).unwrap();
        value["currentPageIndex"] = json!(7);
        let doc = from_json(&value.to_string()).unwrap();
        assert_eq!(doc.current_page_index, 0);
    }

    #[test]
    fn test_missing_root_is_rejected() {
        let mut value = serde_json::to_value(Document::default()).unwrap();
        value["pages"][0]["pageBodyContent"] = json!([]);
        assert!(matches!(
            from_json(&value.to_string()),
            Err(EditorError::InvalidSnapshot(_))
        ));
    }

    #[test]
    fn test_empty_page_list_is_rejected() {
        let err = from_json(r#"{ "pages": [] }"#).unwrap_err();
        assert!(matches!(err, EditorError::InvalidSnapshot(_)));
    }

    #[test]
    fn test_lenient_load_falls_back_to_default() {
        assert_eq!(from_json_or_default("not json"), Document::default());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        let doc = Document::default();
        save_file(&doc, &path).unwrap();
        assert_eq!(load_file(&path).unwrap(), doc);
    }
}
