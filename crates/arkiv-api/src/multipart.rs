//! Multipart upload parsing.
//!
//! Upload requests carry either a flat list of `files` parts or a set of
//! bracketed `file_tree[...]` parts describing a nested directory tree,
//! plus an optional `parent_id` text field. This module reads the
//! multipart body into the service-level upload types.

use axum::extract::Multipart;
use uuid::Uuid;

use arkiv_core::error::AppError;
use arkiv_service::file::upload::{UploadTree, UploadedFile};

/// A fully parsed upload request.
#[derive(Debug, Default)]
pub struct UploadBody {
    /// Target folder (root when absent).
    pub parent_id: Option<Uuid>,
    /// Flat file parts (`files` fields).
    pub files: Vec<UploadedFile>,
    /// Nested tree parts (`file_tree[...]` fields).
    pub tree: UploadTree,
}

impl UploadBody {
    /// Whether any tree entries were supplied.
    ///
    /// When both shapes are present the tree wins, matching the flat
    /// upload being the fallback path.
    pub fn has_tree(&self) -> bool {
        !self.tree.is_empty()
    }
}

/// Read every multipart field into an [`UploadBody`].
pub async fn read_upload(mut multipart: Multipart) -> Result<UploadBody, AppError> {
    let mut body = UploadBody::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Malformed multipart body: {e}")))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "parent_id" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::validation(format!("Unreadable parent_id: {e}")))?;
                if !text.trim().is_empty() {
                    body.parent_id = Some(
                        Uuid::parse_str(text.trim())
                            .map_err(|_| AppError::validation_field("parent_id", "Invalid parent_id"))?,
                    );
                }
            }
            "files" | "files[]" => {
                let file_name = field
                    .file_name()
                    .map(String::from)
                    .ok_or_else(|| AppError::validation_field("files", "File part has no name"))?;
                let mime_type = field.content_type().map(String::from);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(format!("Unreadable file part: {e}")))?;
                body.files.push(UploadedFile {
                    name: file_name,
                    mime_type,
                    data,
                });
            }
            name if name.starts_with("file_tree[") => {
                let mut segments = parse_bracket_segments(name).ok_or_else(|| {
                    AppError::validation_field("files", format!("Malformed tree field: {name}"))
                })?;

                let part_file_name = field.file_name().map(String::from);
                // A trailing `[]` (or empty last bracket) means "name this
                // entry after the uploaded file".
                if segments.last().is_none_or(|s| s.is_empty()) {
                    let file_name = part_file_name.clone().ok_or_else(|| {
                        AppError::validation_field("files", "Tree file part has no name")
                    })?;
                    segments.pop();
                    segments.push(file_name);
                }

                let mime_type = field.content_type().map(String::from);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(format!("Unreadable file part: {e}")))?;

                let name = segments.last().cloned().unwrap_or_default();
                let refs: Vec<&str> = segments.iter().map(String::as_str).collect();
                body.tree.insert_file(
                    &refs,
                    UploadedFile {
                        name,
                        mime_type,
                        data,
                    },
                )?;
            }
            _ => {}
        }
    }

    Ok(body)
}

/// Parse `file_tree[a][b][c]` into `["a", "b", "c"]`.
///
/// Returns None when the brackets are unbalanced or text appears outside
/// them.
fn parse_bracket_segments(field_name: &str) -> Option<Vec<String>> {
    let rest = field_name.strip_prefix("file_tree")?;

    let mut segments = Vec::new();
    let mut chars = rest.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '[' {
            return None;
        }
        let mut segment = String::new();
        loop {
            match chars.next() {
                Some(']') => break,
                Some(ch) => segment.push(ch),
                None => return None,
            }
        }
        segments.push(segment);
    }

    if segments.is_empty() {
        return None;
    }
    Some(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_segment() {
        assert_eq!(
            parse_bracket_segments("file_tree[b.txt]"),
            Some(vec!["b.txt".to_string()])
        );
    }

    #[test]
    fn test_parse_nested_segments() {
        assert_eq!(
            parse_bracket_segments("file_tree[docs][reports][q3.pdf]"),
            Some(vec![
                "docs".to_string(),
                "reports".to_string(),
                "q3.pdf".to_string()
            ])
        );
    }

    #[test]
    fn test_parse_trailing_empty_bracket() {
        assert_eq!(
            parse_bracket_segments("file_tree[docs][]"),
            Some(vec!["docs".to_string(), String::new()])
        );
    }

    #[test]
    fn test_parse_rejects_malformed_names() {
        assert_eq!(parse_bracket_segments("file_tree"), None);
        assert_eq!(parse_bracket_segments("file_tree[unclosed"), None);
        assert_eq!(parse_bracket_segments("file_tree[a]junk[b]"), None);
        assert_eq!(parse_bracket_segments("other[a]"), None);
    }

    #[test]
    fn test_parse_allows_names_with_dots_and_spaces() {
        assert_eq!(
            parse_bracket_segments("file_tree[My Docs][notes v2.txt]"),
            Some(vec!["My Docs".to_string(), "notes v2.txt".to_string()])
        );
    }
}
