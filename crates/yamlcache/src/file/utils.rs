//! File parsing and value lookup utilities.

use std::path::Path;

use miette::{NamedSource, SourceSpan};
use serde_json as SJSON;
use serde_saphyr as YAML;

use super::error::FileError;

/// Utilities for YAML parsing and key lookup.
///
/// This struct provides static methods for:
/// - Parsing YAML documents into a [`serde_json::Value`] tree
/// - Turning parser errors into span-carrying [`FileError`]s
/// - Resolving dotted keys (`server.port`) against a parsed document
///
/// Most users interact with these indirectly through
/// [`YamlSource`](crate::YamlSource).
pub struct FileUtils;

impl FileUtils {
    /// Converts a byte offset to a [`SourceSpan`] with a reasonable length.
    pub(crate) fn offset_to_span(offset: usize, content: &str) -> SourceSpan {
        let start = offset.min(content.len());
        let remaining = content.get(start..).unwrap_or_default();
        let len = remaining
            .find(|c: char| c.is_whitespace() || (c == ',') || (c == '}') || (c == ']'))
            .unwrap_or(remaining.len().min(20))
            .max(1);

        SourceSpan::new(start.into(), len)
    }

    /// Convert line/column (1-indexed) to byte offset.
    pub(crate) fn line_col_to_offset(content: &str, line: usize, col: usize) -> usize {
        let mut offset = 0;

        for (i, l) in content.lines().enumerate() {
            if (i + 1) == line {
                return offset + col.saturating_sub(1);
            }

            offset += l.len() + 1;
        }

        offset
    }

    pub(crate) fn yaml_parse_error(e: &YAML::Error, content: &str, path: &Path) -> FileError {
        let msg = e.to_string();
        let help = "check indentation and ensure proper YAML syntax".to_string();

        if let Some(loc) = Self::extract_yaml_location(&msg) {
            let offset = Self::line_col_to_offset(content, loc.0, loc.1);

            FileError::Parse {
                path: path.display().to_string(),
                src: NamedSource::new(path.display().to_string(), content.to_string()),
                span: Self::offset_to_span(offset, content),
                message: msg,
                help,
            }
        } else {
            FileError::ParseNoSpan {
                path: path.display().to_string(),
                message: msg,
                help,
            }
        }
    }

    /// Try to extract line/column from YAML error message.
    pub(crate) fn extract_yaml_location(msg: &str) -> Option<(usize, usize)> {
        let line_idx = msg.find("line ")?;
        let after_line = &msg[(line_idx + 5)..];
        let line_end = after_line.find(|c: char| !c.is_ascii_digit())?;
        let line = after_line[..line_end].parse::<usize>().ok()?;

        let col_idx = after_line.find("column ")?;
        let after_col = &after_line[(col_idx) + 7..];
        let col_end = after_col
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(after_col.len());
        let col = after_col[..col_end].parse::<usize>().ok()?;

        Some((line, col))
    }

    /// A document with nothing but blank lines and comments.
    fn is_blank_document(content: &str) -> bool {
        content
            .lines()
            .map(str::trim)
            .all(|l| l.is_empty() || l.starts_with('#') || l == "---")
    }

    // ============================================================================
    // Parsing
    // ============================================================================

    /// Parses a YAML document.
    ///
    /// `path` is only used for error reporting. A blank or null document
    /// parses to an empty mapping.
    ///
    /// # Errors
    ///
    /// Returns [`FileError::Parse`] (or [`FileError::ParseNoSpan`] when the
    /// parser reports no location) for malformed YAML.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::path::Path;
    /// use yamlcache::file::FileUtils;
    ///
    /// let doc = FileUtils::parse_str("server:\n  port: 8080\n", Path::new("<string>")).unwrap();
    /// assert_eq!(FileUtils::lookup(&doc, "server.port"), Some(&serde_json::json!(8080)));
    /// ```
    pub fn parse_str(content: &str, path: &Path) -> Result<SJSON::Value, FileError> {
        if Self::is_blank_document(content) {
            return Ok(SJSON::Value::Object(SJSON::Map::new()));
        }

        let value: SJSON::Value =
            YAML::from_str(content).map_err(|e| Self::yaml_parse_error(&e, content, path))?;

        Ok(match value {
            SJSON::Value::Null => SJSON::Value::Object(SJSON::Map::new()),
            other => other,
        })
    }

    /// Reads and parses a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`FileError::ReadError`] when the file cannot be read and a
    /// parse error when its content is not valid YAML.
    pub fn parse_file(path: &Path) -> Result<SJSON::Value, FileError> {
        let content = std::fs::read_to_string(path).map_err(|e| FileError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse_str(&content, path)
    }

    // ============================================================================
    // Lookup
    // ============================================================================

    /// Resolves a dotted key against a parsed document.
    ///
    /// Each segment is matched exactly first and then ASCII
    /// case-insensitively, so `Server.Port` finds `server: {port: ..}`.
    /// Numeric segments index into sequences (`hosts.0`).
    #[must_use]
    pub fn lookup<'a>(root: &'a SJSON::Value, key: &str) -> Option<&'a SJSON::Value> {
        let key = key.trim();
        if key.is_empty() {
            return None;
        }

        // A literal key containing dots wins over nested traversal
        if let Some(found) = Self::child(root, key) {
            return Some(found);
        }

        key.split('.')
            .try_fold(root, |current, segment| Self::child(current, segment))
    }

    fn child<'a>(value: &'a SJSON::Value, segment: &str) -> Option<&'a SJSON::Value> {
        match value {
            SJSON::Value::Object(map) => map.get(segment).or_else(|| {
                map.iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(segment))
                    .map(|(_, v)| v)
            }),

            SJSON::Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),

            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(content: &str) -> SJSON::Value {
        FileUtils::parse_str(content, Path::new("test.yaml")).unwrap()
    }

    #[test]
    fn test_parse_scalars_and_nesting() {
        let doc = parse("hello: word\nfoo: 1.0\nserver:\n  port: 8080\n  hosts: [a, b]\n");

        assert_eq!(doc["hello"], json!("word"));
        assert_eq!(doc["foo"].as_f64(), Some(1.0));
        assert_eq!(doc["server"]["port"], json!(8080));
        assert_eq!(doc["server"]["hosts"], json!(["a", "b"]));
    }

    #[test]
    fn test_blank_document_is_empty_mapping() {
        assert_eq!(parse(""), json!({}));
        assert_eq!(parse("# only a comment\n\n"), json!({}));
        assert_eq!(parse("---\n"), json!({}));
    }

    #[test]
    fn test_parse_error_is_reported() {
        let result = FileUtils::parse_str("key: [unclosed", Path::new("bad.yaml"));
        let err = result.unwrap_err();
        assert!(matches!(
            err,
            FileError::Parse { .. } | FileError::ParseNoSpan { .. }
        ));
        assert!(err.to_string().contains("bad.yaml"));
    }

    #[test]
    fn test_lookup_dotted_and_case_insensitive() {
        let doc = json!({"Server": {"port": 8080, "hosts": ["a", "b"]}, "a.b": 1});

        assert_eq!(FileUtils::lookup(&doc, "server.port"), Some(&json!(8080)));
        assert_eq!(FileUtils::lookup(&doc, "SERVER.PORT"), Some(&json!(8080)));
        assert_eq!(FileUtils::lookup(&doc, "server.hosts.1"), Some(&json!("b")));
        assert_eq!(FileUtils::lookup(&doc, "a.b"), Some(&json!(1)));
        assert_eq!(FileUtils::lookup(&doc, "server.missing"), None);
        assert_eq!(FileUtils::lookup(&doc, ""), None);
    }

    #[test]
    fn test_extract_yaml_location() {
        assert_eq!(
            FileUtils::extract_yaml_location("bad thing at line 3, column 7"),
            Some((3, 7))
        );
        assert_eq!(FileUtils::extract_yaml_location("no location"), None);
    }

    #[test]
    fn test_line_col_to_offset() {
        let content = "a: 1\nbb: 2\n";
        assert_eq!(FileUtils::line_col_to_offset(content, 2, 1), 5);
        assert_eq!(FileUtils::line_col_to_offset(content, 1, 4), 3);
    }

    #[test]
    fn test_offset_to_span_is_clamped() {
        let span = FileUtils::offset_to_span(100, "short");
        assert_eq!(span.offset(), 5);
        assert_eq!(span.len(), 1);
    }
}
