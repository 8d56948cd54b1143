/*!
 * Raw record loading
 *
 * Reads exactly one JSON document holding one provider verification record.
 * Shape validation beyond "is a JSON object" is left to the transform.
 */

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::{NormalizeError, Result};

/// Parse a raw record from a JSON string
pub fn parse_record(input: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(input)?;
    ensure_object(value)
}

/// Read a raw record from any reader
pub fn read_record<R: Read>(reader: R) -> Result<Value> {
    let value: Value = serde_json::from_reader(BufReader::new(reader))?;
    ensure_object(value)
}

/// Load a raw record from a JSON file
pub fn load_record<P: AsRef<Path>>(path: P) -> Result<Value> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(NormalizeError::Custom {
            message: format!("File not found: {}", path.display()),
            suggestion: Some("Check the path and that you have read permissions".to_string()),
        });
    }

    let file = File::open(path).map_err(|e| NormalizeError::from(e).with_path(path))?;
    debug!(path = %path.display(), "loading raw record");
    read_record(file).map_err(|e| e.with_path(path))
}

fn ensure_object(value: Value) -> Result<Value> {
    if value.is_object() {
        Ok(value)
    } else {
        Err(NormalizeError::malformed_record(&value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_record() {
        let value = parse_record(r#"{"Licenses": []}"#).unwrap();
        assert!(value.get("Licenses").is_some());
    }

    #[test]
    fn test_non_object_is_malformed() {
        let err = parse_record("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, NormalizeError::MalformedRecord { .. }));
    }

    #[test]
    fn test_invalid_json() {
        let err = parse_record("{\"Licenses\": [").unwrap_err();
        assert!(matches!(err, NormalizeError::JsonParse { .. }));
    }

    #[test]
    fn test_load_record_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "\"just a string\"").unwrap();

        let err = load_record(file.path()).unwrap_err();
        match err {
            NormalizeError::MalformedRecord { context, .. } => {
                assert_eq!(context.file_path.as_deref(), Some(file.path()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_file() {
        assert!(load_record("/definitely/not/here.json").is_err());
    }
}
