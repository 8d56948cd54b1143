/*!
 * Canonical record output
 *
 * Serializes a canonical record as JSON. File exports write a sibling
 * temporary file and rename it over the target, so the target holds either
 * its previous content or the complete new document.
 */

use std::ffi::{OsStr, OsString};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::data_types::CanonicalRecord;
use crate::config::NormalizeConfig;
use crate::{NormalizeError, Result};

/// JSON writer for canonical records
#[derive(Debug, Clone)]
pub struct JsonExporter {
    /// Whether to pretty-print the JSON (two-space indent)
    pub pretty_print: bool,
}

impl Default for JsonExporter {
    fn default() -> Self {
        Self { pretty_print: true }
    }
}

impl JsonExporter {
    /// Create a new JSON exporter
    pub fn new() -> Self {
        Self::default()
    }

    /// Exporter following the configured formatting
    pub fn from_config(config: &NormalizeConfig) -> Self {
        Self {
            pretty_print: config.pretty_print,
        }
    }

    /// Set pretty printing
    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    /// Render a record as a JSON string
    pub fn to_string(&self, record: &CanonicalRecord) -> Result<String> {
        let json = if self.pretty_print {
            serde_json::to_string_pretty(record)?
        } else {
            serde_json::to_string(record)?
        };
        Ok(json)
    }

    /// Write a record, followed by a newline, to any writer
    pub fn write<W: Write>(&self, record: &CanonicalRecord, mut writer: W) -> Result<()> {
        let json = self.to_string(record)?;
        writeln!(writer, "{}", json)?;
        writer.flush()?;
        Ok(())
    }

    /// Write a record to a file, replacing any existing content
    pub fn export<P: AsRef<Path>>(&self, record: &CanonicalRecord, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut json = self.to_string(record)?;
        json.push('\n');

        let staging = staging_path(path);
        let written = std::fs::write(&staging, json).and_then(|_| std::fs::rename(&staging, path));
        if let Err(err) = written {
            let _ = std::fs::remove_file(&staging);
            return Err(NormalizeError::from(err).with_path(path));
        }
        Ok(())
    }
}

/// `out.json` → `.out.json.tmp` in the same directory, so the rename stays on one filesystem
fn staging_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or_else(|| OsStr::new("export")));
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform;
    use serde_json::json;

    #[test]
    fn test_compact_and_pretty_output() {
        let record = transform(&json!({"Licenses": [{"issuer": "Ohio"}]})).unwrap();

        let compact = JsonExporter::new().with_pretty_print(false).to_string(&record).unwrap();
        assert!(!compact.contains('\n'));
        assert!(compact.starts_with("{\"profileMetadata\":"));

        let pretty = JsonExporter::new().to_string(&record).unwrap();
        assert!(pretty.contains("\n  \"profileMetadata\": {"));
    }

    #[test]
    fn test_export_to_file() {
        let record = transform(&json!({})).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");

        JsonExporter::new().export(&record, &path).unwrap();
        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, record.to_value().unwrap());
    }

    #[test]
    fn test_export_replaces_file_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        std::fs::write(&path, "stale").unwrap();

        let record = transform(&json!({"Licenses": [{"issuer": "Ohio"}]})).unwrap();
        JsonExporter::new().with_pretty_print(false).export(&record, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("{\"profileMetadata\":"));
        assert!(content.ends_with('\n'));
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_export_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.json");
        let record = transform(&json!({})).unwrap();

        let err = JsonExporter::new().export(&record, &path).unwrap_err();
        assert!(matches!(err, NormalizeError::Io { .. }));
        assert!(err.user_message().contains("out.json"));
    }
}
