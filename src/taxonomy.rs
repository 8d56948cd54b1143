/*!
 * NPI taxonomy code parsing
 *
 * Upstream sends taxonomy codes as `"<code> - <label>"`, e.g.
 * `"2084N0400X - Psychiatry & Neurology"`. The separator may be a hyphen,
 * an en-dash, or an en-dash that was mangled into `â€“` by a
 * UTF-8/Windows-1252 round trip.
 */

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::data_types::NpiTaxonomyEntry;
use crate::schema::keys;
use crate::{Result, NormalizeError};

lazy_static! {
    static ref TAXONOMY_PATTERN: Regex =
        Regex::new(r"^([0-9]+[A-Z0-9]*)\s*(?:-|–|â€“)\s*(.+)$").expect("taxonomy pattern is valid");
}

/// Code and label split out of a raw taxonomy string
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxonomyParts {
    pub taxonomy_code: Option<String>,
    pub taxonomy_label: Option<String>,
}

/// Split a raw taxonomy value into code and label.
///
/// Missing, empty or non-string input yields two nulls. A string that does
/// not look like `<code> - <label>` is used as both code and label.
pub fn extract_taxonomy(raw: Option<&Value>) -> TaxonomyParts {
    let code = match raw {
        Some(Value::String(code)) if !code.is_empty() => code,
        _ => return TaxonomyParts::default(),
    };

    match TAXONOMY_PATTERN.captures(code) {
        Some(caps) => TaxonomyParts {
            taxonomy_code: Some(caps[1].to_string()),
            taxonomy_label: Some(caps[2].trim().to_string()),
        },
        None => TaxonomyParts {
            taxonomy_code: Some(code.clone()),
            taxonomy_label: Some(code.clone()),
        },
    }
}

/// Augment one NPI validation entry with `taxonomyCode` and `taxonomyLabel`
pub fn extract_entry(mut entry: Map<String, Value>) -> NpiTaxonomyEntry {
    let parts = extract_taxonomy(entry.get(keys::CODE));
    entry.insert(
        keys::TAXONOMY_CODE.to_string(),
        parts.taxonomy_code.map_or(Value::Null, Value::String),
    );
    entry.insert(
        keys::TAXONOMY_LABEL.to_string(),
        parts.taxonomy_label.map_or(Value::Null, Value::String),
    );
    NpiTaxonomyEntry::from_map(entry)
}

/// Parse every entry of an NPI validation `licenses` list
pub fn extract_entries(entries: Vec<Value>) -> Result<Vec<NpiTaxonomyEntry>> {
    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| match entry {
            Value::Object(fields) => Ok(extract_entry(fields)),
            other => Err(NormalizeError::malformed_entry("npiValidation.licenses", index, &other)),
        })
        .collect()
}
