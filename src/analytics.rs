/*!
 * Profile-level analytics over normalized licenses
 *
 * Derives the summary fields that downstream indexing slices on: primary
 * provider type, board-action presence and the distinct jurisdictions,
 * categories and issuers across all licenses.
 */

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Map, Value};

use crate::data_types::*;
use crate::schema::{keys, npi_fields};

/// Analytics engine for one provider's normalized data
pub struct ProfileAnalytics<'a> {
    /// Normalized licenses
    licenses: &'a [CanonicalLicense],
    /// Parsed NPI validation taxonomy entries
    taxonomy: &'a [NpiTaxonomyEntry],
}

impl<'a> ProfileAnalytics<'a> {
    /// Create a new analytics engine over normalized licenses
    pub fn new(licenses: &'a [CanonicalLicense]) -> Self {
        Self {
            licenses,
            taxonomy: &[],
        }
    }

    /// Add parsed taxonomy entries for provider type selection
    pub fn with_taxonomy(mut self, taxonomy: &'a [NpiTaxonomyEntry]) -> Self {
        self.taxonomy = taxonomy;
        self
    }

    /// The entry switched to "Yes", else the first entry
    pub fn primary_taxonomy(&self) -> Option<&'a NpiTaxonomyEntry> {
        self.taxonomy
            .iter()
            .find(|entry| entry.is_primary())
            .or_else(|| self.taxonomy.first())
    }

    /// Taxonomy code of the primary entry
    pub fn provider_type_code(&self) -> Option<String> {
        self.primary_taxonomy()
            .and_then(NpiTaxonomyEntry::taxonomy_code)
            .filter(|code| !code.is_empty())
            .map(str::to_string)
    }

    /// Label of the primary entry, falling back to its raw code as sent
    pub fn provider_type_label(&self) -> Option<Value> {
        let primary = self.primary_taxonomy()?;
        match primary.taxonomy_label().filter(|label| !label.is_empty()) {
            Some(label) => Some(Value::String(label.to_string())),
            None => primary.code().filter(|code| !code.is_null()).cloned(),
        }
    }

    /// True if any license carries `hasBoardAction: true`
    pub fn has_board_action(&self) -> bool {
        self.licenses.iter().any(CanonicalLicense::has_board_action)
    }

    /// Distinct, sorted license states; licenses without one are skipped
    pub fn states(&self) -> Vec<String> {
        self.licenses
            .iter()
            .filter_map(CanonicalLicense::state)
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct, sorted license categories
    pub fn categories(&self) -> Vec<Value> {
        distinct_sorted(self.licenses.iter().map(CanonicalLicense::category))
    }

    /// Distinct, sorted license issuers
    pub fn issuers(&self) -> Vec<Value> {
        distinct_sorted(self.licenses.iter().map(CanonicalLicense::issuer))
    }

    /// Build the full profile metadata
    pub fn profile_metadata(&self, npi: Option<Value>, result_status: Option<Value>) -> ProfileMetadata {
        ProfileMetadata {
            npi,
            provider_type_code: self.provider_type_code(),
            provider_type_label: self.provider_type_label(),
            result_status,
            has_board_action: self.has_board_action(),
            states: self.states(),
            categories: self.categories(),
            issuers: self.issuers(),
        }
    }
}

/// Distinct values in lexicographic order of their text.
///
/// Values keep their JSON type, so `5` and `"5"` stay separate entries (the
/// string first). Missing and `null` values collapse into a single `null`
/// listed last.
fn distinct_sorted<'v, I>(values: I) -> Vec<Value>
where
    I: Iterator<Item = Option<&'v Value>>,
{
    let mut present: BTreeMap<(String, bool), Value> = BTreeMap::new();
    let mut missing = false;

    for value in values {
        match value {
            None | Some(Value::Null) => missing = true,
            Some(value) => {
                present.entry(sort_key(value)).or_insert_with(|| value.clone());
            }
        }
    }

    let mut result: Vec<Value> = present.into_values().collect();
    if missing {
        result.push(Value::Null);
    }
    result
}

fn sort_key(value: &Value) -> (String, bool) {
    match value {
        Value::String(s) => (s.clone(), false),
        other => (other.to_string(), true),
    }
}

/// The provider's NPI: the validation object's `npi`, else the first searched NPI
pub fn resolve_npi(npi_validation: &Map<String, Value>, search_request: Option<&Value>) -> Option<Value> {
    npi_fields::NPI
        .lookup_set(npi_validation)
        .or_else(|| {
            search_request
                .and_then(|request| request.get(keys::NPIS))
                .and_then(|npis| npis.get(0))
                .filter(|npi| !npi.is_null())
        })
        .cloned()
}
