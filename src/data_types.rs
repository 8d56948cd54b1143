/*!
 * Data type definitions for canonical provider verification records
 *
 * Upstream entries carry many fields this library never interprets, so
 * licenses, taxonomy entries and the NPI validation object wrap the raw JSON
 * object and expose typed accessors for the fields the pipeline reads.
 * Profile metadata and the assembled record are fully typed.
 */

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::schema::keys;

/// Structured board-action payload of a license
///
/// Only ever written into a license object, via [`BoardActionData::into_value`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoardActionData {
    pub board_action_screenshot_ids: Vec<Value>,
    pub board_action_texts: Vec<Value>,
}

impl BoardActionData {
    pub fn into_value(self) -> Value {
        let mut object = Map::new();
        object.insert(
            "boardActionScreenshotIds".to_string(),
            Value::Array(self.board_action_screenshot_ids),
        );
        object.insert(
            "boardActionTexts".to_string(),
            Value::Array(self.board_action_texts),
        );
        Value::Object(object)
    }
}

/// A license after jurisdiction derivation and board-action unification
///
/// Serializes as the underlying JSON object, in input key order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalLicense(Map<String, Value>);

impl CanonicalLicense {
    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Two-letter jurisdiction code, if one was derived
    pub fn state(&self) -> Option<&str> {
        self.0.get(keys::STATE).and_then(Value::as_str)
    }

    pub fn issuer(&self) -> Option<&Value> {
        self.0.get(keys::ISSUER)
    }

    pub fn category(&self) -> Option<&Value> {
        self.0.get(keys::CATEGORY)
    }

    /// True only for a literal JSON `true`
    pub fn has_board_action(&self) -> bool {
        matches!(self.0.get(keys::HAS_BOARD_ACTION), Some(Value::Bool(true)))
    }

    pub fn board_action_data(&self) -> Option<&Value> {
        self.0.get(keys::BOARD_ACTION_DATA)
    }
}

/// An NPI validation taxonomy entry with its parsed code and label
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NpiTaxonomyEntry(Map<String, Value>);

impl NpiTaxonomyEntry {
    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Raw taxonomy code as sent upstream
    pub fn code(&self) -> Option<&Value> {
        self.0.get(keys::CODE)
    }

    /// Whether this entry is flagged as the primary taxonomy
    pub fn is_primary(&self) -> bool {
        self.0.get(keys::SWITCH).and_then(Value::as_str) == Some("Yes")
    }

    pub fn taxonomy_code(&self) -> Option<&str> {
        self.0.get(keys::TAXONOMY_CODE).and_then(Value::as_str)
    }

    pub fn taxonomy_label(&self) -> Option<&str> {
        self.0.get(keys::TAXONOMY_LABEL).and_then(Value::as_str)
    }
}

/// The canonical NPI validation object
///
/// Keeps every upstream field and adds the resolved provider type and
/// parsed taxonomy entries.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NpiValidation(Map<String, Value>);

impl NpiValidation {
    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn other_last_name_type_code(&self) -> Option<&Value> {
        self.0.get("otherLastNameTypeCode")
    }

    pub fn provider_type_code(&self) -> Option<&str> {
        self.0.get(keys::PROVIDER_TYPE_CODE).and_then(Value::as_str)
    }

    pub fn provider_type_label(&self) -> Option<&str> {
        self.0.get(keys::PROVIDER_TYPE_LABEL).and_then(Value::as_str)
    }

    /// Taxonomy entries stored under `licenses`
    pub fn taxonomy_entries(&self) -> Vec<NpiTaxonomyEntry> {
        match self.0.get("licenses") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_object().cloned().map(NpiTaxonomyEntry::from_map))
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Profile-level summary derived from the normalized licenses and taxonomy
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub npi: Option<Value>,
    pub provider_type_code: Option<String>,
    /// Primary taxonomy label, or its raw code when no label was parsed
    pub provider_type_label: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_status: Option<Value>,
    pub has_board_action: bool,
    /// Sorted, distinct license states
    pub states: Vec<String>,
    /// Sorted, distinct license categories; a missing category is `null`, listed last
    pub categories: Vec<Value>,
    /// Sorted, distinct license issuers; a missing issuer is `null`, listed last
    pub issuers: Vec<Value>,
}

/// The assembled, caller-facing record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalRecord {
    pub profile_metadata: ProfileMetadata,
    pub cms_preclusion_list: Value,
    pub exclusions: Value,
    pub licenses: Vec<CanonicalLicense>,
    pub npi_validation: NpiValidation,
    pub ofac: Value,
    pub opt_out: Value,
    pub primary_source_checked_dates: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_status: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_history_id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_request: Option<Value>,
}

impl CanonicalRecord {
    /// Convert to a JSON value
    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn license(value: Value) -> CanonicalLicense {
        CanonicalLicense::from_map(value.as_object().cloned().unwrap())
    }

    #[test]
    fn test_has_board_action_requires_literal_true() {
        assert!(license(json!({"hasBoardAction": true})).has_board_action());
        assert!(!license(json!({"hasBoardAction": "true"})).has_board_action());
        assert!(!license(json!({"hasBoardAction": 1})).has_board_action());
        assert!(!license(json!({})).has_board_action());
    }

    #[test]
    fn test_board_action_data_shape() {
        let data = BoardActionData {
            board_action_screenshot_ids: vec![],
            board_action_texts: vec![json!("Reprimand")],
        };
        assert_eq!(
            data.into_value(),
            json!({"boardActionScreenshotIds": [], "boardActionTexts": ["Reprimand"]})
        );
    }

    #[test]
    fn test_primary_switch() {
        let entry = NpiTaxonomyEntry::from_map(json!({"switch": "Yes"}).as_object().cloned().unwrap());
        assert!(entry.is_primary());
        let entry = NpiTaxonomyEntry::from_map(json!({"switch": "yes"}).as_object().cloned().unwrap());
        assert!(!entry.is_primary());
    }

    #[test]
    fn test_profile_metadata_serialization() {
        let metadata = ProfileMetadata {
            npi: None,
            provider_type_code: None,
            provider_type_label: None,
            result_status: None,
            has_board_action: false,
            states: vec![],
            categories: vec![json!("MD"), Value::Null],
            issuers: vec![],
        };
        assert_eq!(
            serde_json::to_value(&metadata).unwrap(),
            json!({
                "providerTypeCode": null,
                "providerTypeLabel": null,
                "hasBoardAction": false,
                "states": [],
                "categories": ["MD", null],
                "issuers": [],
            })
        );
    }
}
