/*!
 * License normalization
 *
 * Every license gets a `state` derived from its explicit
 * `additionalInfo.licenseState` or, failing that, from its issuer name.
 * Board actions arrive either as a structured `boardActionData` object or
 * as the legacy `boardActionDetails` / `boardActionScreenshotId` pair; both
 * are folded into the structured shape.
 */

use std::collections::HashMap;

use lazy_static::lazy_static;
use serde_json::{Map, Value};
use tracing::{trace, warn};

use crate::data_types::{BoardActionData, CanonicalLicense};
use crate::schema::{is_set, keys};
use crate::{Result, NormalizeError};

/// Licensing jurisdiction names and their two-letter codes
pub const ISSUER_STATE_CODES: &[(&str, &str)] = &[
    ("Alabama", "AL"), ("Alaska", "AK"), ("Arizona", "AZ"), ("Arkansas", "AR"),
    ("California", "CA"), ("Colorado", "CO"), ("Connecticut", "CT"), ("Delaware", "DE"),
    ("District of Columbia", "DC"), ("Florida", "FL"), ("Georgia", "GA"), ("Hawaii", "HI"),
    ("Idaho", "ID"), ("Illinois", "IL"), ("Indiana", "IN"), ("Iowa", "IA"),
    ("Kansas", "KS"), ("Kentucky", "KY"), ("Louisiana", "LA"), ("Maine", "ME"),
    ("Maryland", "MD"), ("Massachusetts", "MA"), ("Michigan", "MI"), ("Minnesota", "MN"),
    ("Mississippi", "MS"), ("Missouri", "MO"), ("Montana", "MT"), ("Nebraska", "NE"),
    ("Nevada", "NV"), ("New Hampshire", "NH"), ("New Jersey", "NJ"), ("New Mexico", "NM"),
    ("New York", "NY"), ("North Carolina", "NC"), ("North Dakota", "ND"), ("Ohio", "OH"),
    ("Oklahoma", "OK"), ("Oregon", "OR"), ("Pennsylvania", "PA"), ("Rhode Island", "RI"),
    ("South Carolina", "SC"), ("South Dakota", "SD"), ("Tennessee", "TN"), ("Texas", "TX"),
    ("Utah", "UT"), ("Vermont", "VT"), ("Virginia", "VA"), ("Washington", "WA"),
    ("West Virginia", "WV"), ("Wisconsin", "WI"), ("Wyoming", "WY"),
    // Territories
    ("American Samoa", "AS"), ("Guam", "GU"), ("Northern Mariana Islands", "MP"),
    ("Puerto Rico", "PR"), ("U.S. Virgin Islands", "VI"), ("Virgin Islands", "VI"),
];

lazy_static! {
    static ref ISSUER_TO_STATE: HashMap<&'static str, &'static str> =
        ISSUER_STATE_CODES.iter().copied().collect();
}

/// Look up an issuer in the built-in jurisdiction table (exact match)
pub fn builtin_state_code(issuer: &str) -> Option<&'static str> {
    ISSUER_TO_STATE.get(issuer).copied()
}

/// Issuer → state lookup: caller-provided aliases first, then the built-in table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JurisdictionTable {
    aliases: HashMap<String, String>,
}

impl JurisdictionTable {
    /// Table with only the built-in entries
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with extra issuer → code entries layered over the built-in ones
    pub fn with_aliases<I, K, V>(aliases: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            aliases: aliases.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    pub fn lookup(&self, issuer: &str) -> Option<&str> {
        self.aliases
            .get(issuer)
            .map(String::as_str)
            .or_else(|| builtin_state_code(issuer))
    }
}

/// Derive the jurisdiction code of a license.
///
/// An explicit `additionalInfo.licenseState` always wins, even when it
/// disagrees with the issuer.
pub fn derive_state(license: &Map<String, Value>, table: &JurisdictionTable) -> Option<String> {
    let explicit = license
        .get(keys::ADDITIONAL_INFO)
        .and_then(|info| info.get(keys::LICENSE_STATE))
        .filter(|state| is_set(state));

    match explicit {
        Some(Value::String(state)) => return Some(state.clone()),
        Some(other) => {
            warn!(value = %other, "ignoring non-string additionalInfo.licenseState");
        }
        None => {}
    }

    license
        .get(keys::ISSUER)
        .and_then(Value::as_str)
        .and_then(|issuer| table.lookup(issuer))
        .map(str::to_string)
}

/// Pick the single structured board-action value for a license.
///
/// An existing structured value is returned unchanged; the legacy fields are
/// only used to build one when none exists.
pub fn unify_board_action(
    existing: Option<Value>,
    details: Option<Value>,
    screenshot_id: Option<Value>,
) -> Option<Value> {
    if let Some(existing) = existing.filter(|value| !value.is_null()) {
        return Some(existing);
    }

    let details = details.filter(is_set);
    let screenshot_id = screenshot_id.filter(is_set);
    if details.is_none() && screenshot_id.is_none() {
        return None;
    }

    let data = BoardActionData {
        board_action_screenshot_ids: screenshot_id.into_iter().collect(),
        board_action_texts: details.into_iter().collect(),
    };
    Some(data.into_value())
}

/// Normalize one raw license object
pub fn normalize_license(mut license: Map<String, Value>, table: &JurisdictionTable) -> CanonicalLicense {
    match derive_state(&license, table) {
        Some(state) => {
            license.insert(keys::STATE.to_string(), Value::String(state));
        }
        None => {
            if license.shift_remove(keys::STATE).is_some() {
                trace!("dropping state that could not be derived");
            }
        }
    }

    let details = license.shift_remove(keys::BOARD_ACTION_DETAILS);
    let screenshot_id = license.shift_remove(keys::BOARD_ACTION_SCREENSHOT_ID);
    let existing = license.get(keys::BOARD_ACTION_DATA).cloned();
    match unify_board_action(existing, details, screenshot_id) {
        Some(data) => {
            license.insert(keys::BOARD_ACTION_DATA.to_string(), data);
        }
        None => {
            license.shift_remove(keys::BOARD_ACTION_DATA);
        }
    }

    CanonicalLicense::from_map(license)
}

/// Normalize a raw `licenses` list, rejecting non-object entries
pub fn normalize_licenses(licenses: Vec<Value>, table: &JurisdictionTable) -> Result<Vec<CanonicalLicense>> {
    licenses
        .into_iter()
        .enumerate()
        .map(|(index, license)| match license {
            Value::Object(fields) => Ok(normalize_license(fields, table)),
            other => Err(NormalizeError::malformed_entry("licenses", index, &other)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn normalize(value: Value) -> CanonicalLicense {
        normalize_license(value.as_object().cloned().unwrap(), &JurisdictionTable::new())
    }

    #[test]
    fn test_explicit_state_wins_over_issuer() {
        let license = normalize(json!({
            "issuer": "Texas",
            "additionalInfo": {"licenseState": "CA"},
        }));
        assert_eq!(license.state(), Some("CA"));
    }

    #[test]
    fn test_state_from_issuer() {
        let license = normalize(json!({"issuer": "Michigan", "category": "MD"}));
        assert_eq!(license.state(), Some("MI"));

        let license = normalize(json!({"issuer": "Michigan", "additionalInfo": {"licenseState": ""}}));
        assert_eq!(license.state(), Some("MI"));
    }

    #[test]
    fn test_unknown_issuer_has_no_state() {
        let license = normalize(json!({"issuer": "Board of Somewhere", "additionalInfo": {}}));
        assert!(license.get("state").is_none());

        let license = normalize(json!({"category": "RN"}));
        assert!(license.get("state").is_none());
    }

    #[test]
    fn test_aliases_extend_the_table() {
        let table = JurisdictionTable::with_aliases([("Medical Board of California", "CA")]);
        assert_eq!(table.lookup("Medical Board of California"), Some("CA"));
        assert_eq!(table.lookup("Ohio"), Some("OH"));
        assert_eq!(table.lookup("ohio"), None);
    }

    #[test]
    fn test_details_become_board_action_data() {
        let license = normalize(json!({
            "issuer": "Florida",
            "hasBoardAction": true,
            "boardActionDetails": "Reprimand",
        }));
        assert_eq!(
            license.board_action_data(),
            Some(&json!({"boardActionScreenshotIds": [], "boardActionTexts": ["Reprimand"]}))
        );
        assert!(license.get("boardActionDetails").is_none());
        assert!(license.get("boardActionScreenshotId").is_none());
    }

    #[test]
    fn test_screenshot_only_keeps_empty_texts() {
        let license = normalize(json!({"boardActionScreenshotId": "shot-1"}));
        assert_eq!(
            license.board_action_data(),
            Some(&json!({"boardActionScreenshotIds": ["shot-1"], "boardActionTexts": []}))
        );
    }

    #[test]
    fn test_existing_board_action_data_is_kept() {
        let license = normalize(json!({
            "boardActionData": {"a": 1},
            "boardActionDetails": "stray text",
            "boardActionScreenshotId": "stray-id",
        }));
        assert_eq!(license.board_action_data(), Some(&json!({"a": 1})));
        assert!(license.get("boardActionDetails").is_none());
        assert!(license.get("boardActionScreenshotId").is_none());
    }

    #[test]
    fn test_no_board_action_payload() {
        let license = normalize(json!({"issuer": "Ohio", "hasBoardAction": false}));
        assert!(license.board_action_data().is_none());

        let license = normalize(json!({"boardActionDetails": "", "boardActionScreenshotId": null}));
        assert!(license.board_action_data().is_none());
        assert!(license.get("boardActionDetails").is_none());
    }

    #[test]
    fn test_key_order_is_preserved() {
        let license = normalize(json!({
            "issuer": "Texas",
            "boardActionDetails": "Probation",
            "category": "MD",
        }));
        let keys: Vec<&str> = license.as_map().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["issuer", "category", "state", "boardActionData"]);
    }

    #[test]
    fn test_unify_board_action_precedence() {
        assert_eq!(unify_board_action(None, None, None), None);
        assert_eq!(
            unify_board_action(Some(json!({"x": true})), Some(json!("t")), Some(json!("s"))),
            Some(json!({"x": true}))
        );
        assert_eq!(
            unify_board_action(None, Some(json!("t")), Some(json!("s"))),
            Some(json!({"boardActionScreenshotIds": ["s"], "boardActionTexts": ["t"]}))
        );
    }

    #[test]
    fn test_non_object_license_is_rejected() {
        let err = normalize_licenses(vec![json!(42)], &JurisdictionTable::new()).unwrap_err();
        assert!(matches!(err, NormalizeError::MalformedEntry { index: 0, .. }));
    }
}
