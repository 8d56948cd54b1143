/*!
 * Field resolution tables for provider verification records
 *
 * Upstream records spell the same logical field in two ways: legacy
 * space-separated keys (`"NPI Validation"`) and camelCase keys
 * (`npiValidation`). Each logical field is described once by a
 * [`FieldSpec`] whose alias list is tried in order.
 */

use serde_json::{Map, Value};

use crate::{Result, NormalizeError};

/// Value used when none of a field's aliases is present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDefault {
    /// `[]`
    EmptyList,
    /// `{}`
    EmptyObject,
    /// The field is left out
    Absent,
}

impl FieldDefault {
    /// Materialize the default as a JSON value
    pub fn value(&self) -> Option<Value> {
        match self {
            FieldDefault::EmptyList => Some(Value::Array(Vec::new())),
            FieldDefault::EmptyObject => Some(Value::Object(Map::new())),
            FieldDefault::Absent => None,
        }
    }
}

/// One logical field and the keys it may appear under, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Canonical (output) name of the field
    pub name: &'static str,
    /// Input keys, highest precedence first
    pub aliases: &'static [&'static str],
    /// Fallback when no alias is present
    pub default: FieldDefault,
}

impl FieldSpec {
    pub const fn new(
        name: &'static str,
        aliases: &'static [&'static str],
        default: FieldDefault,
    ) -> Self {
        Self { name, aliases, default }
    }

    /// Find the first alias carrying a value.
    ///
    /// Empty collections count as present; a missing key or JSON `null` does not.
    pub fn lookup<'a>(&self, object: &'a Map<String, Value>) -> Option<(&'static str, &'a Value)> {
        self.aliases
            .iter()
            .find_map(|key| match object.get(*key) {
                None | Some(Value::Null) => None,
                Some(value) => Some((*key, value)),
            })
    }

    /// Find the first alias whose value is set (see [`is_set`]).
    ///
    /// Unlike [`lookup`](Self::lookup), an empty string, `false` or `0` under
    /// one alias gives way to the next.
    pub fn lookup_set<'a>(&self, object: &'a Map<String, Value>) -> Option<&'a Value> {
        self.aliases
            .iter()
            .filter_map(|key| object.get(*key))
            .find(|value| is_set(value))
    }

    /// Resolve the field, falling back to its default
    pub fn resolve(&self, object: &Map<String, Value>) -> Option<Value> {
        match self.lookup(object) {
            Some((_, value)) => Some(value.clone()),
            None => self.default.value(),
        }
    }
}

/// Truthiness as upstream producers apply it: null, false, 0 and "" are unset
pub fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Top-level record fields
pub mod fields {
    use super::{FieldDefault, FieldSpec};

    pub const CMS_PRECLUSION_LIST: FieldSpec = FieldSpec::new(
        "cmsPreclusionList",
        &["CMS Preclusion List", "cmsPreclusionList"],
        FieldDefault::EmptyList,
    );
    pub const EXCLUSIONS: FieldSpec = FieldSpec::new(
        "exclusions",
        &["Exclusions", "exclusions"],
        FieldDefault::EmptyList,
    );
    pub const LICENSES: FieldSpec = FieldSpec::new(
        "licenses",
        &["Licenses", "licenses"],
        FieldDefault::EmptyList,
    );
    pub const NPI_VALIDATION: FieldSpec = FieldSpec::new(
        "npiValidation",
        &["NPI Validation", "npiValidation"],
        FieldDefault::EmptyObject,
    );
    pub const OFAC: FieldSpec = FieldSpec::new(
        "ofac",
        &["OFAC", "ofac"],
        FieldDefault::EmptyList,
    );
    pub const OPT_OUT: FieldSpec = FieldSpec::new(
        "optOut",
        &["Opt Out", "optOut"],
        FieldDefault::EmptyObject,
    );
    pub const PRIMARY_SOURCE_CHECKED_DATES: FieldSpec = FieldSpec::new(
        "primarySourceCheckedDates",
        &["Primary Source Checked Dates", "primarySourceCheckedDates"],
        FieldDefault::EmptyList,
    );
    pub const RESULT_STATUS: FieldSpec = FieldSpec::new(
        "resultStatus",
        &["Result Status", "resultStatus"],
        FieldDefault::Absent,
    );
    pub const SEARCH_HISTORY_ID: FieldSpec = FieldSpec::new(
        "searchHistoryId",
        &["Search History Id", "searchHistoryId"],
        FieldDefault::Absent,
    );
    pub const SEARCH_REQUEST: FieldSpec = FieldSpec::new(
        "searchRequest",
        &["Search Request", "searchRequest"],
        FieldDefault::Absent,
    );
}

/// Fields of the NPI validation object
pub mod npi_fields {
    use super::{FieldDefault, FieldSpec};

    /// Upstream sometimes sends `otherLastNameTypecode` (lowercase "c"); that
    /// spelling wins when set. Resolved with [`FieldSpec::lookup_set`].
    pub const OTHER_LAST_NAME_TYPE_CODE: FieldSpec = FieldSpec::new(
        "otherLastNameTypeCode",
        &["otherLastNameTypecode", "otherLastNameTypeCode"],
        FieldDefault::Absent,
    );
    pub const LICENSES: FieldSpec = FieldSpec::new(
        "licenses",
        &["licenses"],
        FieldDefault::EmptyList,
    );
    pub const NPI: FieldSpec = FieldSpec::new("npi", &["npi"], FieldDefault::Absent);
}

/// All top-level fields in canonical output order
pub const TOP_LEVEL_FIELDS: &[FieldSpec] = &[
    fields::CMS_PRECLUSION_LIST,
    fields::EXCLUSIONS,
    fields::LICENSES,
    fields::NPI_VALIDATION,
    fields::OFAC,
    fields::OPT_OUT,
    fields::PRIMARY_SOURCE_CHECKED_DATES,
    fields::RESULT_STATUS,
    fields::SEARCH_HISTORY_ID,
    fields::SEARCH_REQUEST,
];

/// Keys read from individual license and taxonomy entries
pub mod keys {
    pub const ISSUER: &str = "issuer";
    pub const CATEGORY: &str = "category";
    pub const STATE: &str = "state";
    pub const HAS_BOARD_ACTION: &str = "hasBoardAction";
    pub const ADDITIONAL_INFO: &str = "additionalInfo";
    pub const LICENSE_STATE: &str = "licenseState";
    pub const BOARD_ACTION_DATA: &str = "boardActionData";
    pub const BOARD_ACTION_DETAILS: &str = "boardActionDetails";
    pub const BOARD_ACTION_SCREENSHOT_ID: &str = "boardActionScreenshotId";
    pub const CODE: &str = "code";
    pub const SWITCH: &str = "switch";
    pub const TAXONOMY_CODE: &str = "taxonomyCode";
    pub const TAXONOMY_LABEL: &str = "taxonomyLabel";
    pub const PROVIDER_TYPE_CODE: &str = "providerTypeCode";
    pub const PROVIDER_TYPE_LABEL: &str = "providerTypeLabel";
    pub const NPIS: &str = "npis";
}

/// Read-only view over one JSON object that resolves [`FieldSpec`]s
#[derive(Debug, Clone, Copy)]
pub struct FieldResolver<'a> {
    object: &'a Map<String, Value>,
}

impl<'a> FieldResolver<'a> {
    /// Wrap a raw record, rejecting anything that is not a JSON object
    pub fn new(raw: &'a Value) -> Result<Self> {
        match raw {
            Value::Object(object) => Ok(Self { object }),
            other => Err(NormalizeError::malformed_record(other)),
        }
    }

    /// Wrap an already validated object
    pub fn from_map(object: &'a Map<String, Value>) -> Self {
        Self { object }
    }

    /// The underlying object
    pub fn object(&self) -> &'a Map<String, Value> {
        self.object
    }

    /// Resolve a field to its value or default
    pub fn resolve(&self, spec: &FieldSpec) -> Option<Value> {
        spec.resolve(self.object)
    }

    /// Resolve a list-valued field
    pub fn resolve_list(&self, spec: &FieldSpec) -> Result<Vec<Value>> {
        match self.resolve(spec) {
            Some(Value::Array(items)) => Ok(items),
            None => Ok(Vec::new()),
            Some(other) => Err(NormalizeError::invalid_field(spec.name, "an array", &other)),
        }
    }

    /// Resolve an object-valued field
    pub fn resolve_object(&self, spec: &FieldSpec) -> Result<Map<String, Value>> {
        match self.resolve(spec) {
            Some(Value::Object(object)) => Ok(object),
            None => Ok(Map::new()),
            Some(other) => Err(NormalizeError::invalid_field(spec.name, "an object", &other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_legacy_key_wins() {
        let raw = json!({
            "Licenses": [{"issuer": "Texas"}],
            "licenses": [{"issuer": "Ohio"}],
        });
        let resolver = FieldResolver::new(&raw).unwrap();
        let licenses = resolver.resolve_list(&fields::LICENSES).unwrap();
        assert_eq!(licenses, vec![json!({"issuer": "Texas"})]);
    }

    #[test]
    fn test_empty_legacy_collection_is_present() {
        let raw = json!({"OFAC": [], "ofac": [{"name": "x"}]});
        let resolver = FieldResolver::new(&raw).unwrap();
        assert_eq!(resolver.resolve(&fields::OFAC), Some(json!([])));
    }

    #[test]
    fn test_camel_case_fallback_and_defaults() {
        let raw = json!({"exclusions": [1]});
        let resolver = FieldResolver::new(&raw).unwrap();
        assert_eq!(resolver.resolve(&fields::EXCLUSIONS), Some(json!([1])));
        assert_eq!(resolver.resolve(&fields::OPT_OUT), Some(json!({})));
        assert_eq!(resolver.resolve(&fields::CMS_PRECLUSION_LIST), Some(json!([])));
        assert_eq!(resolver.resolve(&fields::SEARCH_HISTORY_ID), None);
    }

    #[test]
    fn test_null_counts_as_absent() {
        let raw = json!({"Opt Out": null, "optOut": {"optedOut": false}});
        let resolver = FieldResolver::new(&raw).unwrap();
        assert_eq!(resolver.resolve(&fields::OPT_OUT), Some(json!({"optedOut": false})));
    }

    #[test]
    fn test_lookup_set_skips_unset_values() {
        let npi = json!({"otherLastNameTypecode": "", "otherLastNameTypeCode": "5"});
        let npi = npi.as_object().unwrap();
        assert_eq!(npi_fields::OTHER_LAST_NAME_TYPE_CODE.lookup_set(npi), Some(&json!("5")));

        let npi = json!({"otherLastNameTypecode": "2", "otherLastNameTypeCode": "5"});
        let npi = npi.as_object().unwrap();
        assert_eq!(npi_fields::OTHER_LAST_NAME_TYPE_CODE.lookup_set(npi), Some(&json!("2")));

        let npi = json!({"otherLastNameTypecode": "", "otherLastNameTypeCode": 0});
        assert_eq!(npi_fields::OTHER_LAST_NAME_TYPE_CODE.lookup_set(npi.as_object().unwrap()), None);
    }

    #[test]
    fn test_wrong_shapes_are_rejected() {
        assert!(FieldResolver::new(&json!("nope")).is_err());

        let raw = json!({"Licenses": "CA"});
        let resolver = FieldResolver::new(&raw).unwrap();
        assert!(matches!(
            resolver.resolve_list(&fields::LICENSES),
            Err(NormalizeError::InvalidField { .. })
        ));
    }

    #[test]
    fn test_top_level_table_has_unique_names() {
        let mut names: Vec<_> = TOP_LEVEL_FIELDS.iter().map(|f| f.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), TOP_LEVEL_FIELDS.len());
    }
}
