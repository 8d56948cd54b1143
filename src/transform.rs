/*!
 * Record assembly
 *
 * Runs the pipeline stages over one raw record and composes the canonical
 * record. The transform is a pure function of its input: nothing is cached
 * between calls, so one [`Normalizer`] can be shared freely across threads.
 */

use serde_json::{Map, Value};
use tracing::{debug, debug_span};

use crate::analytics::{resolve_npi, ProfileAnalytics};
use crate::config::NormalizeConfig;
use crate::data_types::*;
use crate::license::{normalize_licenses, JurisdictionTable};
use crate::schema::{fields, keys, npi_fields, FieldResolver, TOP_LEVEL_FIELDS};
use crate::taxonomy::extract_entries;
use crate::Result;

/// Transforms raw provider verification records into canonical records
///
/// # Example
/// ```
/// # use provider_normalize::Normalizer;
/// # use serde_json::json;
/// let raw = json!({
///     "Licenses": [{"issuer": "Michigan", "category": "MD", "hasBoardAction": false}],
///     "resultStatus": "complete",
/// });
/// let record = Normalizer::new().transform(&raw)?;
/// assert_eq!(record.profile_metadata.states, vec!["MI"]);
/// # Ok::<(), provider_normalize::NormalizeError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    jurisdictions: JurisdictionTable,
}

impl Normalizer {
    /// Normalizer using only the built-in jurisdiction table
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizer honoring the configured issuer aliases
    pub fn with_config(config: &NormalizeConfig) -> Self {
        Self {
            jurisdictions: config.jurisdiction_table(),
        }
    }

    /// Transform one raw record.
    ///
    /// Fails without partial output when the record, its license list, or its
    /// NPI validation object has the wrong shape.
    pub fn transform(&self, raw: &Value) -> Result<CanonicalRecord> {
        let _span = debug_span!("transform").entered();
        let resolver = FieldResolver::new(raw)?;
        log_unrecognized_fields(resolver.object());

        let licenses = normalize_licenses(resolver.resolve_list(&fields::LICENSES)?, &self.jurisdictions)?;

        let npi_raw = resolver.resolve_object(&fields::NPI_VALIDATION)?;
        let taxonomy = extract_entries(FieldResolver::from_map(&npi_raw).resolve_list(&npi_fields::LICENSES)?)?;

        let result_status = resolver.resolve(&fields::RESULT_STATUS);
        let search_request = resolver.resolve(&fields::SEARCH_REQUEST);
        let npi = resolve_npi(&npi_raw, search_request.as_ref());

        let profile_metadata = ProfileAnalytics::new(&licenses)
            .with_taxonomy(&taxonomy)
            .profile_metadata(npi, result_status.clone());

        debug!(
            licenses = licenses.len(),
            taxonomy_entries = taxonomy.len(),
            has_board_action = profile_metadata.has_board_action,
            states = ?profile_metadata.states,
            "normalized provider record"
        );

        let npi_validation = assemble_npi_validation(npi_raw, taxonomy, &profile_metadata);

        Ok(CanonicalRecord {
            profile_metadata,
            cms_preclusion_list: resolve_or_null(&resolver, &fields::CMS_PRECLUSION_LIST),
            exclusions: resolve_or_null(&resolver, &fields::EXCLUSIONS),
            licenses,
            npi_validation,
            ofac: resolve_or_null(&resolver, &fields::OFAC),
            opt_out: resolve_or_null(&resolver, &fields::OPT_OUT),
            primary_source_checked_dates: resolve_or_null(&resolver, &fields::PRIMARY_SOURCE_CHECKED_DATES),
            result_status,
            search_history_id: resolver.resolve(&fields::SEARCH_HISTORY_ID),
            search_request,
        })
    }
}

/// Transform one raw record with the default configuration
pub fn transform(raw: &Value) -> Result<CanonicalRecord> {
    Normalizer::new().transform(raw)
}

fn resolve_or_null(resolver: &FieldResolver<'_>, spec: &crate::schema::FieldSpec) -> Value {
    resolver.resolve(spec).unwrap_or(Value::Null)
}

/// Build the canonical NPI validation object from the raw one.
///
/// Upstream fields keep their order; the derived fields are written after
/// them and the misspelled `otherLastNameTypecode` key is dropped.
fn assemble_npi_validation(
    mut npi: Map<String, Value>,
    taxonomy: Vec<NpiTaxonomyEntry>,
    profile: &ProfileMetadata,
) -> NpiValidation {
    let other_last_name_type_code = npi_fields::OTHER_LAST_NAME_TYPE_CODE
        .lookup_set(&npi)
        .cloned()
        .unwrap_or(Value::Null);

    npi.insert(
        npi_fields::OTHER_LAST_NAME_TYPE_CODE.name.to_string(),
        other_last_name_type_code,
    );
    npi.insert(
        keys::PROVIDER_TYPE_LABEL.to_string(),
        profile.provider_type_label.clone().unwrap_or(Value::Null),
    );
    npi.insert(
        keys::PROVIDER_TYPE_CODE.to_string(),
        profile.provider_type_code.clone().map_or(Value::Null, Value::String),
    );
    npi.insert(
        npi_fields::LICENSES.name.to_string(),
        Value::Array(
            taxonomy
                .into_iter()
                .map(|entry| Value::Object(entry.into_map()))
                .collect(),
        ),
    );
    npi.shift_remove("otherLastNameTypecode");

    NpiValidation::from_map(npi)
}

fn log_unrecognized_fields(object: &Map<String, Value>) {
    for key in object.keys() {
        let known = TOP_LEVEL_FIELDS
            .iter()
            .any(|spec| spec.aliases.contains(&key.as_str()));
        if !known {
            debug!(field = %key, "dropping unrecognized top-level field");
        }
    }
}
