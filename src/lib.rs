/*!
 * # Provider Verification Record Normalizer
 *
 * A Rust library for turning heterogeneous provider-verification records
 * (state licenses, NPI taxonomy data, exclusions, sanctions lists) into one
 * canonical, query-friendly shape for downstream indexing and retrieval.
 *
 * ## Features
 *
 * - **Dual naming conventions**: legacy keys (`"NPI Validation"`) and
 *   camelCase keys (`npiValidation`) resolve through one field table
 * - **Jurisdiction derivation**: every license gets a two-letter `state`
 * - **Board-action unification**: legacy board-action fields fold into a
 *   single structured `boardActionData`
 * - **Taxonomy parsing**: `"2084N0400X - Psychiatry & Neurology"` becomes a
 *   separate code and label
 * - **Profile metadata**: provider type, board-action flag and the distinct
 *   states, categories and issuers across all licenses
 *
 * ## Quick Start
 *
 * ```
 * use provider_normalize::prelude::*;
 * use serde_json::json;
 *
 * # fn main() -> Result<()> {
 * let raw = json!({
 *     "Licenses": [
 *         {"issuer": "Texas", "category": "MD", "hasBoardAction": true,
 *          "boardActionDetails": "Reprimand"}
 *     ],
 *     "NPI Validation": {
 *         "npi": "1234567890",
 *         "licenses": [{"code": "2084N0400X - Psychiatry & Neurology", "switch": "Yes"}]
 *     }
 * });
 *
 * let record = transform(&raw)?;
 * assert_eq!(record.profile_metadata.states, vec!["TX"]);
 * assert_eq!(record.profile_metadata.provider_type_code.as_deref(), Some("2084N0400X"));
 * assert!(record.profile_metadata.has_board_action);
 * # Ok(())
 * # }
 * ```
 *
 * ## Files In, Files Out
 *
 * ```no_run
 * # use provider_normalize::prelude::*;
 * # fn main() -> Result<()> {
 * let config = NormalizeConfig::load();
 * let raw = load_record("sample.json")?;
 * let record = Normalizer::with_config(&config).transform(&raw)?;
 * JsonExporter::from_config(&config).export(&record, "sample_canonical.json")?;
 * # Ok(())
 * # }
 * ```
 */

// Re-export error types from root
pub use error::{NormalizeError, Result, ErrorContext};
pub use transform::{transform, Normalizer};

// Public modules
pub mod data_types;
pub mod schema;
pub mod error;
pub mod license;
pub mod taxonomy;
pub mod analytics;
pub mod transform;
pub mod reader;
pub mod export;
pub mod config;

/// Prelude module for convenient imports
///
/// Import everything you need with:
/// ```
/// use provider_normalize::prelude::*;
/// ```
pub mod prelude {
    pub use crate::data_types::*;
    pub use crate::error::{NormalizeError, Result};
    pub use crate::transform::{transform, Normalizer};
    pub use crate::reader::{load_record, parse_record, read_record};
    pub use crate::export::JsonExporter;
    pub use crate::config::{ConfigBuilder, NormalizeConfig};
    pub use crate::analytics::ProfileAnalytics;
    pub use crate::taxonomy::{extract_taxonomy, TaxonomyParts};
}
