//! # docgate-schema
//!
//! Structural checks for agent writes that produce gated artifacts.
//!
//! [`engine::SchemaValidator`] decides whether a would-be file body is a
//! well-formed extraction analysis or validation report, and whether it is
//! headed for the right directory. It reports every violation it finds in
//! one [`ValidationVerdict`](docgate_contracts::verdict::ValidationVerdict).
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use docgate_schema::{GatedArtifact, SchemaValidator};
//!
//! let target = Path::new("results/quickstart_analysis.json");
//! if let Some(artifact) = GatedArtifact::classify(target) {
//!     let verdict = SchemaValidator::new().validate(
//!         &content,
//!         artifact.schema(),
//!         target,
//!         Some(Path::new("results")),
//!     );
//!     if !verdict.passed {
//!         eprintln!("{}", verdict.summary());
//!     }
//! }
//! ```

pub mod artifact;
pub mod engine;
pub mod location;
pub mod schema;

pub use artifact::{is_write_tool, GatedArtifact};
pub use engine::SchemaValidator;
pub use schema::Schema;

#[cfg(test)]
mod tests {
    use super::schema::{Schema, FieldKind};

    /// Every nested table refers to a declared top-level field of the right kind.
    #[test]
    fn nested_tables_match_their_parent_fields() {
        for schema in [Schema::Extraction, Schema::ValidationOutput] {
            let table = schema.table();
            for nested in table.nested {
                let parent = table
                    .fields
                    .iter()
                    .find(|f| f.name == nested.field)
                    .unwrap_or_else(|| panic!("{}: no field {}", table.id, nested.field));
                let expected = match nested.container {
                    super::schema::Container::List => FieldKind::Array,
                    super::schema::Container::Object => FieldKind::Object,
                };
                assert_eq!(parent.kind, expected, "{}.{}", table.id, nested.field);
            }
        }
    }

    /// The generated shape schema compiles for both tables.
    #[test]
    fn shape_schemas_compile() {
        for schema in [Schema::Extraction, Schema::ValidationOutput] {
            let doc = schema.table().shape_schema();
            assert!(jsonschema::validator_for(&doc).is_ok(), "{}", schema.id());
            assert!(doc.get("required").is_none());
        }
    }
}
