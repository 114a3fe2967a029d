//! Static schema tables for the two gated document kinds.
//!
//! A table lists the top-level fields of a document and, for fields that
//! hold nested objects, the fields each nested object needs. Presence is
//! checked directly from the table; expected value kinds are turned into a
//! JSON Schema document so the shape check can be delegated to `jsonschema`.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// The JSON kind a field is expected to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
}

impl FieldKind {
    fn json_type(self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Integer => "integer",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::Array => "array",
            FieldKind::Object => "object",
        }
    }
}

/// One field declaration.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// `null` is accepted in addition to `kind`.
    pub nullable: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind, required: true, nullable: false }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind, required: false, nullable: true }
    }

    fn json_schema(&self) -> Value {
        if self.nullable {
            json!({ "type": [self.kind.json_type(), "null"] })
        } else {
            json!({ "type": self.kind.json_type() })
        }
    }
}

/// How a nested-object-bearing field holds its objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    /// A list whose every element is an object.
    List,
    /// A single object.
    Object,
}

/// Required fields for the objects held by one top-level field.
#[derive(Debug, Clone, Copy)]
pub struct NestedSpec {
    pub field: &'static str,
    pub container: Container,
    pub fields: &'static [FieldSpec],
}

/// The full declarative description of one document kind.
#[derive(Debug)]
pub struct SchemaTable {
    pub id: &'static str,
    pub fields: &'static [FieldSpec],
    pub nested: &'static [NestedSpec],
}

impl SchemaTable {
    /// JSON Schema covering value kinds only.
    ///
    /// `required` is intentionally left out: presence violations are reported
    /// from the table so they are not counted twice.
    pub fn shape_schema(&self) -> Value {
        let mut properties = Map::new();
        for field in self.fields {
            let mut schema = field.json_schema();
            if let Some(nested) = self.nested.iter().find(|n| n.field == field.name) {
                let inner = properties_of(nested.fields);
                if let Value::Object(map) = &mut schema {
                    match nested.container {
                        Container::List => {
                            map.insert("items".to_string(), json!({ "properties": inner }));
                        }
                        Container::Object => {
                            map.insert("properties".to_string(), inner);
                        }
                    }
                }
            }
            properties.insert(field.name.to_string(), schema);
        }
        json!({ "type": "object", "properties": properties })
    }
}

fn properties_of(fields: &[FieldSpec]) -> Value {
    Value::Object(
        fields
            .iter()
            .map(|f| (f.name.to_string(), f.json_schema()))
            .collect(),
    )
}

use FieldKind::{Array, Boolean, Integer, Number, Object, String as Str};

const SIGNATURE_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("library", Str),
    FieldSpec::required("function", Str),
    FieldSpec::optional("method_chain", Str),
    FieldSpec::required("params", Array),
    FieldSpec::required("param_types", Object),
    FieldSpec::required("defaults", Object),
    FieldSpec::required("imports", Str),
    FieldSpec::required("line", Integer),
    FieldSpec::required("context", Str),
    FieldSpec::optional("raw_code", Str),
];

const EXAMPLE_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("library", Str),
    FieldSpec::required("language", Str),
    FieldSpec::required("code", Str),
    FieldSpec::optional("imports", Str),
    FieldSpec::required("has_main", Boolean),
    FieldSpec::required("is_executable", Boolean),
    FieldSpec::required("line", Integer),
    FieldSpec::required("context", Str),
    FieldSpec::required("dependencies", Array),
];

/// Document analysis written by the extraction agent.
pub static EXTRACTION_TABLE: SchemaTable = SchemaTable {
    id: "document-analysis",
    fields: &[
        FieldSpec::required("page", Str),
        FieldSpec::required("library", Str),
        FieldSpec::optional("version", Str),
        FieldSpec::required("language", Str),
        FieldSpec::required("signatures", Array),
        FieldSpec::required("examples", Array),
        FieldSpec::required("processed_at", Str),
        FieldSpec::required("total_signatures", Integer),
        FieldSpec::required("total_examples", Integer),
        FieldSpec::required("warnings", Array),
        FieldSpec::optional("processing_time_ms", Integer),
    ],
    nested: &[
        NestedSpec { field: "signatures", container: Container::List, fields: SIGNATURE_FIELDS },
        NestedSpec { field: "examples", container: Container::List, fields: EXAMPLE_FIELDS },
    ],
};

const SUMMARY_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("total_signatures", Integer),
    FieldSpec::required("valid", Integer),
    FieldSpec::required("invalid", Integer),
    FieldSpec::required("not_found", Integer),
    FieldSpec::required("error", Integer),
    FieldSpec::required("accuracy_score", Number),
    FieldSpec::required("critical_issues", Integer),
    FieldSpec::required("warnings", Integer),
];

const ENVIRONMENT_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("library_installed", Str),
    FieldSpec::required("version_installed", Str),
    FieldSpec::required("version_requested", Str),
    FieldSpec::required("version_match", Boolean),
    FieldSpec::required("python_version", Str),
    FieldSpec::optional("installation_output", Str),
];

const SIGNATURE_RESULT_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("signature_id", Str),
    FieldSpec::required("function", Str),
    FieldSpec::optional("method_chain", Str),
    FieldSpec::required("library", Str),
    FieldSpec::required("status", Str),
    FieldSpec::required("documented", Object),
    FieldSpec::optional("actual", Object),
    FieldSpec::required("issues", Array),
    FieldSpec::required("confidence", Number),
];

/// Validation report written by the API-signature and code-example agents.
pub static VALIDATION_OUTPUT_TABLE: SchemaTable = SchemaTable {
    id: "validation-output",
    fields: &[
        FieldSpec::required("validation_id", Str),
        FieldSpec::required("validated_at", Str),
        FieldSpec::required("source_file", Str),
        FieldSpec::required("document_page", Str),
        FieldSpec::required("library", Str),
        FieldSpec::required("version", Str),
        FieldSpec::required("language", Str),
        FieldSpec::required("summary", Object),
        FieldSpec::required("validations", Array),
        FieldSpec::required("environment", Object),
        FieldSpec::required("processing_time_ms", Integer),
        FieldSpec::required("warnings", Array),
    ],
    nested: &[
        NestedSpec { field: "summary", container: Container::Object, fields: SUMMARY_FIELDS },
        NestedSpec { field: "environment", container: Container::Object, fields: ENVIRONMENT_FIELDS },
        NestedSpec { field: "validations", container: Container::List, fields: SIGNATURE_RESULT_FIELDS },
    ],
};

/// The gated schemas. Chosen by agent role at composition time, never by
/// inspecting the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Schema {
    Extraction,
    ValidationOutput,
}

impl Schema {
    pub fn table(&self) -> &'static SchemaTable {
        match self {
            Schema::Extraction => &EXTRACTION_TABLE,
            Schema::ValidationOutput => &VALIDATION_OUTPUT_TABLE,
        }
    }

    pub fn id(&self) -> &'static str {
        self.table().id
    }
}
