//! Gated artifact recognition by filename.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::schema::Schema;

/// Tools whose calls write a file named by `tool_input.file_path`.
pub const WRITE_TOOLS: &[&str] = &["Write"];

const EXTRACTION_RESULT_SUFFIX: &str = "_analysis.json";
const EXTRACTION_SUMMARY_NAME: &str = "extraction_summary.json";
const VALIDATION_RESULT_SUFFIX: &str = "_validation.json";

/// An output file whose contents must pass a schema before it is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatedArtifact {
    /// `<document>_analysis.json`
    ExtractionResult,
    /// `extraction_summary.json`
    ExtractionSummary,
    /// `<document>_validation.json`
    ValidationResult,
}

impl GatedArtifact {
    /// Classify `path` by its final component. Ungated files yield `None`.
    pub fn classify(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        if name == EXTRACTION_SUMMARY_NAME {
            Some(GatedArtifact::ExtractionSummary)
        } else if name.ends_with(EXTRACTION_RESULT_SUFFIX) {
            Some(GatedArtifact::ExtractionResult)
        } else if name.ends_with(VALIDATION_RESULT_SUFFIX) {
            Some(GatedArtifact::ValidationResult)
        } else {
            None
        }
    }

    /// The schema this artifact's contents are checked against.
    pub fn schema(&self) -> Schema {
        match self {
            GatedArtifact::ExtractionResult | GatedArtifact::ExtractionSummary => Schema::Extraction,
            GatedArtifact::ValidationResult => Schema::ValidationOutput,
        }
    }
}

/// True if `tool_name` is one of the file-writing tools.
pub fn is_write_tool(tool_name: &str) -> bool {
    WRITE_TOOLS.contains(&tool_name)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{is_write_tool, GatedArtifact};
    use crate::schema::Schema;

    #[test]
    fn classifies_extraction_outputs() {
        assert_eq!(
            GatedArtifact::classify(Path::new("/out/quickstart_analysis.json")),
            Some(GatedArtifact::ExtractionResult)
        );
        assert_eq!(
            GatedArtifact::classify(Path::new("extraction_summary.json")),
            Some(GatedArtifact::ExtractionSummary)
        );
        assert_eq!(
            GatedArtifact::ExtractionSummary.schema(),
            Schema::Extraction
        );
    }

    #[test]
    fn classifies_validation_output() {
        let artifact = GatedArtifact::classify(Path::new("/out/api/quickstart_validation.json"));
        assert_eq!(artifact, Some(GatedArtifact::ValidationResult));
        assert_eq!(artifact.unwrap().schema(), Schema::ValidationOutput);
    }

    #[test]
    fn other_files_are_ungated() {
        for name in ["notes.md", "analysis.json", "x_analysis.json.bak", "validation.txt", "/out/"] {
            assert_eq!(GatedArtifact::classify(Path::new(name)), None, "{name}");
        }
    }

    #[test]
    fn only_write_is_a_write_tool() {
        assert!(is_write_tool("Write"));
        assert!(!is_write_tool("Read"));
        assert!(!is_write_tool("write"));
    }
}
