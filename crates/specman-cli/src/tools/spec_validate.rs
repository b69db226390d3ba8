use super::SpecTool;
use specman_core::{config::Config, validate};
use std::path::Path;

pub struct SpecValidateTool;

impl SpecTool for SpecValidateTool {
    fn name(&self) -> &str {
        "spec_validate"
    }

    fn description(&self) -> &str {
        "Check every spec and all cross-references; reports errors and warnings"
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }

    fn call(&self, _args: serde_json::Value, root: &Path) -> Result<serde_json::Value, String> {
        let config = Config::load(root).map_err(|e| e.to_string())?;
        let report =
            validate::validate_project(root, &config.validation).map_err(|e| e.to_string())?;

        Ok(serde_json::json!({
            "clean": report.is_clean(),
            "errors": report.error_count(),
            "warnings": report.warning_count(),
            "findings": report.warnings
        }))
    }
}
