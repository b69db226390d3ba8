use super::SpecTool;
use specman_core::{id::SpecId, store};
use std::path::Path;

pub struct SpecGetTool;

impl SpecTool for SpecGetTool {
    fn name(&self) -> &str {
        "spec_get"
    }

    fn description(&self) -> &str {
        "Fetch one spec in full, including superseded item history"
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "id": {
                    "type": "string",
                    "description": "Spec ID, e.g. req-001-user-login"
                }
            },
            "required": ["id"]
        })
    }

    fn call(&self, args: serde_json::Value, root: &Path) -> Result<serde_json::Value, String> {
        let id_str = args["id"]
            .as_str()
            .ok_or_else(|| "missing required argument: id".to_string())?;

        let id = SpecId::parse(id_str).map_err(|e| e.to_string())?;
        let spec = store::load(root, &id).map_err(|e| e.to_string())?;
        serde_json::to_value(&spec).map_err(|e| e.to_string())
    }
}
