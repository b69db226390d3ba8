use super::SpecTool;
use specman_core::{id::SpecId, store};
use std::path::Path;

pub struct SpecDeleteTool;

impl SpecTool for SpecDeleteTool {
    fn name(&self) -> &str {
        "spec_delete"
    }

    fn description(&self) -> &str {
        "Delete a spec file; its number is never reused"
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "id": {
                    "type": "string",
                    "description": "Spec ID to delete"
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
        store::delete(root, &id).map_err(|e| e.to_string())?;

        Ok(serde_json::json!({ "deleted": id.to_string() }))
    }
}
