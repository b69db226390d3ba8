use super::SpecTool;
use specman_core::{id::SpecId, store};
use std::path::Path;

pub struct SpecUpdateTool;

impl SpecTool for SpecUpdateTool {
    fn name(&self) -> &str {
        "spec_update"
    }

    fn description(&self) -> &str {
        "Update a spec's name or description; items change through spec_add_item and spec_supersede_item"
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "id": {
                    "type": "string",
                    "description": "Spec ID"
                },
                "name": {
                    "type": "string",
                    "description": "New name"
                },
                "description": {
                    "type": "string",
                    "description": "New description"
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
        let mut spec = store::load(root, &id).map_err(|e| e.to_string())?;

        if let Some(name) = args["name"].as_str() {
            spec.set_name(name.to_string());
        }
        if let Some(description) = args["description"].as_str() {
            spec.set_description(description.to_string());
        }
        store::save(root, &spec).map_err(|e| e.to_string())?;

        Ok(serde_json::json!({
            "id": id.to_string(),
            "name": spec.name(),
            "description": spec.description()
        }))
    }
}
