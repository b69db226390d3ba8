use super::SpecTool;
use specman_core::{id::SpecId, store};
use std::path::Path;

pub struct SpecSupersedeItemTool;

impl SpecTool for SpecSupersedeItemTool {
    fn name(&self) -> &str {
        "spec_supersede_item"
    }

    fn description(&self) -> &str {
        "Replace an item with a new version; the old one stays in the file with supersession links"
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "id": {
                    "type": "string",
                    "description": "Spec ID holding the item"
                },
                "item_id": {
                    "type": "string",
                    "description": "Item to supersede, e.g. tsk-002"
                },
                "body": {
                    "type": "string",
                    "description": "Replacement content"
                },
                "name": {
                    "type": "string",
                    "description": "Replacement title; named kinds inherit the old title if omitted"
                }
            },
            "required": ["id", "item_id", "body"]
        })
    }

    fn call(&self, args: serde_json::Value, root: &Path) -> Result<serde_json::Value, String> {
        let id_str = args["id"]
            .as_str()
            .ok_or_else(|| "missing required argument: id".to_string())?;
        let item_id = args["item_id"]
            .as_str()
            .ok_or_else(|| "missing required argument: item_id".to_string())?;
        let body = args["body"]
            .as_str()
            .ok_or_else(|| "missing required argument: body".to_string())?;
        let name = args["name"].as_str();

        let id = SpecId::parse(id_str).map_err(|e| e.to_string())?;
        let mut spec = store::load(root, &id).map_err(|e| e.to_string())?;
        let new_id = spec
            .supersede_item(item_id, name, body)
            .map_err(|e| e.to_string())?;
        store::save(root, &spec).map_err(|e| e.to_string())?;

        Ok(serde_json::json!({
            "spec": id.to_string(),
            "superseded": item_id,
            "item_id": new_id
        }))
    }
}
