use super::SpecTool;
use specman_core::{store, types::SpecType};
use std::path::Path;
use std::str::FromStr;

pub struct SpecListTool;

impl SpecTool for SpecListTool {
    fn name(&self) -> &str {
        "spec_list"
    }

    fn description(&self) -> &str {
        "List spec summaries, optionally filtered by type"
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "type": {
                    "type": "string",
                    "description": "Restrict to one spec type; omit for all"
                }
            },
            "required": []
        })
    }

    fn call(&self, args: serde_json::Value, root: &Path) -> Result<serde_json::Value, String> {
        let specs = match args["type"].as_str() {
            Some(t) => {
                let spec_type = SpecType::from_str(t).map_err(|e| e.to_string())?;
                store::list(root, spec_type).map_err(|e| e.to_string())?
            }
            None => store::list_all(root).map_err(|e| e.to_string())?,
        };

        let summaries: Vec<serde_json::Value> = specs
            .iter()
            .map(|s| {
                serde_json::json!({
                    "id": s.id().to_string(),
                    "type": s.spec_type().as_str(),
                    "name": s.name(),
                    "description": s.description(),
                })
            })
            .collect();

        Ok(serde_json::json!({ "specs": summaries }))
    }
}
