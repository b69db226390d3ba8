use super::draft_start::draft_status;
use super::SpecTool;
use specman_core::draft::Draft;
use std::path::Path;

pub struct DraftStatusTool;

impl SpecTool for DraftStatusTool {
    fn name(&self) -> &str {
        "draft_status"
    }

    fn description(&self) -> &str {
        "Show a draft's answers and next question, or list all drafts when no ID is given"
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "draft_id": {
                    "type": "string",
                    "description": "Draft ID; omit to list every in-progress draft"
                }
            },
            "required": []
        })
    }

    fn call(&self, args: serde_json::Value, root: &Path) -> Result<serde_json::Value, String> {
        match args["draft_id"].as_str() {
            Some(draft_id) => {
                let draft = Draft::load(root, draft_id).map_err(|e| e.to_string())?;
                Ok(draft_status(&draft))
            }
            None => {
                let drafts = Draft::list(root).map_err(|e| e.to_string())?;
                let statuses: Vec<serde_json::Value> = drafts.iter().map(draft_status).collect();
                Ok(serde_json::json!({ "drafts": statuses }))
            }
        }
    }
}
