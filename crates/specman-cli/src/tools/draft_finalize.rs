use super::SpecTool;
use specman_core::draft::Draft;
use std::path::Path;

pub struct DraftFinalizeTool;

impl SpecTool for DraftFinalizeTool {
    fn name(&self) -> &str {
        "draft_finalize"
    }

    fn description(&self) -> &str {
        "Turn a completed draft into a real spec and remove the draft"
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "draft_id": {
                    "type": "string",
                    "description": "Draft ID to finalize"
                }
            },
            "required": ["draft_id"]
        })
    }

    fn call(&self, args: serde_json::Value, root: &Path) -> Result<serde_json::Value, String> {
        let draft_id = args["draft_id"]
            .as_str()
            .ok_or_else(|| "missing required argument: draft_id".to_string())?;

        let draft = Draft::load(root, draft_id).map_err(|e| e.to_string())?;
        let id = draft.finalize(root).map_err(|e| e.to_string())?;

        Ok(serde_json::json!({
            "draft": draft_id,
            "spec": id.to_string()
        }))
    }
}
