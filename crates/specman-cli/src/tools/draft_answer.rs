use super::draft_start::draft_status;
use super::SpecTool;
use specman_core::draft::Draft;
use std::path::Path;

pub struct DraftAnswerTool;

impl SpecTool for DraftAnswerTool {
    fn name(&self) -> &str {
        "draft_answer"
    }

    fn description(&self) -> &str {
        "Answer the current question on a draft; an empty answer skips an optional question"
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "draft_id": {
                    "type": "string",
                    "description": "Draft ID, e.g. draft-001"
                },
                "text": {
                    "type": "string",
                    "description": "Answer text; list questions take one entry per line"
                }
            },
            "required": ["draft_id", "text"]
        })
    }

    fn call(&self, args: serde_json::Value, root: &Path) -> Result<serde_json::Value, String> {
        let draft_id = args["draft_id"]
            .as_str()
            .ok_or_else(|| "missing required argument: draft_id".to_string())?;
        let text = args["text"]
            .as_str()
            .ok_or_else(|| "missing required argument: text".to_string())?;

        let mut draft = Draft::load(root, draft_id).map_err(|e| e.to_string())?;
        draft.answer(text).map_err(|e| e.to_string())?;
        draft.save(root).map_err(|e| e.to_string())?;

        Ok(draft_status(&draft))
    }
}
