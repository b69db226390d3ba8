use super::SpecTool;
use specman_core::{draft::Draft, types::SpecType};
use std::path::Path;
use std::str::FromStr;

pub struct DraftStartTool;

impl SpecTool for DraftStartTool {
    fn name(&self) -> &str {
        "draft_start"
    }

    fn description(&self) -> &str {
        "Begin a guided draft for a new spec; returns the first question"
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "type": {
                    "type": "string",
                    "description": "Spec type to draft"
                },
                "slug": {
                    "type": "string",
                    "description": "Lowercase identifier for the eventual spec"
                }
            },
            "required": ["type", "slug"]
        })
    }

    fn call(&self, args: serde_json::Value, root: &Path) -> Result<serde_json::Value, String> {
        let type_str = args["type"]
            .as_str()
            .ok_or_else(|| "missing required argument: type".to_string())?;
        let slug = args["slug"]
            .as_str()
            .ok_or_else(|| "missing required argument: slug".to_string())?;

        let spec_type = SpecType::from_str(type_str).map_err(|e| e.to_string())?;
        let draft = Draft::start(root, spec_type, slug).map_err(|e| e.to_string())?;

        Ok(draft_status(&draft))
    }
}

pub(super) fn draft_status(draft: &Draft) -> serde_json::Value {
    serde_json::json!({
        "draft_id": &draft.id,
        "type": draft.spec_type.as_str(),
        "slug": &draft.slug,
        "answers": &draft.answers,
        "complete": draft.is_complete(),
        "next_question": draft.current_question().map(|q| serde_json::json!({
            "key": q.key,
            "prompt": q.prompt,
            "required": q.required
        }))
    })
}
