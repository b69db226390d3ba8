use super::SpecTool;
use specman_core::{id::SpecId, store};
use std::path::Path;

pub struct SpecCompleteTaskTool;

impl SpecTool for SpecCompleteTaskTool {
    fn name(&self) -> &str {
        "spec_complete_task"
    }

    fn description(&self) -> &str {
        "Mark a plan task completed; superseded task IDs resolve to their current replacement"
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "plan": {
                    "type": "string",
                    "description": "Plan ID, e.g. pln-001-build-login"
                },
                "task_id": {
                    "type": "string",
                    "description": "Task ID, e.g. tsk-001"
                }
            },
            "required": ["plan", "task_id"]
        })
    }

    fn call(&self, args: serde_json::Value, root: &Path) -> Result<serde_json::Value, String> {
        let plan_str = args["plan"]
            .as_str()
            .ok_or_else(|| "missing required argument: plan".to_string())?;
        let task_id = args["task_id"]
            .as_str()
            .ok_or_else(|| "missing required argument: task_id".to_string())?;

        let id = SpecId::parse(plan_str).map_err(|e| e.to_string())?;
        let mut spec = store::load(root, &id).map_err(|e| e.to_string())?;
        let plan = spec
            .as_plan_mut()
            .ok_or_else(|| format!("not a plan: {plan_str}"))?;

        let completed = plan.complete_task(task_id).map_err(|e| e.to_string())?;
        let progress = plan.progress();
        let done = plan.completed;
        store::save(root, &spec).map_err(|e| e.to_string())?;

        Ok(serde_json::json!({
            "plan": id.to_string(),
            "completed": completed,
            "progress": progress,
            "plan_completed": done
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testutil::{seed_plan, setup};
    use crate::tools::spec_add_item::SpecAddItemTool;
    use crate::tools::spec_supersede_item::SpecSupersedeItemTool;
    use tempfile::TempDir;

    #[test]
    fn complete_task_marks_done_and_finishes_plan() {
        let dir = TempDir::new().unwrap();
        setup(&dir);
        let id = seed_plan(&dir, "build-login");
        SpecAddItemTool
            .call(
                serde_json::json!({"id": id.to_string(), "kind": "task", "body": "Write the handler"}),
                dir.path(),
            )
            .unwrap();

        let tool = SpecCompleteTaskTool;
        let result = tool
            .call(
                serde_json::json!({"plan": id.to_string(), "task_id": "tsk-001"}),
                dir.path(),
            )
            .unwrap();

        assert_eq!(result["completed"], "tsk-001");
        assert_eq!(result["plan_completed"], true);
    }

    #[test]
    fn complete_superseded_task_resolves_to_replacement() {
        let dir = TempDir::new().unwrap();
        setup(&dir);
        let id = seed_plan(&dir, "build-login");
        SpecAddItemTool
            .call(
                serde_json::json!({"id": id.to_string(), "kind": "task", "body": "old task"}),
                dir.path(),
            )
            .unwrap();
        SpecSupersedeItemTool
            .call(
                serde_json::json!({"id": id.to_string(), "item_id": "tsk-001", "body": "new task"}),
                dir.path(),
            )
            .unwrap();

        let tool = SpecCompleteTaskTool;
        let result = tool
            .call(
                serde_json::json!({"plan": id.to_string(), "task_id": "tsk-001"}),
                dir.path(),
            )
            .unwrap();

        assert_eq!(result["completed"], "tsk-002");
    }

    #[test]
    fn complete_task_on_non_plan_errors() {
        let dir = TempDir::new().unwrap();
        setup(&dir);
        let id = crate::tools::testutil::seed_requirement(&dir, "login");

        let tool = SpecCompleteTaskTool;
        let err = tool
            .call(
                serde_json::json!({"plan": id.to_string(), "task_id": "tsk-001"}),
                dir.path(),
            )
            .unwrap_err();
        assert!(err.contains("not a plan"));
    }
}
