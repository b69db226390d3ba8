use super::SpecTool;
use specman_core::{id::SpecId, item::ItemKind, store};
use std::path::Path;
use std::str::FromStr;

pub struct SpecAddItemTool;

impl SpecTool for SpecAddItemTool {
    fn name(&self) -> &str {
        "spec_add_item"
    }

    fn description(&self) -> &str {
        "Add a sub-item (criterion, task, test case, flow, API contract, data model, or article) to a spec"
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "id": {
                    "type": "string",
                    "description": "Spec ID to add the item to"
                },
                "kind": {
                    "type": "string",
                    "description": "Item kind: criterion, task, test_case, flow, api_contract, data_model, or article"
                },
                "body": {
                    "type": "string",
                    "description": "Description, principle, contract, or newline-separated steps"
                },
                "name": {
                    "type": "string",
                    "description": "Title for named kinds (flows, contracts, data models, articles)"
                }
            },
            "required": ["id", "kind", "body"]
        })
    }

    fn call(&self, args: serde_json::Value, root: &Path) -> Result<serde_json::Value, String> {
        let id_str = args["id"]
            .as_str()
            .ok_or_else(|| "missing required argument: id".to_string())?;
        let kind_str = args["kind"]
            .as_str()
            .ok_or_else(|| "missing required argument: kind".to_string())?;
        let body = args["body"]
            .as_str()
            .ok_or_else(|| "missing required argument: body".to_string())?;
        let name = args["name"].as_str();

        let id = SpecId::parse(id_str).map_err(|e| e.to_string())?;
        let kind = ItemKind::from_str(kind_str).map_err(|e| e.to_string())?;

        let mut spec = store::load(root, &id).map_err(|e| e.to_string())?;
        let item_id = spec.add_item(kind, name, body).map_err(|e| e.to_string())?;
        store::save(root, &spec).map_err(|e| e.to_string())?;

        Ok(serde_json::json!({
            "spec": id.to_string(),
            "item_id": item_id
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testutil::{seed_plan, seed_requirement, setup};
    use tempfile::TempDir;

    #[test]
    fn add_criterion_to_requirement() {
        let dir = TempDir::new().unwrap();
        setup(&dir);
        let id = seed_requirement(&dir, "login");

        let tool = SpecAddItemTool;
        let result = tool
            .call(
                serde_json::json!({
                    "id": id.to_string(),
                    "kind": "criterion",
                    "body": "Users can sign in with email and password"
                }),
                dir.path(),
            )
            .unwrap();

        assert_eq!(result["item_id"], "crt-001");

        let loaded = store::load(dir.path(), &id).unwrap();
        let req = match loaded {
            specman_core::spec::AnySpec::Requirement(r) => r,
            _ => panic!("expected requirement"),
        };
        assert_eq!(req.criteria.len(), 1);
    }

    #[test]
    fn add_task_ids_are_sequential() {
        let dir = TempDir::new().unwrap();
        setup(&dir);
        let id = seed_plan(&dir, "build-login");

        let tool = SpecAddItemTool;
        tool.call(
            serde_json::json!({"id": id.to_string(), "kind": "task", "body": "First"}),
            dir.path(),
        )
        .unwrap();
        let result = tool
            .call(
                serde_json::json!({"id": id.to_string(), "kind": "task", "body": "Second"}),
                dir.path(),
            )
            .unwrap();

        assert_eq!(result["item_id"], "tsk-002");
    }

    #[test]
    fn add_wrong_kind_for_type_errors() {
        let dir = TempDir::new().unwrap();
        setup(&dir);
        let id = seed_requirement(&dir, "login");

        let tool = SpecAddItemTool;
        let err = tool
            .call(
                serde_json::json!({"id": id.to_string(), "kind": "task", "body": "nope"}),
                dir.path(),
            )
            .unwrap_err();
        assert!(!err.is_empty());
    }

    #[test]
    fn add_named_kind_requires_name() {
        let dir = TempDir::new().unwrap();
        setup(&dir);
        let id = seed_plan(&dir, "build-login");

        let tool = SpecAddItemTool;
        let err = tool
            .call(
                serde_json::json!({"id": id.to_string(), "kind": "flow", "body": "step one"}),
                dir.path(),
            )
            .unwrap_err();
        assert!(!err.is_empty());
    }
}
