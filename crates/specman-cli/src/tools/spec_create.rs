use super::SpecTool;
use specman_core::{
    component::Component,
    constitution::Constitution,
    decision::Decision,
    milestone::Milestone,
    plan::Plan,
    requirement::Requirement,
    spec::AnySpec,
    store,
    types::{RequirementKind, SpecType},
};
use std::path::Path;
use std::str::FromStr;

pub struct SpecCreateTool;

impl SpecTool for SpecCreateTool {
    fn name(&self) -> &str {
        "spec_create"
    }

    fn description(&self) -> &str {
        "Create a new spec of the given type with an auto-assigned number"
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "type": {
                    "type": "string",
                    "description": "Spec type: requirement, plan, decision, component, constitution, or milestone"
                },
                "slug": {
                    "type": "string",
                    "description": "Lowercase identifier, e.g. 'user-login'"
                },
                "name": {
                    "type": "string",
                    "description": "Human-readable name (defaults to the slug)"
                },
                "description": {
                    "type": "string",
                    "description": "What this spec covers"
                },
                "kind": {
                    "type": "string",
                    "description": "For requirements: business or technical (default business)"
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
        let name = args["name"]
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| slug.replace('-', " "));

        let spec_type = SpecType::from_str(type_str).map_err(|e| e.to_string())?;
        let number = store::next_number(root, spec_type).map_err(|e| e.to_string())?;

        let mut spec = match spec_type {
            SpecType::Requirement => {
                let kind = args["kind"].as_str().unwrap_or("business");
                let kind = RequirementKind::from_str(kind).map_err(|e| e.to_string())?;
                AnySpec::Requirement(Requirement::new(number, slug, &name, kind))
            }
            SpecType::Plan => AnySpec::Plan(Plan::new(number, slug, &name)),
            SpecType::Decision => AnySpec::Decision(Decision::new(number, slug, &name)),
            SpecType::Component => AnySpec::Component(Component::new(number, slug, &name)),
            SpecType::Constitution => AnySpec::Constitution(Constitution::new(number, slug, &name)),
            SpecType::Milestone => AnySpec::Milestone(Milestone::new(number, slug, &name)),
        };
        if let Some(desc) = args["description"].as_str() {
            spec.set_description(desc.to_string());
        }

        store::create(root, &spec).map_err(|e| e.to_string())?;

        Ok(serde_json::json!({
            "id": spec.id().to_string(),
            "type": spec_type.as_str(),
            "name": name
        }))
    }
}
