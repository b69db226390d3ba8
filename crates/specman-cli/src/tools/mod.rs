use std::path::Path;

pub mod draft_answer;
pub mod draft_finalize;
pub mod draft_start;
pub mod draft_status;
pub mod spec_add_item;
pub mod spec_complete_task;
pub mod spec_create;
pub mod spec_delete;
pub mod spec_get;
pub mod spec_list;
pub mod spec_supersede_item;
pub mod spec_update;
pub mod spec_validate;

pub trait SpecTool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn schema(&self) -> serde_json::Value;
    fn call(&self, args: serde_json::Value, root: &Path) -> Result<serde_json::Value, String>;
}

pub fn all_tools() -> Vec<Box<dyn SpecTool>> {
    vec![
        Box::new(spec_create::SpecCreateTool),
        Box::new(spec_get::SpecGetTool),
        Box::new(spec_list::SpecListTool),
        Box::new(spec_update::SpecUpdateTool),
        Box::new(spec_delete::SpecDeleteTool),
        Box::new(spec_add_item::SpecAddItemTool),
        Box::new(spec_supersede_item::SpecSupersedeItemTool),
        Box::new(spec_complete_task::SpecCompleteTaskTool),
        Box::new(spec_validate::SpecValidateTool),
        Box::new(draft_start::DraftStartTool),
        Box::new(draft_answer::DraftAnswerTool),
        Box::new(draft_status::DraftStatusTool),
        Box::new(draft_finalize::DraftFinalizeTool),
    ]
}

#[cfg(test)]
pub(crate) mod testutil {
    use specman_core::{
        config::Config, id::SpecId, plan::Plan, requirement::Requirement, spec::AnySpec, store,
        types,
    };
    use tempfile::TempDir;

    pub fn setup(dir: &TempDir) {
        for spec_type in types::SpecType::all() {
            std::fs::create_dir_all(dir.path().join(".specs").join(spec_type.dir_name())).unwrap();
        }
        std::fs::create_dir_all(dir.path().join(".specs/drafts")).unwrap();
        let config = Config::new("test");
        std::fs::write(
            dir.path().join(".specs/config.yaml"),
            serde_yaml::to_string(&config).unwrap(),
        )
        .unwrap();
    }

    pub fn seed_requirement(dir: &TempDir, slug: &str) -> SpecId {
        let number = store::next_number(dir.path(), types::SpecType::Requirement).unwrap();
        let spec = AnySpec::Requirement(Requirement::new(
            number,
            slug,
            slug,
            types::RequirementKind::Business,
        ));
        store::create(dir.path(), &spec).unwrap();
        spec.id()
    }

    pub fn seed_plan(dir: &TempDir, slug: &str) -> SpecId {
        let number = store::next_number(dir.path(), types::SpecType::Plan).unwrap();
        let spec = AnySpec::Plan(Plan::new(number, slug, slug));
        store::create(dir.path(), &spec).unwrap();
        spec.id()
    }
}
