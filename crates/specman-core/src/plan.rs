use crate::id::SpecId;
use crate::item::{self, SpecItem, Supersession};
use crate::types::{SpecType, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Task
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub depends_on: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub links: Supersession,
}

impl Task {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            description: description.into(),
            status: TaskStatus::Pending,
            depends_on: Vec::new(),
            completed_at: None,
            links: Supersession::default(),
        }
    }
}

impl SpecItem for Task {
    const PREFIX: &'static str = "tsk";

    fn id(&self) -> &str {
        &self.id
    }
    fn set_id(&mut self, id: String) {
        self.id = id;
    }
    fn supersession(&self) -> &Supersession {
        &self.links
    }
    fn supersession_mut(&mut self) -> &mut Supersession {
        &mut self.links
    }
    fn rewrite_refs(&mut self, old: &str, new: &str) {
        item::rewrite_ref_list(&mut self.depends_on, old, new);
    }
}

// ---------------------------------------------------------------------------
// TestCase / Flow / ApiContract / DataModel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    pub id: String,
    pub description: String,
    /// Tasks this case exercises (`tsk-NNN`).
    #[serde(default)]
    pub covers: Vec<String>,
    #[serde(flatten)]
    pub links: Supersession,
}

impl TestCase {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            description: description.into(),
            covers: Vec::new(),
            links: Supersession::default(),
        }
    }
}

impl SpecItem for TestCase {
    const PREFIX: &'static str = "tc";

    fn id(&self) -> &str {
        &self.id
    }
    fn set_id(&mut self, id: String) {
        self.id = id;
    }
    fn supersession(&self) -> &Supersession {
        &self.links
    }
    fn supersession_mut(&mut self) -> &mut Supersession {
        &mut self.links
    }
    fn rewrite_refs(&mut self, old: &str, new: &str) {
        item::rewrite_ref_list(&mut self.covers, old, new);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flow {
    pub id: String,
    pub name: String,
    /// Ordered step descriptions.
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(flatten)]
    pub links: Supersession,
}

impl Flow {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            steps: Vec::new(),
            links: Supersession::default(),
        }
    }
}

impl SpecItem for Flow {
    const PREFIX: &'static str = "flw";

    fn id(&self) -> &str {
        &self.id
    }
    fn set_id(&mut self, id: String) {
        self.id = id;
    }
    fn supersession(&self) -> &Supersession {
        &self.links
    }
    fn supersession_mut(&mut self) -> &mut Supersession {
        &mut self.links
    }
    fn rewrite_refs(&mut self, _old: &str, _new: &str) {}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiContract {
    pub id: String,
    pub name: String,
    /// Free-form signature or endpoint description.
    pub contract: String,
    #[serde(flatten)]
    pub links: Supersession,
}

impl ApiContract {
    pub fn new(name: impl Into<String>, contract: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            contract: contract.into(),
            links: Supersession::default(),
        }
    }
}

impl SpecItem for ApiContract {
    const PREFIX: &'static str = "api";

    fn id(&self) -> &str {
        &self.id
    }
    fn set_id(&mut self, id: String) {
        self.id = id;
    }
    fn supersession(&self) -> &Supersession {
        &self.links
    }
    fn supersession_mut(&mut self) -> &mut Supersession {
        &mut self.links
    }
    fn rewrite_refs(&mut self, _old: &str, _new: &str) {}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataModel {
    pub id: String,
    pub name: String,
    /// Field list or schema sketch.
    pub shape: String,
    #[serde(flatten)]
    pub links: Supersession,
}

impl DataModel {
    pub fn new(name: impl Into<String>, shape: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            shape: shape.into(),
            links: Supersession::default(),
        }
    }
}

impl SpecItem for DataModel {
    const PREFIX: &'static str = "dm";

    fn id(&self) -> &str {
        &self.id
    }
    fn set_id(&mut self, id: String) {
        self.id = id;
    }
    fn supersession(&self) -> &Supersession {
        &self.links
    }
    fn supersession_mut(&mut self) -> &mut Supersession {
        &mut self.links
    }
    fn rewrite_refs(&mut self, _old: &str, _new: &str) {}
}

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub number: u32,
    pub slug: String,
    pub name: String,
    pub description: String,
    /// Item refs into requirement criteria, e.g. `req-001-auth/crt-002`.
    #[serde(default)]
    pub criteria_refs: Vec<String>,
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flows: Vec<Flow>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub api_contracts: Vec<ApiContract>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data_models: Vec<DataModel>,
    #[serde(default)]
    pub depends_on: Vec<String>,
    #[serde(default)]
    pub approved: bool,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Plan {
    pub fn new(number: u32, slug: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            number,
            slug: slug.into(),
            name: name.into(),
            description: String::new(),
            criteria_refs: Vec::new(),
            tasks: Vec::new(),
            test_cases: Vec::new(),
            flows: Vec::new(),
            api_contracts: Vec::new(),
            data_models: Vec::new(),
            depends_on: Vec::new(),
            approved: false,
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> SpecId {
        SpecId::new(SpecType::Plan, self.number, self.slug.clone())
    }

    pub fn add_task(&mut self, description: impl Into<String>) -> String {
        let id = item::push_item(&mut self.tasks, Task::new(description));
        self.updated_at = Utc::now();
        id
    }

    pub fn approve(&mut self) {
        self.approved = true;
        self.updated_at = Utc::now();
    }

    /// Mark a task completed. Errors if the task is missing; superseded tasks
    /// resolve to their current version first.
    pub fn complete_task(&mut self, task_id: &str) -> crate::Result<String> {
        let current_id = item::resolve_current(&self.tasks, task_id)
            .map(|t| t.id.clone())
            .ok_or_else(|| crate::SpecError::ItemNotFound(task_id.to_string()))?;
        let task = item::find_mut(&mut self.tasks, &current_id)
            .ok_or_else(|| crate::SpecError::ItemNotFound(task_id.to_string()))?;
        task.status = TaskStatus::Completed;
        task.completed_at = Some(Utc::now());
        self.updated_at = Utc::now();
        self.completed = item::active(&self.tasks).all(|t| t.status == TaskStatus::Completed)
            && self.tasks.iter().any(|t| t.links.is_active());
        Ok(current_id)
    }

    /// Next active task with all dependencies completed.
    pub fn next_task(&self) -> Option<&Task> {
        let done: std::collections::HashSet<&str> = self
            .tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Completed)
            .map(|t| t.id.as_str())
            .collect();

        item::active(&self.tasks).find(|t| {
            matches!(t.status, TaskStatus::Pending | TaskStatus::InProgress)
                && t.depends_on.iter().all(|d| done.contains(d.as_str()))
        })
    }

    /// "3/5 tasks completed" over active tasks only.
    pub fn progress(&self) -> String {
        let total = item::active(&self.tasks).count();
        let done = item::active(&self.tasks)
            .filter(|t| t.status == TaskStatus::Completed)
            .count();
        format!("{done}/{total} tasks completed")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
