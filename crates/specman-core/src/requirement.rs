use crate::id::SpecId;
use crate::item::{self, SpecItem, Supersession};
use crate::types::{Priority, RequirementKind, SpecType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Criterion
// ---------------------------------------------------------------------------

/// Acceptance criterion (`crt-NNN`). Plans cover criteria via item refs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Criterion {
    pub id: String,
    pub description: String,
    #[serde(flatten)]
    pub links: Supersession,
}

impl Criterion {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            description: description.into(),
            links: Supersession::default(),
        }
    }
}

impl SpecItem for Criterion {
    const PREFIX: &'static str = "crt";

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
// Requirement
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Requirement {
    pub number: u32,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub kind: RequirementKind,
    pub priority: Priority,
    pub criteria: Vec<Criterion>,
    #[serde(default)]
    pub depends_on: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Requirement {
    pub fn new(
        number: u32,
        slug: impl Into<String>,
        name: impl Into<String>,
        kind: RequirementKind,
    ) -> Self {
        let now = Utc::now();
        Self {
            number,
            slug: slug.into(),
            name: name.into(),
            description: String::new(),
            kind,
            priority: Priority::Required,
            criteria: Vec::new(),
            depends_on: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> SpecId {
        SpecId::new(SpecType::Requirement, self.number, self.slug.clone())
    }

    pub fn add_criterion(&mut self, description: impl Into<String>) -> String {
        let id = item::push_item(&mut self.criteria, Criterion::new(description));
        self.updated_at = Utc::now();
        id
    }

    pub fn active_criteria(&self) -> Vec<&Criterion> {
        item::active(&self.criteria).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
