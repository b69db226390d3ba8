use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// SpecType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecType {
    Requirement,
    Plan,
    Decision,
    Component,
    Constitution,
    Milestone,
}

impl SpecType {
    pub fn all() -> &'static [SpecType] {
        &[
            SpecType::Requirement,
            SpecType::Plan,
            SpecType::Decision,
            SpecType::Component,
            SpecType::Constitution,
            SpecType::Milestone,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SpecType::Requirement => "requirement",
            SpecType::Plan => "plan",
            SpecType::Decision => "decision",
            SpecType::Component => "component",
            SpecType::Constitution => "constitution",
            SpecType::Milestone => "milestone",
        }
    }

    /// ID prefix, e.g. `req` in `req-001-user-auth`.
    pub fn prefix(self) -> &'static str {
        match self {
            SpecType::Requirement => "req",
            SpecType::Plan => "pln",
            SpecType::Decision => "dec",
            SpecType::Component => "cmp",
            SpecType::Constitution => "con",
            SpecType::Milestone => "mil",
        }
    }

    /// Storage directory under `.specs/`.
    pub fn dir_name(self) -> &'static str {
        match self {
            SpecType::Requirement => "requirements",
            SpecType::Plan => "plans",
            SpecType::Decision => "decisions",
            SpecType::Component => "components",
            SpecType::Constitution => "constitutions",
            SpecType::Milestone => "milestones",
        }
    }

    pub fn from_prefix(prefix: &str) -> Option<SpecType> {
        SpecType::all().iter().copied().find(|t| t.prefix() == prefix)
    }
}

impl fmt::Display for SpecType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SpecType {
    type Err = crate::error::SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "requirement" | "req" => Ok(SpecType::Requirement),
            "plan" | "pln" => Ok(SpecType::Plan),
            "decision" | "dec" => Ok(SpecType::Decision),
            "component" | "cmp" => Ok(SpecType::Component),
            "constitution" | "con" => Ok(SpecType::Constitution),
            "milestone" | "mil" => Ok(SpecType::Milestone),
            _ => Err(crate::error::SpecError::UnknownSpecType(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// RequirementKind / Priority
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementKind {
    Business,
    Technical,
}

impl fmt::Display for RequirementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RequirementKind::Business => "business",
            RequirementKind::Technical => "technical",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for RequirementKind {
    type Err = crate::error::SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "business" => Ok(RequirementKind::Business),
            "technical" => Ok(RequirementKind::Technical),
            _ => Err(invalid_field("kind", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical,
    Required,
    Ideal,
    Optional,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::Critical => "critical",
            Priority::Required => "required",
            Priority::Ideal => "ideal",
            Priority::Optional => "optional",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for Priority {
    type Err = crate::error::SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "critical" => Ok(Priority::Critical),
            "required" => Ok(Priority::Required),
            "ideal" => Ok(Priority::Ideal),
            "optional" => Ok(Priority::Optional),
            _ => Err(invalid_field("priority", s)),
        }
    }
}

// ---------------------------------------------------------------------------
// TaskStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Blocked,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Blocked => "blocked",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// DecisionStatus / ArticleStatus / MilestoneStatus / ComponentKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionStatus {
    #[default]
    Proposed,
    Accepted,
    Superseded,
}

impl fmt::Display for DecisionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DecisionStatus::Proposed => "proposed",
            DecisionStatus::Accepted => "accepted",
            DecisionStatus::Superseded => "superseded",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for DecisionStatus {
    type Err = crate::error::SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "proposed" => Ok(DecisionStatus::Proposed),
            "accepted" => Ok(DecisionStatus::Accepted),
            "superseded" => Ok(DecisionStatus::Superseded),
            _ => Err(invalid_field("status", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArticleStatus {
    #[default]
    Active,
    Archived,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneStatus {
    #[default]
    Open,
    Reached,
    Dropped,
}

impl fmt::Display for MilestoneStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MilestoneStatus::Open => "open",
            MilestoneStatus::Reached => "reached",
            MilestoneStatus::Dropped => "dropped",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    App,
    #[default]
    Service,
    Library,
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ComponentKind::App => "app",
            ComponentKind::Service => "service",
            ComponentKind::Library => "library",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for ComponentKind {
    type Err = crate::error::SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "app" => Ok(ComponentKind::App),
            "service" => Ok(ComponentKind::Service),
            "library" => Ok(ComponentKind::Library),
            _ => Err(invalid_field("component_kind", s)),
        }
    }
}

fn invalid_field(field: &str, value: &str) -> crate::error::SpecError {
    crate::error::SpecError::InvalidField {
        field: field.to_string(),
        reason: format!("unknown value '{value}'"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
