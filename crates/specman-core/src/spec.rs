use crate::component::Component;
use crate::constitution::Constitution;
use crate::decision::Decision;
use crate::id::SpecId;
use crate::milestone::Milestone;
use crate::plan::Plan;
use crate::requirement::Requirement;
use crate::types::SpecType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Any persisted entity. The YAML `type` field selects the variant, so a file
/// is self-describing independent of the directory it sits in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnySpec {
    Requirement(Requirement),
    Plan(Plan),
    Decision(Decision),
    Component(Component),
    Constitution(Constitution),
    Milestone(Milestone),
}

impl AnySpec {
    pub fn spec_type(&self) -> SpecType {
        match self {
            AnySpec::Requirement(_) => SpecType::Requirement,
            AnySpec::Plan(_) => SpecType::Plan,
            AnySpec::Decision(_) => SpecType::Decision,
            AnySpec::Component(_) => SpecType::Component,
            AnySpec::Constitution(_) => SpecType::Constitution,
            AnySpec::Milestone(_) => SpecType::Milestone,
        }
    }

    pub fn id(&self) -> SpecId {
        match self {
            AnySpec::Requirement(s) => s.id(),
            AnySpec::Plan(s) => s.id(),
            AnySpec::Decision(s) => s.id(),
            AnySpec::Component(s) => s.id(),
            AnySpec::Constitution(s) => s.id(),
            AnySpec::Milestone(s) => s.id(),
        }
    }

    pub fn number(&self) -> u32 {
        self.id().number
    }

    pub fn name(&self) -> &str {
        match self {
            AnySpec::Requirement(s) => &s.name,
            AnySpec::Plan(s) => &s.name,
            AnySpec::Decision(s) => &s.name,
            AnySpec::Component(s) => &s.name,
            AnySpec::Constitution(s) => &s.name,
            AnySpec::Milestone(s) => &s.name,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            AnySpec::Requirement(s) => &s.description,
            AnySpec::Plan(s) => &s.description,
            AnySpec::Decision(s) => &s.description,
            AnySpec::Component(s) => &s.description,
            AnySpec::Constitution(s) => &s.description,
            AnySpec::Milestone(s) => &s.description,
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        match self {
            AnySpec::Requirement(s) => s.name = name,
            AnySpec::Plan(s) => s.name = name,
            AnySpec::Decision(s) => s.name = name,
            AnySpec::Component(s) => s.name = name,
            AnySpec::Constitution(s) => s.name = name,
            AnySpec::Milestone(s) => s.name = name,
        }
        self.touch();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        let description = description.into();
        match self {
            AnySpec::Requirement(s) => s.description = description,
            AnySpec::Plan(s) => s.description = description,
            AnySpec::Decision(s) => s.description = description,
            AnySpec::Component(s) => s.description = description,
            AnySpec::Constitution(s) => s.description = description,
            AnySpec::Milestone(s) => s.description = description,
        }
        self.touch();
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            AnySpec::Requirement(s) => s.created_at,
            AnySpec::Plan(s) => s.created_at,
            AnySpec::Decision(s) => s.created_at,
            AnySpec::Component(s) => s.created_at,
            AnySpec::Constitution(s) => s.created_at,
            AnySpec::Milestone(s) => s.created_at,
        }
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        match self {
            AnySpec::Requirement(s) => s.updated_at,
            AnySpec::Plan(s) => s.updated_at,
            AnySpec::Decision(s) => s.updated_at,
            AnySpec::Component(s) => s.updated_at,
            AnySpec::Constitution(s) => s.updated_at,
            AnySpec::Milestone(s) => s.updated_at,
        }
    }

    pub fn touch(&mut self) {
        let now = Utc::now();
        match self {
            AnySpec::Requirement(s) => s.updated_at = now,
            AnySpec::Plan(s) => s.updated_at = now,
            AnySpec::Decision(s) => s.updated_at = now,
            AnySpec::Component(s) => s.updated_at = now,
            AnySpec::Constitution(s) => s.updated_at = now,
            AnySpec::Milestone(s) => s.updated_at = now,
        }
    }

    // Typed accessors for call sites that know what they loaded.

    pub fn as_requirement_mut(&mut self) -> Option<&mut Requirement> {
        match self {
            AnySpec::Requirement(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_plan(&self) -> Option<&Plan> {
        match self {
            AnySpec::Plan(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_plan_mut(&mut self) -> Option<&mut Plan> {
        match self {
            AnySpec::Plan(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_decision_mut(&mut self) -> Option<&mut Decision> {
        match self {
            AnySpec::Decision(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_constitution_mut(&mut self) -> Option<&mut Constitution> {
        match self {
            AnySpec::Constitution(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_milestone_mut(&mut self) -> Option<&mut Milestone> {
        match self {
            AnySpec::Milestone(s) => Some(s),
            _ => None,
        }
    }

    // ---------------------------------------------------------------------------
    // Generic item operations (shared by CLI and MCP tools)
    // ---------------------------------------------------------------------------

    /// Append a sub-item of `kind`. `name` is the title for named kinds
    /// (flows, api contracts, data models, articles); `body` is the
    /// description, contract, shape, or principle. Returns the item ID.
    pub fn add_item(
        &mut self,
        kind: crate::item::ItemKind,
        name: Option<&str>,
        body: &str,
    ) -> crate::Result<String> {
        use crate::item::ItemKind;

        let id = match (&mut *self, kind) {
            (AnySpec::Requirement(req), ItemKind::Criterion) => req.add_criterion(body),
            (AnySpec::Plan(plan), ItemKind::Task) => plan.add_task(body),
            (AnySpec::Plan(plan), ItemKind::TestCase) => {
                crate::item::push_item(&mut plan.test_cases, crate::plan::TestCase::new(body))
            }
            (AnySpec::Plan(plan), ItemKind::Flow) => {
                let mut flow = crate::plan::Flow::new(required_name(name, kind)?);
                flow.steps = split_lines(body);
                crate::item::push_item(&mut plan.flows, flow)
            }
            (AnySpec::Plan(plan), ItemKind::ApiContract) => crate::item::push_item(
                &mut plan.api_contracts,
                crate::plan::ApiContract::new(required_name(name, kind)?, body),
            ),
            (AnySpec::Plan(plan), ItemKind::DataModel) => crate::item::push_item(
                &mut plan.data_models,
                crate::plan::DataModel::new(required_name(name, kind)?, body),
            ),
            (AnySpec::Constitution(con), ItemKind::Article) => {
                con.add_article(required_name(name, kind)?, body)
            }
            (spec, kind) => return Err(wrong_item_kind(spec, kind)),
        };
        self.touch();
        Ok(id)
    }

    /// Supersede the item `item_id` with a replacement built from `name`
    /// and `body`. The kind is inferred from the ID prefix; named kinds
    /// inherit the old item's name when `name` is omitted. Returns the
    /// replacement's ID.
    pub fn supersede_item(
        &mut self,
        item_id: &str,
        name: Option<&str>,
        body: &str,
    ) -> crate::Result<String> {
        use crate::item::ItemKind;

        let kind = ItemKind::from_item_id(item_id)
            .ok_or_else(|| crate::SpecError::ItemNotFound(item_id.to_string()))?;

        let new_id = match (&mut *self, kind) {
            (AnySpec::Requirement(req), ItemKind::Criterion) => crate::item::supersede(
                &mut req.criteria,
                item_id,
                crate::requirement::Criterion::new(body),
            )?,
            (AnySpec::Plan(plan), ItemKind::Task) => {
                crate::item::supersede(&mut plan.tasks, item_id, crate::plan::Task::new(body))?
            }
            (AnySpec::Plan(plan), ItemKind::TestCase) => crate::item::supersede(
                &mut plan.test_cases,
                item_id,
                crate::plan::TestCase::new(body),
            )?,
            (AnySpec::Plan(plan), ItemKind::Flow) => {
                let inherited = inherit_name(name, || {
                    crate::item::find(&plan.flows, item_id).map(|f| f.name.clone())
                })?;
                let mut flow = crate::plan::Flow::new(inherited);
                flow.steps = split_lines(body);
                crate::item::supersede(&mut plan.flows, item_id, flow)?
            }
            (AnySpec::Plan(plan), ItemKind::ApiContract) => {
                let inherited = inherit_name(name, || {
                    crate::item::find(&plan.api_contracts, item_id).map(|a| a.name.clone())
                })?;
                crate::item::supersede(
                    &mut plan.api_contracts,
                    item_id,
                    crate::plan::ApiContract::new(inherited, body),
                )?
            }
            (AnySpec::Plan(plan), ItemKind::DataModel) => {
                let inherited = inherit_name(name, || {
                    crate::item::find(&plan.data_models, item_id).map(|d| d.name.clone())
                })?;
                crate::item::supersede(
                    &mut plan.data_models,
                    item_id,
                    crate::plan::DataModel::new(inherited, body),
                )?
            }
            (AnySpec::Constitution(con), ItemKind::Article) => {
                let inherited = inherit_name(name, || {
                    crate::item::find(&con.articles, item_id).map(|a| a.title.clone())
                })?;
                crate::item::supersede(
                    &mut con.articles,
                    item_id,
                    crate::constitution::Article::new(inherited, body),
                )?
            }
            (spec, kind) => return Err(wrong_item_kind(spec, kind)),
        };
        self.touch();
        Ok(new_id)
    }
}

fn required_name(name: Option<&str>, kind: crate::item::ItemKind) -> crate::Result<String> {
    name.map(String::from)
        .ok_or_else(|| crate::SpecError::InvalidField {
            field: "name".to_string(),
            reason: format!("required for {} items", kind.prefix()),
        })
}

fn inherit_name(
    name: Option<&str>,
    old: impl FnOnce() -> Option<String>,
) -> crate::Result<String> {
    match name {
        Some(n) => Ok(n.to_string()),
        None => old().ok_or_else(|| crate::SpecError::InvalidField {
            field: "name".to_string(),
            reason: "old item not found to inherit name from".to_string(),
        }),
    }
}

fn split_lines(body: &str) -> Vec<String> {
    body.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

fn wrong_item_kind(spec: &AnySpec, kind: crate::item::ItemKind) -> crate::SpecError {
    crate::SpecError::InvalidField {
        field: "item_kind".to_string(),
        reason: format!(
            "{} specs do not carry {} items",
            spec.spec_type(),
            kind.prefix()
        ),
    }
}
