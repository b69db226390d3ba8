use crate::id::SpecId;
use crate::types::{MilestoneStatus, SpecType};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Delivery checkpoint grouping requirements and plans.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    pub number: u32,
    pub slug: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub status: MilestoneStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub plans: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reached_at: Option<DateTime<Utc>>,
}

impl Milestone {
    pub fn new(number: u32, slug: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            number,
            slug: slug.into(),
            name: name.into(),
            description: String::new(),
            status: MilestoneStatus::Open,
            target_date: None,
            requirements: Vec::new(),
            plans: Vec::new(),
            created_at: now,
            updated_at: now,
            reached_at: None,
        }
    }

    pub fn id(&self) -> SpecId {
        SpecId::new(SpecType::Milestone, self.number, self.slug.clone())
    }

    /// Add a spec ID to the matching list. Returns `false` if already present.
    pub fn add_ref(&mut self, id: &SpecId) -> bool {
        let list = match id.spec_type {
            SpecType::Requirement => &mut self.requirements,
            SpecType::Plan => &mut self.plans,
            _ => return false,
        };
        let s = id.to_string();
        if list.contains(&s) {
            return false;
        }
        list.push(s);
        self.updated_at = Utc::now();
        true
    }

    pub fn mark_reached(&mut self) {
        self.status = MilestoneStatus::Reached;
        self.reached_at = Some(Utc::now());
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn add_ref_routes_by_type() {
        let mut mil = Milestone::new(1, "beta", "Beta launch");
        let req = SpecId::from_str("req-001-auth").unwrap();
        let pln = SpecId::from_str("pln-001-auth-backend").unwrap();
        let dec = SpecId::from_str("dec-001-db").unwrap();

        assert!(mil.add_ref(&req));
        assert!(mil.add_ref(&pln));
        assert!(!mil.add_ref(&req), "duplicate add is a no-op");
        assert!(!mil.add_ref(&dec), "decisions are not milestone members");

        assert_eq!(mil.requirements, vec!["req-001-auth"]);
        assert_eq!(mil.plans, vec!["pln-001-auth-backend"]);
    }

    #[test]
    fn mark_reached_stamps_time() {
        let mut mil = Milestone::new(2, "ga", "General availability");
        mil.mark_reached();
        assert_eq!(mil.status, MilestoneStatus::Reached);
        assert!(mil.reached_at.is_some());
    }

    #[test]
    fn milestone_yaml_roundtrip() {
        let mut mil = Milestone::new(3, "q3", "Q3 scope");
        mil.target_date = NaiveDate::from_ymd_opt(2026, 9, 30);
        mil.requirements.push("req-002-billing".to_string());

        let yaml = serde_yaml::to_string(&mil).unwrap();
        let back: Milestone = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back.id().to_string(), "mil-003-q3");
        assert_eq!(back.target_date, mil.target_date);
    }
}
