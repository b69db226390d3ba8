use crate::id::SpecId;
use crate::types::{DecisionStatus, SpecType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Architecture/product decision record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    pub number: u32,
    pub slug: String,
    pub name: String,
    pub description: String,
    /// The decision itself, one sentence.
    pub decision: String,
    /// Forces that led to it.
    pub context: String,
    #[serde(default)]
    pub status: DecisionStatus,
    #[serde(default)]
    pub consequences: Vec<String>,
    #[serde(default)]
    pub alternatives: Vec<String>,
    /// Spec IDs this decision constrains.
    #[serde(default)]
    pub affects: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Decision {
    pub fn new(number: u32, slug: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            number,
            slug: slug.into(),
            name: name.into(),
            description: String::new(),
            decision: String::new(),
            context: String::new(),
            status: DecisionStatus::Proposed,
            consequences: Vec::new(),
            alternatives: Vec::new(),
            affects: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> SpecId {
        SpecId::new(SpecType::Decision, self.number, self.slug.clone())
    }

    pub fn accept(&mut self) {
        self.status = DecisionStatus::Accepted;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decision_accept() {
        let mut dec = Decision::new(1, "use-postgres", "Use Postgres");
        assert_eq!(dec.status, DecisionStatus::Proposed);
        dec.accept();
        assert_eq!(dec.status, DecisionStatus::Accepted);
        assert_eq!(dec.id().to_string(), "dec-001-use-postgres");
    }

    #[test]
    fn decision_yaml_roundtrip() {
        let mut dec = Decision::new(2, "event-bus", "Event bus");
        dec.decision = "Adopt NATS for inter-service events".to_string();
        dec.context = "Three services already poll each other".to_string();
        dec.consequences.push("ops runs one more process".to_string());
        dec.affects.push("cmp-001-api-gateway".to_string());

        let yaml = serde_yaml::to_string(&dec).unwrap();
        let back: Decision = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back.decision, dec.decision);
        assert_eq!(back.affects, vec!["cmp-001-api-gateway"]);
    }
}
