use crate::id::SpecId;
use crate::types::{ComponentKind, SpecType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Deployable or importable unit of the system under spec.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    pub number: u32,
    pub slug: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub component_kind: ComponentKind,
    /// Repo-relative folder the component lives in.
    #[serde(default)]
    pub folder: String,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    /// Other component IDs this one depends on.
    #[serde(default)]
    pub depends_on: Vec<String>,
    /// Third-party dependencies outside the spec store.
    #[serde(default)]
    pub external_dependencies: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Component {
    pub fn new(number: u32, slug: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            number,
            slug: slug.into(),
            name: name.into(),
            description: String::new(),
            component_kind: ComponentKind::Service,
            folder: String::new(),
            tech_stack: Vec::new(),
            depends_on: Vec::new(),
            external_dependencies: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> SpecId {
        SpecId::new(SpecType::Component, self.number, self.slug.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_yaml_roundtrip() {
        let mut cmp = Component::new(1, "api-gateway", "API Gateway");
        cmp.component_kind = ComponentKind::App;
        cmp.folder = "services/gateway".to_string();
        cmp.tech_stack.push("rust".to_string());
        cmp.depends_on.push("cmp-002-auth-svc".to_string());

        let yaml = serde_yaml::to_string(&cmp).unwrap();
        let back: Component = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back.id().to_string(), "cmp-001-api-gateway");
        assert_eq!(back.component_kind, ComponentKind::App);
        assert_eq!(back.depends_on, vec!["cmp-002-auth-svc"]);
    }
}
