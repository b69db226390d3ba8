use crate::error::{Result, SpecError};
use crate::types::SpecType;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// SpecId
// ---------------------------------------------------------------------------

/// Composite entity ID: `<prefix>-<number>-<slug>`, e.g. `req-001-user-auth`.
///
/// Numbers render zero-padded to three digits but parse at any width, so IDs
/// remain stable past 999.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SpecId {
    pub spec_type: SpecType,
    pub number: u32,
    pub slug: String,
}

static SPEC_ID_RE: OnceLock<Regex> = OnceLock::new();

fn spec_id_re() -> &'static Regex {
    SPEC_ID_RE.get_or_init(|| {
        Regex::new(r"^([a-z]{3})-(\d{3,})-([a-z0-9][a-z0-9\-]*)$").unwrap()
    })
}

impl SpecId {
    pub fn new(spec_type: SpecType, number: u32, slug: impl Into<String>) -> Self {
        Self {
            spec_type,
            number,
            slug: slug.into(),
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        let caps = spec_id_re()
            .captures(s)
            .ok_or_else(|| SpecError::InvalidId(s.to_string()))?;
        let spec_type = SpecType::from_prefix(&caps[1])
            .ok_or_else(|| SpecError::InvalidId(s.to_string()))?;
        let number: u32 = caps[2]
            .parse()
            .map_err(|_| SpecError::InvalidId(s.to_string()))?;
        let slug = caps[3].to_string();
        crate::paths::validate_slug(&slug).map_err(|_| SpecError::InvalidId(s.to_string()))?;
        Ok(Self {
            spec_type,
            number,
            slug,
        })
    }
}

impl fmt::Display for SpecId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:03}-{}", self.spec_type.prefix(), self.number, self.slug)
    }
}

impl std::str::FromStr for SpecId {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SpecId {
    type Error = SpecError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<SpecId> for String {
    fn from(id: SpecId) -> String {
        id.to_string()
    }
}

// ---------------------------------------------------------------------------
// ItemRef
// ---------------------------------------------------------------------------

/// Reference to a sub-item inside another entity: `pln-002-auth/tsk-001`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRef {
    pub spec: SpecId,
    pub item: String,
}

static ITEM_ID_RE: OnceLock<Regex> = OnceLock::new();

fn item_id_re() -> &'static Regex {
    ITEM_ID_RE.get_or_init(|| Regex::new(r"^[a-z]{2,3}-\d{3,}$").unwrap())
}

/// Validate a short item ID like `tsk-001` or `crt-014`.
pub fn is_item_id(s: &str) -> bool {
    item_id_re().is_match(s)
}

impl ItemRef {
    pub fn parse(s: &str) -> Result<Self> {
        let (spec_part, item_part) = s
            .split_once('/')
            .ok_or_else(|| SpecError::InvalidItemRef(s.to_string()))?;
        let spec =
            SpecId::parse(spec_part).map_err(|_| SpecError::InvalidItemRef(s.to_string()))?;
        if !is_item_id(item_part) {
            return Err(SpecError::InvalidItemRef(s.to_string()));
        }
        Ok(Self {
            spec,
            item: item_part.to_string(),
        })
    }
}

impl fmt::Display for ItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.spec, self.item)
    }
}

impl std::str::FromStr for ItemRef {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_id_roundtrip() {
        let id = SpecId::parse("req-001-user-auth").unwrap();
        assert_eq!(id.spec_type, SpecType::Requirement);
        assert_eq!(id.number, 1);
        assert_eq!(id.slug, "user-auth");
        assert_eq!(id.to_string(), "req-001-user-auth");
    }

    #[test]
    fn spec_id_wide_numbers() {
        let id = SpecId::parse("pln-1024-big").unwrap();
        assert_eq!(id.number, 1024);
        assert_eq!(id.to_string(), "pln-1024-big");
    }

    #[test]
    fn spec_id_rejects_malformed() {
        for bad in [
            "",
            "req-1-short-number",
            "xyz-001-unknown-prefix",
            "req-001-UPPER",
            "req-001-",
            "req--auth",
            "plain-text",
        ] {
            assert!(SpecId::parse(bad).is_err(), "expected invalid: {bad}");
        }
    }

    #[test]
    fn spec_id_display_pads_to_three() {
        let id = SpecId::new(SpecType::Decision, 7, "db-choice");
        assert_eq!(id.to_string(), "dec-007-db-choice");
    }

    #[test]
    fn spec_id_serde_as_string() {
        let id = SpecId::parse("mil-002-beta").unwrap();
        let yaml = serde_yaml::to_string(&id).unwrap();
        assert_eq!(yaml.trim(), "mil-002-beta");
        let back: SpecId = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn item_ref_roundtrip() {
        let r = ItemRef::parse("pln-002-auth/tsk-001").unwrap();
        assert_eq!(r.spec.to_string(), "pln-002-auth");
        assert_eq!(r.item, "tsk-001");
        assert_eq!(r.to_string(), "pln-002-auth/tsk-001");
    }

    #[test]
    fn item_ref_rejects_malformed() {
        for bad in ["pln-002-auth", "pln-002-auth/", "pln-002-auth/tsk", "/tsk-001"] {
            assert!(ItemRef::parse(bad).is_err(), "expected invalid: {bad}");
        }
    }

    #[test]
    fn item_id_shapes() {
        assert!(is_item_id("tsk-001"));
        assert!(is_item_id("tc-010"));
        assert!(!is_item_id("tsk-1"));
        assert!(!is_item_id("task-001"));
    }
}
