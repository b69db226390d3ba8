use crate::error::{Result, SpecError};
use crate::id::SpecId;
use crate::types::SpecType;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const SPECS_DIR: &str = ".specs";
pub const DRAFTS_DIR: &str = ".specs/drafts";
pub const CONFIG_FILE: &str = ".specs/config.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn specs_dir(root: &Path) -> PathBuf {
    root.join(SPECS_DIR)
}

pub fn type_dir(root: &Path, spec_type: SpecType) -> PathBuf {
    root.join(SPECS_DIR).join(spec_type.dir_name())
}

pub fn spec_file(root: &Path, id: &SpecId) -> PathBuf {
    type_dir(root, id.spec_type).join(format!("{id}.yaml"))
}

pub fn drafts_dir(root: &Path) -> PathBuf {
    root.join(DRAFTS_DIR)
}

pub fn draft_file(root: &Path, draft_id: &str) -> PathBuf {
    drafts_dir(root).join(format!("{draft_id}.yaml"))
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn is_initialized(root: &Path) -> bool {
    specs_dir(root).is_dir()
}

// ---------------------------------------------------------------------------
// Slug validation
// ---------------------------------------------------------------------------

static SLUG_RE: OnceLock<Regex> = OnceLock::new();

fn slug_re() -> &'static Regex {
    SLUG_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9\-]*[a-z0-9]$|^[a-z0-9]$").unwrap())
}

pub fn validate_slug(slug: &str) -> Result<()> {
    if slug.is_empty() || slug.len() > 64 || !slug_re().is_match(slug) {
        return Err(SpecError::InvalidSlug(slug.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_slugs() {
        for slug in ["user-auth", "a", "payment-flow-2", "x1"] {
            validate_slug(slug).unwrap_or_else(|_| panic!("expected valid: {slug}"));
        }
    }

    #[test]
    fn invalid_slugs() {
        for slug in [
            "",
            "-starts-with-dash",
            "ends-with-dash-",
            "has spaces",
            "UPPER",
            "a_b",
        ] {
            assert!(validate_slug(slug).is_err(), "expected invalid: {slug}");
        }
    }

    #[test]
    fn path_helpers() {
        use std::str::FromStr;
        let root = Path::new("/tmp/proj");
        assert_eq!(
            config_path(root),
            PathBuf::from("/tmp/proj/.specs/config.yaml")
        );
        let id = SpecId::from_str("req-001-user-auth").unwrap();
        assert_eq!(
            spec_file(root, &id),
            PathBuf::from("/tmp/proj/.specs/requirements/req-001-user-auth.yaml")
        );
        assert_eq!(
            draft_file(root, "draft-002"),
            PathBuf::from("/tmp/proj/.specs/drafts/draft-002.yaml")
        );
    }
}
