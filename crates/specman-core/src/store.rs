use crate::error::{Result, SpecError};
use crate::id::SpecId;
use crate::paths;
use crate::spec::AnySpec;
use crate::types::SpecType;
use std::path::Path;

// ---------------------------------------------------------------------------
// Numbering
// ---------------------------------------------------------------------------

/// Max existing number for the type + 1. Deleted numbers are never reused, so
/// IDs stay unique across the project's history.
pub fn next_number(root: &Path, spec_type: SpecType) -> Result<u32> {
    let max = list_ids(root, spec_type)?
        .iter()
        .map(|id| id.number)
        .max()
        .unwrap_or(0);
    Ok(max + 1)
}

/// IDs of every entity of a type, parsed from filenames. Files that don't
/// parse as spec IDs are ignored (editor droppings, etc.).
pub fn list_ids(root: &Path, spec_type: SpecType) -> Result<Vec<SpecId>> {
    let dir = paths::type_dir(root, spec_type);
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut ids = Vec::new();
    for entry in std::fs::read_dir(&dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let Some(stem) = name.strip_suffix(".yaml") else {
            continue;
        };
        if let Ok(id) = SpecId::parse(stem) {
            if id.spec_type == spec_type {
                ids.push(id);
            }
        }
    }
    ids.sort_by_key(|id| id.number);
    Ok(ids)
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// Persist a new entity. Fails if the store is missing or the ID is taken.
pub fn create(root: &Path, spec: &AnySpec) -> Result<()> {
    if !paths::is_initialized(root) {
        return Err(SpecError::NotInitialized);
    }
    let id = spec.id();
    paths::validate_slug(&id.slug)?;
    let file = paths::spec_file(root, &id);
    if file.exists() {
        return Err(SpecError::SpecExists(id.to_string()));
    }
    save(root, spec)
}

pub fn load(root: &Path, id: &SpecId) -> Result<AnySpec> {
    let file = paths::spec_file(root, id);
    if !file.exists() {
        return Err(SpecError::SpecNotFound(id.to_string()));
    }
    let data = std::fs::read_to_string(&file)?;
    let spec: AnySpec = serde_yaml::from_str(&data)?;
    Ok(spec)
}

pub fn save(root: &Path, spec: &AnySpec) -> Result<()> {
    let file = paths::spec_file(root, &spec.id());
    let data = serde_yaml::to_string(spec)?;
    crate::io::atomic_write(&file, data.as_bytes())
}

pub fn delete(root: &Path, id: &SpecId) -> Result<()> {
    let file = paths::spec_file(root, id);
    if !file.exists() {
        return Err(SpecError::SpecNotFound(id.to_string()));
    }
    std::fs::remove_file(&file)?;
    Ok(())
}

pub fn exists(root: &Path, id: &SpecId) -> bool {
    paths::spec_file(root, id).exists()
}

/// All entities of one type, sorted by number.
pub fn list(root: &Path, spec_type: SpecType) -> Result<Vec<AnySpec>> {
    let mut specs = Vec::new();
    for id in list_ids(root, spec_type)? {
        match load(root, &id) {
            Ok(s) => specs.push(s),
            Err(SpecError::SpecNotFound(_)) => {}
            Err(e) => return Err(e),
        }
    }
    Ok(specs)
}

/// Every entity in the store, type by type.
pub fn list_all(root: &Path) -> Result<Vec<AnySpec>> {
    let mut specs = Vec::new();
    for &t in SpecType::all() {
        specs.extend(list(root, t)?);
    }
    Ok(specs)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::Plan;
    use crate::requirement::Requirement;
    use crate::types::RequirementKind;
    use tempfile::TempDir;

    fn init(dir: &TempDir) {
        crate::io::ensure_dir(&paths::specs_dir(dir.path())).unwrap();
    }

    #[test]
    fn create_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        init(&dir);

        let req = Requirement::new(1, "auth", "Auth", RequirementKind::Business);
        create(dir.path(), &AnySpec::Requirement(req)).unwrap();

        let id = SpecId::parse("req-001-auth").unwrap();
        let loaded = load(dir.path(), &id).unwrap();
        assert_eq!(loaded.name(), "Auth");
    }

    #[test]
    fn create_without_init_fails() {
        let dir = TempDir::new().unwrap();
        let req = Requirement::new(1, "auth", "Auth", RequirementKind::Business);
        assert!(matches!(
            create(dir.path(), &AnySpec::Requirement(req)),
            Err(SpecError::NotInitialized)
        ));
    }

    #[test]
    fn create_duplicate_fails() {
        let dir = TempDir::new().unwrap();
        init(&dir);

        let req = Requirement::new(1, "auth", "Auth", RequirementKind::Business);
        create(dir.path(), &AnySpec::Requirement(req.clone())).unwrap();
        assert!(matches!(
            create(dir.path(), &AnySpec::Requirement(req)),
            Err(SpecError::SpecExists(_))
        ));
    }

    #[test]
    fn next_number_skips_deleted() {
        let dir = TempDir::new().unwrap();
        init(&dir);

        for (n, slug) in [(1, "a"), (2, "b")] {
            create(
                dir.path(),
                &AnySpec::Plan(Plan::new(n, slug, slug.to_uppercase())),
            )
            .unwrap();
        }
        assert_eq!(next_number(dir.path(), SpecType::Plan).unwrap(), 3);

        delete(dir.path(), &SpecId::parse("pln-002-b").unwrap()).unwrap();
        // Number 2 is not handed out again.
        assert_eq!(next_number(dir.path(), SpecType::Plan).unwrap(), 3);
    }

    #[test]
    fn next_number_starts_at_one() {
        let dir = TempDir::new().unwrap();
        init(&dir);
        assert_eq!(next_number(dir.path(), SpecType::Decision).unwrap(), 1);
    }

    #[test]
    fn list_sorted_by_number() {
        let dir = TempDir::new().unwrap();
        init(&dir);

        create(dir.path(), &AnySpec::Plan(Plan::new(2, "later", "Later"))).unwrap();
        create(dir.path(), &AnySpec::Plan(Plan::new(1, "first", "First"))).unwrap();

        let specs = list(dir.path(), SpecType::Plan).unwrap();
        let names: Vec<&str> = specs.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["First", "Later"]);
    }

    #[test]
    fn list_ignores_foreign_files() {
        let dir = TempDir::new().unwrap();
        init(&dir);
        let plans = paths::type_dir(dir.path(), SpecType::Plan);
        crate::io::ensure_dir(&plans).unwrap();
        std::fs::write(plans.join("README.md"), "not a spec").unwrap();
        std::fs::write(plans.join("notes.yaml"), "stray: true").unwrap();

        assert!(list(dir.path(), SpecType::Plan).unwrap().is_empty());
    }

    #[test]
    fn delete_missing_fails() {
        let dir = TempDir::new().unwrap();
        init(&dir);
        let id = SpecId::parse("cmp-001-ghost").unwrap();
        assert!(matches!(
            delete(dir.path(), &id),
            Err(SpecError::SpecNotFound(_))
        ));
    }

    #[test]
    fn list_all_spans_types() {
        let dir = TempDir::new().unwrap();
        init(&dir);

        create(
            dir.path(),
            &AnySpec::Requirement(Requirement::new(1, "a", "A", RequirementKind::Business)),
        )
        .unwrap();
        create(dir.path(), &AnySpec::Plan(Plan::new(1, "b", "B"))).unwrap();

        assert_eq!(list_all(dir.path()).unwrap().len(), 2);
    }
}
