use crate::config::ValidationConfig;
use crate::error::Result;
use crate::id::{ItemRef, SpecId};
use crate::item::{self, SpecItem};
use crate::spec::AnySpec;
use crate::store;
use crate::types::SpecType;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::path::Path;

// ---------------------------------------------------------------------------
// ValidationWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

impl fmt::Display for WarnLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WarnLevel::Warning => "warning",
            WarnLevel::Error => "error",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub level: WarnLevel,
    /// Machine-readable check name, e.g. `missing-ref`.
    pub code: String,
    /// ID of the entity the finding is about.
    pub spec: String,
    pub message: String,
}

impl ValidationWarning {
    fn error(spec: &str, code: &str, message: impl Into<String>) -> Self {
        Self {
            level: WarnLevel::Error,
            code: code.to_string(),
            spec: spec.to_string(),
            message: message.into(),
        }
    }

    fn warning(spec: &str, code: &str, message: impl Into<String>) -> Self {
        Self {
            level: WarnLevel::Warning,
            code: code.to_string(),
            spec: spec.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        !self.warnings.iter().any(|w| w.level == WarnLevel::Error)
    }

    pub fn error_count(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| w.level == WarnLevel::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| w.level == WarnLevel::Warning)
            .count()
    }
}

// ---------------------------------------------------------------------------
// Per-entity checks
// ---------------------------------------------------------------------------

/// Structural checks on a single entity, independent of the rest of the store.
pub fn validate_spec(spec: &AnySpec) -> Vec<ValidationWarning> {
    let id = spec.id().to_string();
    let mut out = Vec::new();

    if spec.name().trim().is_empty() {
        out.push(ValidationWarning::error(&id, "empty-name", "name is empty"));
    }
    if spec.description().trim().is_empty() {
        out.push(ValidationWarning::warning(
            &id,
            "empty-description",
            "description is empty",
        ));
    }

    match spec {
        AnySpec::Requirement(req) => {
            check_items(&id, "criterion", &req.criteria, &mut out);
            if req.active_criteria().is_empty() {
                out.push(ValidationWarning::warning(
                    &id,
                    "no-criteria",
                    "requirement has no active acceptance criteria",
                ));
            }
        }
        AnySpec::Plan(plan) => {
            check_items(&id, "task", &plan.tasks, &mut out);
            check_items(&id, "test case", &plan.test_cases, &mut out);
            check_items(&id, "flow", &plan.flows, &mut out);
            check_items(&id, "api contract", &plan.api_contracts, &mut out);
            check_items(&id, "data model", &plan.data_models, &mut out);
            if item::active(&plan.tasks).next().is_none() {
                out.push(ValidationWarning::warning(
                    &id,
                    "no-tasks",
                    "plan has no active tasks",
                ));
            }
        }
        AnySpec::Decision(dec) => {
            if dec.decision.trim().is_empty() {
                out.push(ValidationWarning::error(
                    &id,
                    "empty-decision",
                    "decision text is empty",
                ));
            }
            if dec.context.trim().is_empty() {
                out.push(ValidationWarning::warning(
                    &id,
                    "empty-context",
                    "decision records no context",
                ));
            }
        }
        AnySpec::Component(cmp) => {
            if cmp.folder.trim().is_empty() {
                out.push(ValidationWarning::warning(
                    &id,
                    "no-folder",
                    "component has no folder mapping",
                ));
            }
        }
        AnySpec::Constitution(con) => {
            check_items(&id, "article", &con.articles, &mut out);
            if con.active_articles().is_empty() {
                out.push(ValidationWarning::warning(
                    &id,
                    "no-articles",
                    "constitution has no active articles",
                ));
            }
        }
        AnySpec::Milestone(_) => {}
    }

    out
}

/// Item-list invariants: unique IDs and consistent supersession links.
fn check_items<T: SpecItem>(
    spec_id: &str,
    label: &str,
    items: &[T],
    out: &mut Vec<ValidationWarning>,
) {
    let mut seen = BTreeSet::new();
    for it in items {
        if !seen.insert(it.id()) {
            out.push(ValidationWarning::error(
                spec_id,
                "duplicate-item-id",
                format!("duplicate {label} id {}", it.id()),
            ));
        }
    }

    for it in items {
        let links = it.supersession();
        if let Some(old) = &links.supersedes {
            match item::find(items, old) {
                None => out.push(ValidationWarning::error(
                    spec_id,
                    "dangling-supersedes",
                    format!("{label} {} supersedes missing item {old}", it.id()),
                )),
                Some(prev) => {
                    if prev.supersession().superseded_by.as_deref() != Some(it.id()) {
                        out.push(ValidationWarning::error(
                            spec_id,
                            "broken-chain",
                            format!(
                                "{label} {old} does not link forward to {}",
                                it.id()
                            ),
                        ));
                    }
                }
            }
        }
        if let Some(by) = &links.superseded_by {
            if item::find(items, by).is_none() {
                out.push(ValidationWarning::error(
                    spec_id,
                    "dangling-superseded-by",
                    format!("{label} {} superseded by missing item {by}", it.id()),
                ));
            }
            if links.superseded_at.is_none() {
                out.push(ValidationWarning::warning(
                    spec_id,
                    "missing-superseded-at",
                    format!("{label} {} has superseded_by but no superseded_at", it.id()),
                ));
            }
        }
    }

    // `superseded_by` cycles. `supersede` only links forward to a fresh ID,
    // so a cycle means the file was edited by hand. Report each once.
    let mut in_cycle: BTreeSet<&str> = BTreeSet::new();
    for start in items {
        if in_cycle.contains(start.id()) {
            continue;
        }
        let mut path: Vec<&str> = vec![start.id()];
        let mut cur = start;
        while let Some(next_id) = &cur.supersession().superseded_by {
            if in_cycle.contains(next_id.as_str()) {
                break;
            }
            let Some(next) = item::find(items, next_id) else {
                break;
            };
            if path.contains(&next.id()) {
                in_cycle.extend(path.iter().copied());
                out.push(ValidationWarning::error(
                    spec_id,
                    "broken-chain",
                    format!("{label} supersession cycle: {}", path.join(" -> ")),
                ));
                break;
            }
            path.push(next.id());
            cur = next;
        }
    }
}

// ---------------------------------------------------------------------------
// Project-wide reference checks
// ---------------------------------------------------------------------------

/// Outbound spec-level reference with the field it came from.
fn spec_refs(spec: &AnySpec) -> Vec<(&'static str, &String)> {
    let mut out = Vec::new();
    match spec {
        AnySpec::Requirement(req) => {
            out.extend(req.depends_on.iter().map(|r| ("depends_on", r)));
        }
        AnySpec::Plan(plan) => {
            out.extend(plan.depends_on.iter().map(|r| ("depends_on", r)));
        }
        AnySpec::Decision(dec) => {
            out.extend(dec.affects.iter().map(|r| ("affects", r)));
        }
        AnySpec::Component(cmp) => {
            out.extend(cmp.depends_on.iter().map(|r| ("depends_on", r)));
        }
        AnySpec::Constitution(_) => {}
        AnySpec::Milestone(mil) => {
            out.extend(mil.requirements.iter().map(|r| ("requirements", r)));
            out.extend(mil.plans.iter().map(|r| ("plans", r)));
        }
    }
    out
}

/// Validate every entity plus cross-entity integrity: missing references,
/// references to superseded items, dependency cycles, and orphans.
pub fn validate_project(root: &Path, config: &ValidationConfig) -> Result<ValidationReport> {
    let specs = store::list_all(root)?;
    let mut report = ValidationReport::default();

    for spec in &specs {
        report.warnings.extend(validate_spec(spec));
    }

    let by_id: BTreeMap<String, &AnySpec> =
        specs.iter().map(|s| (s.id().to_string(), s)).collect();

    // Spec-level refs: parse + existence + expected target type.
    for spec in &specs {
        let from = spec.id().to_string();
        for (field, raw) in spec_refs(spec) {
            let target = match SpecId::parse(raw) {
                Ok(t) => t,
                Err(_) => {
                    report.warnings.push(ValidationWarning::error(
                        &from,
                        "invalid-ref",
                        format!("{field} holds malformed id '{raw}'"),
                    ));
                    continue;
                }
            };
            if !by_id.contains_key(raw.as_str()) {
                report.warnings.push(ValidationWarning::error(
                    &from,
                    "missing-ref",
                    format!("{field} references missing spec {raw}"),
                ));
                continue;
            }
            let type_ok = match (spec, field) {
                (AnySpec::Component(_), "depends_on") => {
                    target.spec_type == SpecType::Component
                }
                (AnySpec::Milestone(_), "requirements") => {
                    target.spec_type == SpecType::Requirement
                }
                (AnySpec::Milestone(_), "plans") => target.spec_type == SpecType::Plan,
                _ => true,
            };
            if !type_ok {
                report.warnings.push(ValidationWarning::error(
                    &from,
                    "wrong-ref-type",
                    format!("{field} references {raw}, which is a {}", target.spec_type),
                ));
            }
        }
    }

    // Item refs: plan criteria coverage into requirement criteria.
    for spec in &specs {
        let AnySpec::Plan(plan) = spec else { continue };
        let from = plan.id().to_string();
        for raw in &plan.criteria_refs {
            let item_ref = match ItemRef::parse(raw) {
                Ok(r) => r,
                Err(_) => {
                    report.warnings.push(ValidationWarning::error(
                        &from,
                        "invalid-ref",
                        format!("criteria_refs holds malformed ref '{raw}'"),
                    ));
                    continue;
                }
            };
            let Some(AnySpec::Requirement(req)) =
                by_id.get(item_ref.spec.to_string().as_str()).copied()
            else {
                report.warnings.push(ValidationWarning::error(
                    &from,
                    "missing-ref",
                    format!("criteria_refs references missing requirement {}", item_ref.spec),
                ));
                continue;
            };
            match item::find(&req.criteria, &item_ref.item) {
                None => report.warnings.push(ValidationWarning::error(
                    &from,
                    "missing-item-ref",
                    format!("criteria_refs references missing item {raw}"),
                )),
                Some(crt) if !crt.links.is_active() => {
                    let current = item::resolve_current(&req.criteria, &item_ref.item)
                        .map(|c| c.id.clone())
                        .unwrap_or_default();
                    let level = if config.strict_superseded_refs {
                        WarnLevel::Error
                    } else {
                        WarnLevel::Warning
                    };
                    report.warnings.push(ValidationWarning {
                        level,
                        code: "superseded-ref".to_string(),
                        spec: from.clone(),
                        message: format!(
                            "criteria_refs references superseded item {raw} (current: {}/{current})",
                            item_ref.spec
                        ),
                    });
                }
                Some(_) => {}
            }
        }
    }

    // Cycles over depends_on within each type's graph.
    for warning in find_cycles(&specs) {
        report.warnings.push(warning);
    }

    // Orphans.
    if config.warn_orphans {
        for warning in find_orphans(&specs) {
            report.warnings.push(warning);
        }
    }

    Ok(report)
}

fn depends_on_edges(specs: &[AnySpec]) -> HashMap<String, Vec<String>> {
    let ids: BTreeSet<String> = specs.iter().map(|s| s.id().to_string()).collect();
    let mut edges: HashMap<String, Vec<String>> = HashMap::new();
    for spec in specs {
        let deps = match spec {
            AnySpec::Requirement(r) => &r.depends_on,
            AnySpec::Plan(p) => &p.depends_on,
            AnySpec::Component(c) => &c.depends_on,
            _ => continue,
        };
        let from = spec.id().to_string();
        // Only traversable edges; missing targets are reported elsewhere.
        let valid: Vec<String> = deps.iter().filter(|d| ids.contains(*d)).cloned().collect();
        edges.insert(from, valid);
    }
    edges
}

fn find_cycles(specs: &[AnySpec]) -> Vec<ValidationWarning> {
    let edges = depends_on_edges(specs);
    let mut out = Vec::new();
    let mut reported: BTreeSet<Vec<String>> = BTreeSet::new();

    // DFS with an explicit path stack; each cycle keyed by its sorted member
    // set so rotations report once.
    fn dfs(
        node: &str,
        edges: &HashMap<String, Vec<String>>,
        path: &mut Vec<String>,
        visited: &mut BTreeSet<String>,
        reported: &mut BTreeSet<Vec<String>>,
        out: &mut Vec<ValidationWarning>,
    ) {
        if let Some(pos) = path.iter().position(|p| p == node) {
            let cycle: Vec<String> = path[pos..].to_vec();
            let mut key = cycle.clone();
            key.sort();
            if reported.insert(key) {
                let mut shown = cycle.clone();
                shown.push(node.to_string());
                out.push(ValidationWarning::error(
                    &cycle[0],
                    "dependency-cycle",
                    format!("dependency cycle: {}", shown.join(" -> ")),
                ));
            }
            return;
        }
        if !visited.insert(node.to_string()) {
            return;
        }
        path.push(node.to_string());
        if let Some(next) = edges.get(node) {
            for n in next {
                dfs(n, edges, path, visited, reported, out);
            }
        }
        path.pop();
    }

    let mut visited = BTreeSet::new();
    for node in edges.keys() {
        let mut path = Vec::new();
        // Re-walk from every root; `visited` keeps it linear overall.
        if !visited.contains(node) {
            dfs(node, &edges, &mut path, &mut visited, &mut reported, &mut out);
        }
    }
    out
}

fn find_orphans(specs: &[AnySpec]) -> Vec<ValidationWarning> {
    let mut inbound: BTreeSet<&str> = BTreeSet::new();
    for spec in specs {
        for (_, r) in spec_refs(spec) {
            inbound.insert(r.as_str());
        }
    }

    let mut out = Vec::new();
    for spec in specs {
        let id = spec.id().to_string();
        match spec {
            AnySpec::Plan(plan) => {
                if plan.criteria_refs.is_empty() && !inbound.contains(id.as_str()) {
                    out.push(ValidationWarning::warning(
                        &id,
                        "orphan",
                        "plan covers no criteria and nothing references it",
                    ));
                }
            }
            AnySpec::Component(_) => {
                if !inbound.contains(id.as_str()) {
                    out.push(ValidationWarning::warning(
                        &id,
                        "orphan",
                        "component is referenced by nothing",
                    ));
                }
            }
            _ => {}
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
