use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use specman_core::{
    component::Component,
    constitution::Constitution,
    decision::Decision,
    id::SpecId,
    milestone::Milestone,
    plan::Plan,
    requirement::Requirement,
    spec::AnySpec,
    store,
    types::{RequirementKind, SpecType},
};
use std::path::Path;
use std::str::FromStr;

#[derive(Subcommand)]
pub enum SpecSubcommand {
    /// Create a new spec of the given type
    Create {
        /// Spec type (requirement/plan/decision/component/constitution/milestone)
        spec_type: String,
        slug: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Requirement kind (business/technical); ignored for other types
        #[arg(long, default_value = "business")]
        kind: String,
    },
    /// List specs, optionally filtered by type
    List {
        #[arg(long = "type")]
        spec_type: Option<String>,
    },
    /// Show one spec in full
    Show { id: String },
    /// Update header fields of a spec
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Approve a plan (or accept a decision)
    Approve { id: String },
    /// Delete a spec file (its number is never reused)
    Delete { id: String },
}

pub fn run(root: &Path, subcmd: SpecSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        SpecSubcommand::Create {
            spec_type,
            slug,
            name,
            description,
            kind,
        } => create(root, &spec_type, &slug, name, description, &kind, json),
        SpecSubcommand::List { spec_type } => list(root, spec_type.as_deref(), json),
        SpecSubcommand::Show { id } => show(root, &id, json),
        SpecSubcommand::Update {
            id,
            name,
            description,
        } => update(root, &id, name, description, json),
        SpecSubcommand::Approve { id } => approve(root, &id, json),
        SpecSubcommand::Delete { id } => delete(root, &id, json),
    }
}

fn create(
    root: &Path,
    type_str: &str,
    slug: &str,
    name: Option<String>,
    description: Option<String>,
    kind: &str,
    json: bool,
) -> anyhow::Result<()> {
    let spec_type =
        SpecType::from_str(type_str).with_context(|| format!("unknown spec type: {type_str}"))?;
    let name = name.unwrap_or_else(|| slug.replace('-', " "));
    let number = store::next_number(root, spec_type).context("failed to allocate number")?;

    let mut spec = match spec_type {
        SpecType::Requirement => {
            let kind = RequirementKind::from_str(kind)
                .with_context(|| format!("unknown requirement kind: {kind}"))?;
            AnySpec::Requirement(Requirement::new(number, slug, &name, kind))
        }
        SpecType::Plan => AnySpec::Plan(Plan::new(number, slug, &name)),
        SpecType::Decision => AnySpec::Decision(Decision::new(number, slug, &name)),
        SpecType::Component => AnySpec::Component(Component::new(number, slug, &name)),
        SpecType::Constitution => AnySpec::Constitution(Constitution::new(number, slug, &name)),
        SpecType::Milestone => AnySpec::Milestone(Milestone::new(number, slug, &name)),
    };
    if let Some(desc) = description {
        spec.set_description(desc);
    }

    store::create(root, &spec).with_context(|| format!("failed to create {type_str} '{slug}'"))?;

    let id = spec.id();
    if json {
        print_json(&spec)?;
    } else {
        println!("Created {spec_type} {id} ({name})");
    }
    Ok(())
}

fn list(root: &Path, type_str: Option<&str>, json: bool) -> anyhow::Result<()> {
    let specs = match type_str {
        Some(t) => {
            let spec_type =
                SpecType::from_str(t).with_context(|| format!("unknown spec type: {t}"))?;
            store::list(root, spec_type).context("failed to list specs")?
        }
        None => store::list_all(root).context("failed to list specs")?,
    };

    if json {
        let summaries: Vec<_> = specs
            .iter()
            .map(|s| {
                serde_json::json!({
                    "id": s.id().to_string(),
                    "type": s.spec_type().to_string(),
                    "name": s.name(),
                    "description": s.description(),
                })
            })
            .collect();
        print_json(&summaries)?;
        return Ok(());
    }

    if specs.is_empty() {
        println!("No specs yet.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = specs
        .iter()
        .map(|s| {
            vec![
                s.id().to_string(),
                s.spec_type().to_string(),
                s.name().to_string(),
            ]
        })
        .collect();
    print_table(&["ID", "TYPE", "NAME"], rows);
    Ok(())
}

fn show(root: &Path, id_str: &str, json: bool) -> anyhow::Result<()> {
    let id = SpecId::parse(id_str).with_context(|| format!("invalid spec id: {id_str}"))?;
    let spec = store::load(root, &id).with_context(|| format!("spec '{id_str}' not found"))?;

    if json {
        print_json(&spec)?;
        return Ok(());
    }

    println!("{} {} ({})", spec.spec_type(), spec.id(), spec.name());
    if !spec.description().is_empty() {
        println!("Desc:    {}", spec.description());
    }
    println!("Created: {}", spec.created_at().format("%Y-%m-%d %H:%M"));

    match &spec {
        AnySpec::Requirement(req) => {
            println!("Kind:    {} ({})", req.kind, req.priority);
            println!("\nCriteria:");
            for c in &req.criteria {
                let marker = if c.links.is_active() { " " } else { "~" };
                println!("  {marker}[{}] {}", c.id, c.description);
            }
        }
        AnySpec::Plan(plan) => {
            println!("Status:  {}", plan.progress());
            if !plan.criteria_refs.is_empty() {
                println!("Covers:  {}", plan.criteria_refs.join(", "));
            }
            println!("\nTasks:");
            for t in &plan.tasks {
                let marker = if t.links.is_active() { " " } else { "~" };
                println!("  {marker}[{}] {}: {}", t.id, t.status, t.description);
            }
        }
        AnySpec::Decision(dec) => {
            println!("Status:  {}", dec.status);
            println!("\nDecision: {}", dec.decision);
            println!("Context:  {}", dec.context);
            for c in &dec.consequences {
                println!("  => {c}");
            }
        }
        AnySpec::Component(cmp) => {
            println!("Kind:    {}", cmp.component_kind);
            println!("Folder:  {}", cmp.folder);
            if !cmp.tech_stack.is_empty() {
                println!("Stack:   {}", cmp.tech_stack.join(", "));
            }
        }
        AnySpec::Constitution(con) => {
            println!("\nArticles:");
            for a in &con.articles {
                let marker = if a.links.is_active() { " " } else { "~" };
                println!("  {marker}[{}] {}: {}", a.id, a.title, a.principle);
            }
        }
        AnySpec::Milestone(mil) => {
            println!("Status:  {}", mil.status);
            if let Some(d) = mil.target_date {
                println!("Target:  {d}");
            }
            for r in mil.requirements.iter().chain(mil.plans.iter()) {
                println!("  - {r}");
            }
        }
    }

    Ok(())
}

fn update(
    root: &Path,
    id_str: &str,
    name: Option<String>,
    description: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let id = SpecId::parse(id_str).with_context(|| format!("invalid spec id: {id_str}"))?;
    let mut spec = store::load(root, &id).with_context(|| format!("spec '{id_str}' not found"))?;

    if let Some(name) = name {
        spec.set_name(name);
    }
    if let Some(description) = description {
        spec.set_description(description);
    }
    store::save(root, &spec).context("failed to save spec")?;

    if json {
        print_json(&spec)?;
    } else {
        println!("Updated {id}");
    }
    Ok(())
}

fn approve(root: &Path, id_str: &str, json: bool) -> anyhow::Result<()> {
    let id = SpecId::parse(id_str).with_context(|| format!("invalid spec id: {id_str}"))?;
    let mut spec = store::load(root, &id).with_context(|| format!("spec '{id_str}' not found"))?;

    match &mut spec {
        AnySpec::Plan(plan) => plan.approve(),
        AnySpec::Decision(dec) => dec.accept(),
        other => anyhow::bail!("cannot approve a {}", other.spec_type()),
    }
    store::save(root, &spec).context("failed to save spec")?;

    if json {
        print_json(&spec)?;
    } else {
        println!("Approved {id}");
    }
    Ok(())
}

fn delete(root: &Path, id_str: &str, json: bool) -> anyhow::Result<()> {
    let id = SpecId::parse(id_str).with_context(|| format!("invalid spec id: {id_str}"))?;
    store::delete(root, &id).with_context(|| format!("failed to delete '{id_str}'"))?;

    if json {
        print_json(&serde_json::json!({ "deleted": id.to_string() }))?;
    } else {
        println!("Deleted {id}");
    }
    Ok(())
}
