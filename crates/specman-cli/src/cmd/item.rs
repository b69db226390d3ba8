use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use specman_core::{id::SpecId, item::ItemKind, store};
use std::path::Path;
use std::str::FromStr;

#[derive(Subcommand)]
pub enum ItemSubcommand {
    /// Add a sub-item to a spec
    Add {
        spec_id: String,
        /// Item kind (criterion/task/test-case/flow/api-contract/data-model/article)
        kind: String,
        /// Description, principle, contract, or newline-separated steps
        body: String,
        /// Title for named kinds (flows, contracts, data models, articles)
        #[arg(long)]
        name: Option<String>,
    },
    /// Replace an item with a new version, preserving history
    Supersede {
        spec_id: String,
        /// ID of the item to supersede, e.g. tsk-002
        item_id: String,
        /// Replacement content
        body: String,
        /// Replacement title; named kinds inherit the old title if omitted
        #[arg(long)]
        name: Option<String>,
    },
    /// Mark a plan task completed
    Complete {
        plan_id: String,
        task_id: String,
    },
}

pub fn run(root: &Path, subcmd: ItemSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ItemSubcommand::Add {
            spec_id,
            kind,
            body,
            name,
        } => add(root, &spec_id, &kind, &body, name.as_deref(), json),
        ItemSubcommand::Supersede {
            spec_id,
            item_id,
            body,
            name,
        } => supersede(root, &spec_id, &item_id, &body, name.as_deref(), json),
        ItemSubcommand::Complete { plan_id, task_id } => complete(root, &plan_id, &task_id, json),
    }
}

fn add(
    root: &Path,
    spec_str: &str,
    kind_str: &str,
    body: &str,
    name: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let id = SpecId::parse(spec_str).with_context(|| format!("invalid spec id: {spec_str}"))?;
    let kind = ItemKind::from_str(kind_str).with_context(|| format!("unknown item kind: {kind_str}"))?;

    let mut spec = store::load(root, &id).with_context(|| format!("spec '{spec_str}' not found"))?;
    let item_id = spec
        .add_item(kind, name, body)
        .with_context(|| format!("failed to add {kind_str} to '{spec_str}'"))?;
    store::save(root, &spec).context("failed to save spec")?;

    if json {
        print_json(&serde_json::json!({ "spec": id.to_string(), "item_id": item_id }))?;
    } else {
        println!("Added {item_id} to {id}");
    }
    Ok(())
}

fn supersede(
    root: &Path,
    spec_str: &str,
    item_id: &str,
    body: &str,
    name: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let id = SpecId::parse(spec_str).with_context(|| format!("invalid spec id: {spec_str}"))?;
    let mut spec = store::load(root, &id).with_context(|| format!("spec '{spec_str}' not found"))?;

    let new_id = spec
        .supersede_item(item_id, name, body)
        .with_context(|| format!("failed to supersede {item_id} in '{spec_str}'"))?;
    store::save(root, &spec).context("failed to save spec")?;

    if json {
        print_json(&serde_json::json!({
            "spec": id.to_string(),
            "superseded": item_id,
            "item_id": new_id,
        }))?;
    } else {
        println!("Superseded {item_id} with {new_id} in {id}");
    }
    Ok(())
}

fn complete(root: &Path, plan_str: &str, task_id: &str, json: bool) -> anyhow::Result<()> {
    let id = SpecId::parse(plan_str).with_context(|| format!("invalid spec id: {plan_str}"))?;
    let mut spec = store::load(root, &id).with_context(|| format!("plan '{plan_str}' not found"))?;
    let plan = spec
        .as_plan_mut()
        .with_context(|| format!("'{plan_str}' is not a plan"))?;

    let completed = plan
        .complete_task(task_id)
        .with_context(|| format!("failed to complete {task_id}"))?;
    let progress = plan.progress();
    store::save(root, &spec).context("failed to save plan")?;

    if json {
        print_json(&serde_json::json!({
            "plan": id.to_string(),
            "completed": completed,
            "progress": progress,
        }))?;
    } else {
        println!("Completed {completed} ({progress})");
    }
    Ok(())
}
