use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use specman_core::{draft::Draft, types::SpecType};
use std::path::Path;
use std::str::FromStr;

#[derive(Subcommand)]
pub enum DraftSubcommand {
    /// Begin a guided draft for a new spec
    Start {
        /// Spec type (requirement/plan/decision/component/constitution/milestone)
        spec_type: String,
        slug: String,
    },
    /// Answer the current question; an empty answer skips an optional one
    Answer { draft_id: String, text: String },
    /// Show a draft's answers so far and the next question
    Show { draft_id: String },
    /// Turn a completed draft into a real spec
    Finalize { draft_id: String },
    /// Discard a draft
    Abandon { draft_id: String },
    /// List in-progress drafts
    List,
}

pub fn run(root: &Path, subcmd: DraftSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        DraftSubcommand::Start { spec_type, slug } => start(root, &spec_type, &slug, json),
        DraftSubcommand::Answer { draft_id, text } => answer(root, &draft_id, &text, json),
        DraftSubcommand::Show { draft_id } => show(root, &draft_id, json),
        DraftSubcommand::Finalize { draft_id } => finalize(root, &draft_id, json),
        DraftSubcommand::Abandon { draft_id } => abandon(root, &draft_id, json),
        DraftSubcommand::List => list(root, json),
    }
}

fn start(root: &Path, type_str: &str, slug: &str, json: bool) -> anyhow::Result<()> {
    let spec_type =
        SpecType::from_str(type_str).with_context(|| format!("unknown spec type: {type_str}"))?;
    let draft = Draft::start(root, spec_type, slug).context("failed to start draft")?;

    if json {
        print_json(&status_json(&draft))?;
    } else {
        println!("Started draft {} ({spec_type})", draft.id);
        print_prompt(&draft);
    }
    Ok(())
}

fn answer(root: &Path, draft_id: &str, text: &str, json: bool) -> anyhow::Result<()> {
    let mut draft = Draft::load(root, draft_id).with_context(|| format!("draft '{draft_id}' not found"))?;
    draft
        .answer(text)
        .with_context(|| format!("answer rejected for draft '{draft_id}'"))?;
    draft.save(root).context("failed to save draft")?;

    if json {
        print_json(&status_json(&draft))?;
    } else if draft.is_complete() {
        println!("Draft {draft_id} complete; run `specman draft finalize {draft_id}`");
    } else {
        print_prompt(&draft);
    }
    Ok(())
}

fn show(root: &Path, draft_id: &str, json: bool) -> anyhow::Result<()> {
    let draft = Draft::load(root, draft_id).with_context(|| format!("draft '{draft_id}' not found"))?;

    if json {
        print_json(&status_json(&draft))?;
    } else {
        println!("Draft:  {}", draft.id);
        println!("Type:   {}", draft.spec_type);
        println!("Slug:   {}", draft.slug);
        for (key, value) in &draft.answers {
            println!("  {key}: {value}");
        }
        if draft.is_complete() {
            println!("All questions answered");
        } else {
            print_prompt(&draft);
        }
    }
    Ok(())
}

fn finalize(root: &Path, draft_id: &str, json: bool) -> anyhow::Result<()> {
    let draft = Draft::load(root, draft_id).with_context(|| format!("draft '{draft_id}' not found"))?;
    let id = draft
        .finalize(root)
        .with_context(|| format!("failed to finalize draft '{draft_id}'"))?;

    if json {
        print_json(&serde_json::json!({ "draft": draft_id, "spec": id.to_string() }))?;
    } else {
        println!("Created {id} from {draft_id}");
    }
    Ok(())
}

fn abandon(root: &Path, draft_id: &str, json: bool) -> anyhow::Result<()> {
    Draft::abandon(root, draft_id).with_context(|| format!("draft '{draft_id}' not found"))?;
    if json {
        print_json(&serde_json::json!({ "abandoned": draft_id }))?;
    } else {
        println!("Abandoned {draft_id}");
    }
    Ok(())
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let drafts = Draft::list(root).context("failed to list drafts")?;

    if json {
        let items: Vec<_> = drafts.iter().map(status_json).collect();
        print_json(&items)?;
    } else if drafts.is_empty() {
        println!("No drafts in progress");
    } else {
        let rows: Vec<Vec<String>> = drafts
            .iter()
            .map(|d| {
                vec![
                    d.id.clone(),
                    d.spec_type.to_string(),
                    d.slug.clone(),
                    format!("{}/{}", d.cursor.min(d.questions().len()), d.questions().len()),
                ]
            })
            .collect();
        print_table(&["ID", "TYPE", "SLUG", "ANSWERED"], rows);
    }
    Ok(())
}

fn print_prompt(draft: &Draft) {
    if let Some(question) = draft.current_question() {
        let marker = if question.required { "" } else { " (optional)" };
        println!("Next{marker}: {}", question.prompt);
    }
}

fn status_json(draft: &Draft) -> serde_json::Value {
    serde_json::json!({
        "id": &draft.id,
        "type": draft.spec_type.to_string(),
        "slug": &draft.slug,
        "answers": &draft.answers,
        "complete": draft.is_complete(),
        "next_question": draft.current_question().map(|q| serde_json::json!({
            "key": q.key,
            "prompt": q.prompt,
            "required": q.required,
        })),
    })
}
