use crate::output::{print_json, print_table};
use anyhow::{bail, Context};
use specman_core::{config::Config, validate};
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load project config")?;
    let report =
        validate::validate_project(root, &config.validation).context("validation failed to run")?;

    if json {
        print_json(&report)?;
    } else if report.warnings.is_empty() {
        println!("All specs valid");
    } else {
        let rows: Vec<Vec<String>> = report
            .warnings
            .iter()
            .map(|w| {
                vec![
                    format!("{:?}", w.level).to_lowercase(),
                    w.code.clone(),
                    w.spec.clone(),
                    w.message.clone(),
                ]
            })
            .collect();
        print_table(&["LEVEL", "CODE", "SPEC", "MESSAGE"], rows);
        println!(
            "\n{} error(s), {} warning(s)",
            report.error_count(),
            report.warning_count()
        );
    }

    if !report.is_clean() {
        bail!("validation found {} error(s)", report.error_count());
    }
    Ok(())
}
