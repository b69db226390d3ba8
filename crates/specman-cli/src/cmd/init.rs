use anyhow::Context;
use specman_core::{config::Config, io, paths, types::SpecType};
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    let project_name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "project".to_string());

    println!("Initializing spec store in: {}", root.display());

    io::ensure_dir(&paths::specs_dir(root)).context("failed to create .specs")?;
    for &t in SpecType::all() {
        let p = paths::type_dir(root, t);
        io::ensure_dir(&p).with_context(|| format!("failed to create {}", p.display()))?;
    }
    io::ensure_dir(&paths::drafts_dir(root)).context("failed to create .specs/drafts")?;

    let config_path = paths::config_path(root);
    if !config_path.exists() {
        let cfg = Config::new(&project_name);
        cfg.save(root).context("failed to write config.yaml")?;
        println!("  created: .specs/config.yaml");
    } else {
        println!("  exists:  .specs/config.yaml");
    }

    Ok(())
}
