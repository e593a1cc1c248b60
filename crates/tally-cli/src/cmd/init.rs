//! `tly init` — initialize a tally project.

use anyhow::{Context, Result};
use clap::Args;
use std::path::Path;

use tally_core::TallyConfig;

use crate::output::{OutputMode, render_success};
use crate::project::{TALLY_DIR, open_store};

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Seed the dashboard roster with these users.
    #[arg(short, long)]
    pub user: Vec<String>,
}

pub fn run_init(args: &InitArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let tally_dir = project_root.join(TALLY_DIR);
    let already = tally_dir.is_dir();
    std::fs::create_dir_all(&tally_dir)
        .with_context(|| format!("create {}", tally_dir.display()))?;

    let config_path = tally_dir.join("config.toml");
    if !config_path.exists() {
        let mut config = TallyConfig::default();
        config.dashboard.users = args.user.clone();
        let body = toml::to_string_pretty(&config).context("encode default config")?;
        std::fs::write(&config_path, body)
            .with_context(|| format!("write {}", config_path.display()))?;
    }

    // Creates the database and schema as a side effect.
    open_store(project_root)?;

    tracing::info!(path = %tally_dir.display(), "tally project initialized");
    if already {
        render_success(output, "Reinitialized existing tally project")?;
    } else {
        render_success(output, "Initialized tally project in .tally/")?;
    }
    Ok(())
}
