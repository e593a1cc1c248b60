//! `tly update` — field-level patch of an existing task.

use anyhow::{Result, bail};
use clap::Args;
use std::path::Path;

use tally_core::model::{Status, StatusValue, Tag, TagEntry};
use tally_core::store::{self, TaskPatch};

use crate::output::{OutputMode, pretty_kv, render};
use crate::project::open_store;

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Task ID to update.
    pub id: String,

    /// New title.
    #[arg(short, long)]
    pub title: Option<String>,

    /// New description.
    #[arg(short, long)]
    pub description: Option<String>,

    /// New status: pending, in_progress, completed.
    #[arg(short, long)]
    pub status: Option<String>,

    /// Replace the tag list with these labels (repeatable).
    #[arg(short = 'g', long = "tag")]
    pub tags: Vec<String>,
}

pub fn run_update(args: &UpdateArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let status = args
        .status
        .as_deref()
        .map(str::parse::<Status>)
        .transpose()?
        .map(StatusValue::Known);

    let patch = TaskPatch {
        title: args.title.clone(),
        description: args.description.clone(),
        status,
        tags: (!args.tags.is_empty()).then(|| {
            args.tags
                .iter()
                .map(|label| TagEntry::Structured(Tag::labeled(label)))
                .collect()
        }),
    };
    if patch.is_empty() {
        bail!("nothing to update: pass at least one of --title/--description/--status/--tag");
    }

    let conn = open_store(project_root)?;
    let task = store::update_task(&conn, &args.id, &patch)?;

    render(output, &task, |task, w| {
        pretty_kv(w, "id", &task.id)?;
        pretty_kv(w, "status", task.status.as_str())?;
        pretty_kv(w, "title", &task.title)
    })
}
