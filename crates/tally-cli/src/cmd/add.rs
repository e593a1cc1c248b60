//! `tly add` — create a new task.

use anyhow::Result;
use chrono::Utc;
use clap::Args;
use std::path::Path;

use tally_core::model::{Tag, TagEntry};
use tally_core::store::{self, NewTask};

use crate::output::{OutputMode, pretty_kv, render};
use crate::project::open_store;

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Title of the new task.
    #[arg(short, long)]
    pub title: String,

    /// Description text.
    #[arg(short, long, default_value = "")]
    pub description: String,

    /// User the task belongs to.
    #[arg(short, long)]
    pub owner: String,

    /// Tag labels to attach (repeatable).
    #[arg(short = 'g', long = "tag")]
    pub tags: Vec<String>,
}

pub fn run_add(args: &AddArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let conn = open_store(project_root)?;

    let new = NewTask {
        owner: args.owner.clone(),
        title: args.title.clone(),
        description: args.description.clone(),
        tags: args
            .tags
            .iter()
            .map(|label| TagEntry::Structured(Tag::labeled(label)))
            .collect(),
    };
    let task = store::insert_task(&conn, &new, Utc::now())?;

    render(output, &task, |task, w| {
        pretty_kv(w, "id", &task.id)?;
        pretty_kv(w, "owner", &task.owner)?;
        pretty_kv(w, "title", &task.title)?;
        pretty_kv(w, "status", task.status.as_str())
    })
}
