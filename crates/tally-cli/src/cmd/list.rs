//! `tly list` — list tasks with filtering.

use anyhow::Result;
use clap::Args;
use std::io::Write;
use std::path::Path;

use tally_core::model::{Status, Task};
use tally_core::store;

use crate::output::{OutputMode, render};
use crate::project::open_store;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only show tasks belonging to this user.
    #[arg(short, long)]
    pub owner: Option<String>,

    /// Filter by status: pending, in_progress, completed.
    #[arg(short, long)]
    pub status: Option<String>,
}

pub fn run_list(args: &ListArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let status_filter = args
        .status
        .as_deref()
        .map(str::parse::<Status>)
        .transpose()?;

    let conn = open_store(project_root)?;
    let mut tasks = match &args.owner {
        Some(owner) => store::tasks_for_owner(&conn, owner)?,
        None => store::list_tasks(&conn)?,
    };
    if let Some(status) = status_filter {
        tasks.retain(|task| task.status.known() == Some(status));
    }

    render(output, &tasks, |tasks, w| {
        if tasks.is_empty() {
            return writeln!(w, "No tasks found.");
        }
        for task in tasks.iter() {
            write_row(task, w)?;
        }
        Ok(())
    })
}

fn write_row(task: &Task, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(
        w,
        "{}  {:<11}  {:<10}  {}",
        task.id,
        task.status.as_str(),
        task.owner,
        task.title
    )
}
