//! `tly delete` — delete a task by id.

use anyhow::Result;
use clap::Args;
use std::path::Path;

use tally_core::store;

use crate::output::{OutputMode, render_success};
use crate::project::open_store;

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Task ID to delete.
    pub id: String,
}

pub fn run_delete(args: &DeleteArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let conn = open_store(project_root)?;
    // Deleting an unknown id is not an error; the store deletes blindly.
    store::delete_task(&conn, &args.id)?;
    render_success(output, &format!("Deleted {}", args.id))
}
