//! `tly comment` — append a comment to a task.

use anyhow::Result;
use chrono::Utc;
use clap::Args;
use std::path::Path;

use tally_core::store;

use crate::output::{OutputMode, pretty_kv, render};
use crate::project::open_store;

const MAX_COMMENT_CHARS: usize = 8_192;

#[derive(Args, Debug)]
pub struct CommentArgs {
    /// Task ID to comment on.
    pub id: String,

    /// Comment text.
    pub text: String,
}

fn validate_comment_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        anyhow::bail!("comment text must not be empty");
    }

    if text.chars().count() > MAX_COMMENT_CHARS {
        anyhow::bail!(
            "comment text must be <= {MAX_COMMENT_CHARS} characters (got {})",
            text.chars().count()
        );
    }

    if text
        .chars()
        .any(|ch| ch.is_control() && ch != '\n' && ch != '\t')
    {
        anyhow::bail!("comment text must not contain control characters");
    }

    Ok(())
}

pub fn run_comment(args: &CommentArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    validate_comment_text(&args.text)?;

    let conn = open_store(project_root)?;
    let comment = store::append_comment(&conn, &args.id, &args.text, Utc::now())?;

    render(output, &comment, |comment, w| {
        pretty_kv(w, "commented", &comment.text)?;
        pretty_kv(w, "at", comment.date.to_rfc3339())
    })
}
