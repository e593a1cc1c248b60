//! Command handlers for the `tly` binary.

pub mod add;
pub mod comment;
pub mod dashboard;
pub mod delete;
pub mod init;
pub mod list;
pub mod update;
