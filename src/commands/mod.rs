//! CLI commands

pub mod check;
pub mod embed;
pub mod list;
pub mod new;
pub mod show;
