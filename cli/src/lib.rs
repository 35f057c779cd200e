//! Authoring tools for map configurations: validation and popup preview.

pub mod cli;
pub mod commands;
pub mod utils;
