//! CLI sub-commands

pub mod list;
pub mod manage;
pub mod new;
pub mod render;
pub mod seed;
