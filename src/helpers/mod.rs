//! Helper functions shared by the renderer, store and server

mod date;
mod html;

pub use date::*;
pub use html::*;
