//! Human-readable renderings of build plans

pub mod plan_render;

pub use plan_render::{render_plan_markdown, render_plan_text};
