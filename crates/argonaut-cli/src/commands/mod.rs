pub mod render;
pub mod workflow;
