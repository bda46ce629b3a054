pub mod cli;
pub mod commands;
pub mod highlighter;
pub mod lineage;
pub mod render;
pub mod utils;
