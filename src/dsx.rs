//! Render DataStage job definitions from templates

/// Placeholder values derived from deployment configuration
pub mod context;

/// Strict `$NAME` substitution and writing the rendered `.dsx` to disk
pub mod render;
