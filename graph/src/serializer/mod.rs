//! Serializers for a manager's resolved graph.
//!
//! - **JSON** ([`json`]) — a nested snapshot of every cached model and value,
//!   printed by `modelgraph show`.

pub mod json;
