//! MathLingua Core Types
//!
//! This crate provides the data model shared by the MathLingua parser and
//! its tools:
//!
//! - **Spans and positions**: byte ranges and resolved row/column points ([`span`])
//! - **Schemas**: the static section table that drives structural parsing ([`schema`])
//! - **AST**: the typed document tree ([`ast`])
//! - **Scopes**: the per-document scope arena and scope-aware cloning ([`scope`])
//! - **Walking**: generic child traversal over every node ([`walk`])
//! - **Rendering**: source-like debug output for golden tests ([`render`])

pub mod ast;
pub mod render;
pub mod schema;
pub mod scope;
pub mod span;
pub mod walk;
