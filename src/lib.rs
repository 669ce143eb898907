//! nestscope - module dependency graphs for decorator-based DI projects
//!
//! This crate reads `@Module({...})` declarations out of TypeScript sources,
//! links them across a project into one graph and renders that graph as JSON
//! or Graphviz DOT.

pub mod analysis;
pub mod config;
pub mod error;
pub mod export;
pub mod graph;
pub mod parser;

pub use error::{AnalysisError, AnalysisResult};
