//! Graph module for project-wide module relationships.
//!
//! This module provides the [`ModuleGraph`] mapping and the cross-file
//! linking passes that turn per-file extraction results into one
//! cross-referenced graph.
//!
//! # Example
//!
//! ```rust
//! use nestscope::graph::ModuleGraph;
//! use nestscope::parser::{ImportRecord, ModuleRecord};
//!
//! let mut a = ModuleRecord::new("A", Some("a.module.ts".into()));
//! a.imports.push(ImportRecord::simple("B", None));
//!
//! let mut graph = ModuleGraph::new();
//! graph.register(a, vec![]);
//! graph.register(ModuleRecord::new("B", Some("b.module.ts".into())), vec![]);
//! graph.link();
//!
//! assert_eq!(graph.len(), 2);
//! assert!(graph.get("A").unwrap().imports[0].is_resolved());
//! ```

mod linker;
mod module_graph;

pub use linker::{LinkStats, ProviderIndex};
pub use module_graph::{ImportCycle, ModuleCollision, ModuleGraph};
