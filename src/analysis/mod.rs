//! Source code analysis module for nestscope.
//!
//! This module extracts module declarations from TypeScript source files
//! written against a decorator-based dependency-injection framework.
//!
//! # Features
//!
//! - Find the `@Module({...})` class in a file and read its imports,
//!   providers, controllers and exports
//! - Recognize configured imports (`X.forRoot(...)`) and forward references
//!   (`forwardRef(() => X)`)
//! - Classify providers as class, factory or value bindings and recover
//!   their constructor or `inject` dependencies
//! - Count entities registered through recognized ORM calls
//! - Scan a whole project and link the results
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use nestscope::analysis::scan_project;
//! use nestscope::config::ScanConfig;
//!
//! let graph = scan_project(Path::new("./src"), &ScanConfig::default())?;
//! println!("{} modules", graph.len());
//! ```

pub mod extractor;
pub mod project;
pub mod resolver;

// Re-export main types for convenience
pub use extractor::{entity_count, Extraction, ModuleParser};
pub use project::{register_file, scan_project};
pub use resolver::{ClassDeclaration, SymbolResolver};
