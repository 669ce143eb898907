//! Parser module for nestscope.
//!
//! This module owns the syntax-tree adapter and the record types every
//! later stage passes around.
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use nestscope::parser::SyntaxTree;
//!
//! let tree = SyntaxTree::parse("@Module({}) export class AppModule {}", Path::new("app.module.ts")).unwrap();
//! assert_eq!(tree.root().kind(), "program");
//! ```

pub mod syntax;
pub mod types;

// Re-export commonly used types for convenience
pub use syntax::{SourceLanguage, SyntaxTree};
pub use types::{
    Facet, ImportRecord, ModuleRecord, ModuleSnapshot, NameGenerator, ProviderKind,
    ProviderRecord, SkipReason, SkippedElement,
};
