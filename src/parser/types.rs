//! Shared types for module graph extraction.
//!
//! This module defines the records produced for every discovered module
//! declaration: the module itself, its import entries and its providers.
//! Field names serialize in camelCase so the structured output mirrors the
//! in-memory shape one to one.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix used for generated placeholder names.
pub const PLACEHOLDER_PREFIX: &str = "UnknownModule_";

/// Represents one discovered module declaration.
///
/// A record is created once per file during extraction and later enriched in
/// place: imports and providers gain resolved dependency lists during
/// single-file enrichment and again during project-wide linking.
///
/// # Example
///
/// ```
/// use nestscope::parser::types::ModuleRecord;
///
/// let module = ModuleRecord::new("AppModule", Some("src/app.module.ts".to_string()));
/// assert_eq!(module.name, "AppModule");
/// assert!(module.imports.is_empty());
/// assert_eq!(module.entity_count, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ModuleRecord {
    /// Module identifier, unique within a project (last registration wins).
    pub name: String,

    /// Originating file. Absent only for synthetic placeholder modules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,

    /// Import entries in source order.
    #[serde(default)]
    pub imports: Vec<ImportRecord>,

    /// Exported identifier names in source order.
    #[serde(default)]
    pub exports: Vec<String>,

    /// Providers in source order.
    #[serde(default)]
    pub providers: Vec<ProviderRecord>,

    /// Controller identifier names in source order.
    #[serde(default)]
    pub controllers: Vec<String>,

    /// Heuristic count of persistence entities registered through
    /// recognized sub-module factory calls.
    #[serde(default)]
    pub entity_count: usize,
}

impl ModuleRecord {
    /// Creates an empty module record.
    pub fn new(name: impl Into<String>, file_path: Option<String>) -> Self {
        Self {
            name: name.into(),
            file_path,
            ..Self::default()
        }
    }

    /// Partial snapshot attached to imports that resolve to this module.
    pub fn snapshot(&self) -> ModuleSnapshot {
        ModuleSnapshot {
            name: self.name.clone(),
            providers: self.providers.clone(),
            controllers: self.controllers.clone(),
        }
    }
}

impl fmt::Display for ModuleRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} imports, {} providers, {} controllers)",
            self.name,
            self.imports.len(),
            self.providers.len(),
            self.controllers.len()
        )
    }
}

/// Partial view of a resolved import target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ModuleSnapshot {
    pub name: String,
    #[serde(default)]
    pub providers: Vec<ProviderRecord>,
    #[serde(default)]
    pub controllers: Vec<String>,
}

/// One entry in a module's import list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ImportRecord {
    /// Referenced module identifier.
    pub name: String,

    /// Resolved origin file or package specifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// True when the import was written as a call (`X.forRoot(...)`,
    /// `forwardRef(...)`) rather than a bare identifier.
    #[serde(default)]
    pub is_async: bool,

    /// True when the import was wrapped in a deferred reference.
    #[serde(default)]
    pub is_forward_reference: bool,

    /// Names reachable from the referenced module's own imports and providers.
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// Snapshot of the resolved target, set by cross-file linking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<ModuleSnapshot>,
}

impl ImportRecord {
    /// Creates an import written as a bare identifier.
    pub fn simple(name: impl Into<String>, path: Option<String>) -> Self {
        Self {
            name: name.into(),
            path,
            ..Self::default()
        }
    }

    /// Creates an import written as a call expression.
    pub fn call(name: impl Into<String>, path: Option<String>, is_forward_reference: bool) -> Self {
        Self {
            name: name.into(),
            path,
            is_async: true,
            is_forward_reference,
            ..Self::default()
        }
    }

    /// Creates a placeholder import for an unrecognized element.
    pub fn placeholder(name: impl Into<String>) -> Self {
        Self::simple(name, None)
    }

    /// Returns true once cross-file linking found the target module.
    pub fn is_resolved(&self) -> bool {
        self.module.is_some()
    }
}

impl fmt::Display for ImportRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if self.is_forward_reference {
            write!(f, " (forwardRef)")?;
        } else if self.is_async {
            write!(f, " (dynamic)")?;
        }
        if let Some(path) = &self.path {
            write!(f, " from {}", path)?;
        }
        Ok(())
    }
}

/// How a provider produces its value.
///
/// The variants are disjoint. When a provider object declares several
/// binding fields, `useClass` takes precedence over `useFactory`, which takes
/// precedence over `useValue`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Constructed from a class reference.
    #[default]
    Class,
    /// A static value.
    Value,
    /// Produced by a factory function.
    Factory,
}

impl ProviderKind {
    /// Returns a short label for the provider kind.
    pub fn label(&self) -> &'static str {
        match self {
            ProviderKind::Class => "class",
            ProviderKind::Value => "value",
            ProviderKind::Factory => "factory",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One dependency-injectable unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRecord {
    /// Injection token when one is declared, otherwise the class identifier.
    pub name: String,

    #[serde(rename = "type")]
    pub kind: ProviderKind,

    /// Constructor parameter types for class providers, the `inject` list for
    /// factory providers, empty for value providers.
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// True only if the underlying class carries `@Injectable()`.
    #[serde(default)]
    pub is_injectable: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provide: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_class: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_factory: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inject: Option<Vec<String>>,
}

impl ProviderRecord {
    /// Creates a class provider from a bare class reference.
    pub fn class(name: impl Into<String>, dependencies: Vec<String>, is_injectable: bool) -> Self {
        Self {
            name: name.into(),
            kind: ProviderKind::Class,
            dependencies,
            is_injectable,
            ..Self::default()
        }
    }
}

impl fmt::Display for ProviderRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)
    }
}

/// Mints placeholder names for malformed imports and modules.
///
/// Each parser owns its own generator so separate analyses never share a
/// counter.
#[derive(Debug, Clone, Default)]
pub struct NameGenerator {
    next: usize,
}

impl NameGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next `UnknownModule_<n>` name.
    pub fn next_placeholder(&mut self) -> String {
        let name = format!("{}{}", PLACEHOLDER_PREFIX, self.next);
        self.next += 1;
        name
    }
}

/// The decorator facet an element was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Facet {
    Decorator,
    Imports,
    Exports,
    Providers,
    Controllers,
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Facet::Decorator => "decorator",
            Facet::Imports => "imports",
            Facet::Exports => "exports",
            Facet::Providers => "providers",
            Facet::Controllers => "controllers",
        };
        write!(f, "{}", s)
    }
}

/// Why an element did not make it into the record verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SkipReason {
    /// The decorator has no call form or no object-literal argument.
    MissingArguments,
    /// A facet field exists but is not an array literal.
    NotAnArray,
    /// An import element of unknown shape was replaced by a placeholder.
    UnrecognizedImport,
    /// A provider object without a usable `provide` field was dropped.
    MissingProvide,
    /// A provider element that is neither an identifier nor an object.
    UnrecognizedProvider,
    /// A non-identifier export or controller element was dropped.
    NotAnIdentifier,
}

/// An element that was dropped or replaced during best-effort extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedElement {
    pub facet: Facet,
    /// Syntax node kind of the offending element.
    pub node_kind: String,
    pub reason: SkipReason,
    /// 1-indexed source line.
    pub line: usize,
    /// Placeholder name minted in its place, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl fmt::Display for SkippedElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} `{}` at line {}: {:?}",
            self.facet, self.node_kind, self.line, self.reason
        )?;
        if let Some(name) = &self.placeholder {
            write!(f, " -> {}", name)?;
        }
        Ok(())
    }
}
