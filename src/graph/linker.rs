//! Cross-file linking.
//!
//! Once every module file has been extracted, linking resolves import
//! references to the modules they name and rewrites provider dependency
//! names to canonical provider identities. Unresolved names are left as they
//! are. The linker performs no cycle detection of its own.

use std::collections::HashMap;

use tracing::debug;

use super::module_graph::ModuleGraph;
use crate::parser::types::ModuleSnapshot;

/// Provider token -> canonical provider name, first registration wins.
///
/// Built once per linking pass. Scanning modules and their providers in
/// mapping order and keeping only the first entry per token reproduces the
/// result of a linear first-match search.
#[derive(Debug, Default)]
pub struct ProviderIndex {
    canonical: HashMap<String, String>,
}

impl ProviderIndex {
    pub fn build(graph: &ModuleGraph) -> Self {
        let mut canonical = HashMap::new();
        for provider in graph.modules().flat_map(|m| m.providers.iter()) {
            canonical
                .entry(provider.name.clone())
                .or_insert_with(|| provider.name.clone());
            if let Some(token) = &provider.provide {
                canonical
                    .entry(token.clone())
                    .or_insert_with(|| provider.name.clone());
            }
        }
        Self { canonical }
    }

    /// Canonical name of the first provider answering to `token`.
    pub fn resolve(&self, token: &str) -> Option<&str> {
        self.canonical.get(token).map(String::as_str)
    }
}

/// Result counters from one linking run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkStats {
    pub imports_resolved: usize,
    pub imports_unresolved: usize,
    pub dependencies_resolved: usize,
    pub dependencies_unresolved: usize,
}

impl ModuleGraph {
    /// Runs both linking passes over the whole graph.
    ///
    /// Provider dependencies are canonicalized before import snapshots are
    /// taken, so snapshots carry canonical names and re-linking an already
    /// linked graph changes nothing.
    ///
    /// # Example
    ///
    /// ```
    /// use nestscope::graph::ModuleGraph;
    /// use nestscope::parser::{ImportRecord, ModuleRecord};
    ///
    /// let mut app = ModuleRecord::new("A", Some("a.module.ts".into()));
    /// app.imports.push(ImportRecord::simple("B", None));
    /// let mut graph = ModuleGraph::new();
    /// graph.register(app, vec![]);
    /// graph.register(ModuleRecord::new("B", Some("b.module.ts".into())), vec![]);
    ///
    /// graph.link();
    /// let import = &graph.get("A").unwrap().imports[0];
    /// assert_eq!(import.path.as_deref(), Some("b.module.ts"));
    /// assert_eq!(import.module.as_ref().unwrap().name, "B");
    /// ```
    pub fn link(&mut self) -> LinkStats {
        let mut stats = self.link_provider_dependencies();
        let imports = self.link_imports();
        stats.imports_resolved = imports.imports_resolved;
        stats.imports_unresolved = imports.imports_unresolved;

        debug!(
            modules = self.len(),
            imports_resolved = stats.imports_resolved,
            imports_unresolved = stats.imports_unresolved,
            dependencies_resolved = stats.dependencies_resolved,
            dependencies_unresolved = stats.dependencies_unresolved,
            "linked module graph"
        );
        stats
    }

    /// Points every import at the module it names.
    ///
    /// Found targets set `path` to the target's file and attach a snapshot of
    /// its name, providers and controllers. Imports of modules that are not
    /// part of the graph keep whatever `path` extraction gave them.
    pub fn link_imports(&mut self) -> LinkStats {
        let targets: HashMap<String, (Option<String>, ModuleSnapshot)> = self
            .modules
            .values()
            .map(|m| (m.name.clone(), (m.file_path.clone(), m.snapshot())))
            .collect();

        let mut stats = LinkStats::default();
        for import in self.modules.values_mut().flat_map(|m| m.imports.iter_mut()) {
            match targets.get(&import.name) {
                Some((file_path, snapshot)) => {
                    if file_path.is_some() {
                        import.path = file_path.clone();
                    }
                    import.module = Some(snapshot.clone());
                    stats.imports_resolved += 1;
                }
                None => stats.imports_unresolved += 1,
            }
        }
        stats
    }

    /// Rewrites each provider dependency to the canonical name of the first
    /// provider, in mapping order, whose `name` or `provide` equals it.
    pub fn link_provider_dependencies(&mut self) -> LinkStats {
        let index = ProviderIndex::build(self);

        let mut stats = LinkStats::default();
        for provider in self
            .modules
            .values_mut()
            .flat_map(|m| m.providers.iter_mut())
        {
            for dependency in &mut provider.dependencies {
                match index.resolve(dependency) {
                    Some(canonical) => {
                        if canonical != dependency.as_str() {
                            *dependency = canonical.to_string();
                        }
                        stats.dependencies_resolved += 1;
                    }
                    None => stats.dependencies_unresolved += 1,
                }
            }
        }
        stats
    }
}
