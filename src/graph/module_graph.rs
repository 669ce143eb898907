//! Project-wide module mapping.
//!
//! [`ModuleGraph`] keys every discovered module by name in discovery order.
//! Edges are implicit: imports point at modules by name and providers point
//! at other providers through their dependency lists. A petgraph view is
//! built on demand for cycle queries.

use indexmap::IndexMap;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use tracing::warn;

use crate::parser::types::{ModuleRecord, SkippedElement};

/// A module registration that replaced an earlier one with the same name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleCollision {
    pub name: String,
    /// File of the registration that now owns the name.
    pub kept: Option<String>,
    /// File of the registration that was overwritten.
    pub discarded: Option<String>,
}

/// A strongly connected group of modules linked through resolved imports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportCycle {
    /// Module names participating in the cycle.
    pub modules: Vec<String>,
    /// True if at least one import inside the cycle is a forward reference.
    pub forward_referenced: bool,
}

impl ImportCycle {
    /// Returns a human-readable representation of the cycle path.
    ///
    /// ```
    /// use nestscope::graph::ImportCycle;
    ///
    /// let cycle = ImportCycle { modules: vec!["A".into(), "B".into()], forward_referenced: true };
    /// assert_eq!(cycle.cycle_path(), "A -> B -> A");
    /// ```
    pub fn cycle_path(&self) -> String {
        match self.modules.first() {
            Some(first) => format!("{} -> {}", self.modules.join(" -> "), first),
            None => String::new(),
        }
    }
}

/// Mapping from module name to [`ModuleRecord`], in discovery order.
///
/// Registering a name twice keeps the original position and replaces the
/// record; the overwritten registration is logged and kept in
/// [`ModuleGraph::collisions`].
///
/// # Example
///
/// ```
/// use nestscope::graph::ModuleGraph;
/// use nestscope::parser::ModuleRecord;
///
/// let mut graph = ModuleGraph::new();
/// graph.register(ModuleRecord::new("AppModule", Some("app.module.ts".into())), vec![]);
/// graph.register(ModuleRecord::new("UsersModule", Some("users.module.ts".into())), vec![]);
///
/// assert_eq!(graph.len(), 2);
/// assert_eq!(graph.module_names(), vec!["AppModule", "UsersModule"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleGraph {
    pub(crate) modules: IndexMap<String, ModuleRecord>,
    collisions: Vec<ModuleCollision>,
    skipped: IndexMap<String, Vec<SkippedElement>>,
}

impl ModuleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from ordered `(name, record)` pairs.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, ModuleRecord)>) -> Self {
        Self {
            modules: pairs.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Registers a module under its name. Last registration wins.
    ///
    /// Returns the record that was replaced, if any.
    pub fn register(
        &mut self,
        module: ModuleRecord,
        skipped: Vec<SkippedElement>,
    ) -> Option<ModuleRecord> {
        let name = module.name.clone();
        let kept = module.file_path.clone();
        let previous = self.modules.insert(name.clone(), module);

        if let Some(previous) = &previous {
            warn!(
                module = %name,
                kept = kept.as_deref().unwrap_or("<none>"),
                discarded = previous.file_path.as_deref().unwrap_or("<none>"),
                "module name registered twice; keeping the later declaration"
            );
            self.collisions.push(ModuleCollision {
                name: name.clone(),
                kept,
                discarded: previous.file_path.clone(),
            });
        }

        if skipped.is_empty() {
            self.skipped.shift_remove(&name);
        } else {
            self.skipped.insert(name, skipped);
        }
        previous
    }

    pub fn get(&self, name: &str) -> Option<&ModuleRecord> {
        self.modules.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ModuleRecord> {
        self.modules.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Iterates `(name, record)` pairs in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ModuleRecord)> {
        self.modules.iter()
    }

    pub fn modules(&self) -> impl Iterator<Item = &ModuleRecord> {
        self.modules.values()
    }

    pub fn module_names(&self) -> Vec<&str> {
        self.modules.keys().map(String::as_str).collect()
    }

    /// Total providers across all modules.
    pub fn provider_count(&self) -> usize {
        self.modules.values().map(|m| m.providers.len()).sum()
    }

    /// Total import entries across all modules.
    pub fn import_edge_count(&self) -> usize {
        self.modules.values().map(|m| m.imports.len()).sum()
    }

    /// Overwritten registrations, in the order they happened.
    pub fn collisions(&self) -> &[ModuleCollision] {
        &self.collisions
    }

    /// Elements that extraction dropped or replaced, by module name.
    pub fn skipped(&self) -> &IndexMap<String, Vec<SkippedElement>> {
        &self.skipped
    }

    /// True if `name` was extracted without dropping or replacing anything.
    pub fn is_fully_resolved(&self, name: &str) -> bool {
        self.contains(name) && !self.skipped.contains_key(name)
    }

    /// Detects cycles among imports that resolve to modules in this graph.
    ///
    /// Uses Tarjan's strongly connected components over a directed view of
    /// import edges. A module importing itself is reported as a cycle of one.
    pub fn import_cycles(&self) -> Vec<ImportCycle> {
        let mut graph: DiGraph<&str, bool> = DiGraph::with_capacity(self.len(), 0);
        let indices: HashMap<&str, NodeIndex> = self
            .modules
            .keys()
            .map(|name| (name.as_str(), graph.add_node(name.as_str())))
            .collect();

        for (name, module) in &self.modules {
            for import in &module.imports {
                if let Some(&target) = indices.get(import.name.as_str()) {
                    graph.add_edge(indices[name.as_str()], target, import.is_forward_reference);
                }
            }
        }

        let mut cycles = Vec::new();
        for scc in tarjan_scc(&graph) {
            let is_cycle = scc.len() > 1 || graph.contains_edge(scc[0], scc[0]);
            if !is_cycle {
                continue;
            }

            // tarjan_scc yields members in reverse discovery order.
            let mut members = scc.clone();
            members.sort();
            let forward_referenced = graph
                .edge_indices()
                .filter(|&e| graph[e])
                .filter_map(|e| graph.edge_endpoints(e))
                .any(|(a, b)| members.contains(&a) && members.contains(&b));

            cycles.push(ImportCycle {
                modules: members.iter().map(|&idx| graph[idx].to_string()).collect(),
                forward_referenced,
            });
        }

        cycles
    }
}
