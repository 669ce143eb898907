//! Graphviz DOT export implementation.
//!
//! One node per module, labelled with its controller, provider, import and
//! entity counts. Import edges run from a module to each module it imports,
//! forward references drawn dashed and red. Provider edges run from each
//! provider to each of its dependencies.

use super::Exporter;
use crate::graph::ModuleGraph;
use crate::parser::types::ModuleRecord;
use std::io::{self, Write};

/// DOT exporter implementation.
pub struct DotExporter;

impl Exporter for DotExporter {
    fn export<W: Write>(&self, graph: &ModuleGraph, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "digraph {{")?;
        writeln!(writer, "  rankdir=LR;")?;
        writeln!(writer, "  node [shape=box, style=rounded];")?;

        for (name, module) in graph.iter() {
            writeln!(
                writer,
                "  \"{}\" [label=\"{}\"];",
                escape_id(name),
                escape_label(&node_label(module))
            )?;
        }

        for (name, module) in graph.iter() {
            for import in &module.imports {
                let style = if import.is_forward_reference {
                    "style=dashed, color=red, label=\"forwardRef\""
                } else {
                    "label=\"imports\""
                };
                writeln!(
                    writer,
                    "  \"{}\" -> \"{}\" [{}];",
                    escape_id(name),
                    escape_id(&import.name),
                    style
                )?;
            }
        }

        for module in graph.modules() {
            for provider in &module.providers {
                for dependency in &provider.dependencies {
                    writeln!(
                        writer,
                        "  \"{}\" -> \"{}\" [color=blue, label=\"injects\"];",
                        escape_id(&provider.name),
                        escape_id(dependency)
                    )?;
                }
            }
        }

        writeln!(writer, "}}")
    }
}

fn node_label(module: &ModuleRecord) -> String {
    format!(
        "{}\nControllers: {}\nProviders: {}\nImports: {}\nEntities: {}",
        module.name,
        module.controllers.len(),
        module.providers.len(),
        module.imports.len(),
        module.entity_count
    )
}

/// Escape a node identifier for use inside double quotes.
fn escape_id(id: &str) -> String {
    id.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Escape a label: quotes as in identifiers, newlines as DOT line breaks.
fn escape_label(label: &str) -> String {
    escape_id(label).replace('\n', "\\n")
}
