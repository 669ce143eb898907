//! JSON export implementation.
//!
//! Emits the graph as an ordered array of `[moduleName, moduleRecord]`
//! pairs. Every record field is written, so [`parse_graph`] can rebuild the
//! same mapping from the output.

use super::Exporter;
use crate::error::AnalysisResult;
use crate::graph::ModuleGraph;
use crate::parser::types::ModuleRecord;
use std::io::{self, Write};

/// JSON exporter implementation.
pub struct JsonExporter;

impl Exporter for JsonExporter {
    fn export<W: Write>(&self, graph: &ModuleGraph, writer: &mut W) -> io::Result<()> {
        let pairs: Vec<(&String, &ModuleRecord)> = graph.iter().collect();

        let json = serde_json::to_string_pretty(&pairs)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        writeln!(writer, "{}", json)
    }
}

/// Rebuild a graph from [`JsonExporter`] output.
///
/// Collision and skipped-element reports are not part of the structured
/// form and come back empty.
pub fn parse_graph(json: &str) -> AnalysisResult<ModuleGraph> {
    let pairs: Vec<(String, ModuleRecord)> = serde_json::from_str(json)?;
    Ok(ModuleGraph::from_pairs(pairs))
}

impl ModuleGraph {
    /// See [`parse_graph`].
    pub fn from_json(json: &str) -> AnalysisResult<Self> {
        parse_graph(json)
    }
}
