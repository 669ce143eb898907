//! Export functionality for module graphs.
//!
//! This module provides exporters for outputting a linked [`ModuleGraph`]
//! as structured JSON or as a Graphviz DOT diagram.

pub mod dot;
pub mod json;

use crate::graph::ModuleGraph;
use std::io::{self, Write};
use tracing::warn;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// JSON format - ordered `[name, module]` pairs, full detail
    #[default]
    Json,
    /// DOT format - Graphviz diagram
    Dot,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "dot" | "graphviz" | "gv" => Ok(ExportFormat::Dot),
            _ => Err(format!(
                "Unknown export format: '{}'. Valid formats: json, dot",
                s
            )),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Dot => write!(f, "dot"),
        }
    }
}

impl ExportFormat {
    /// Parse a format name, falling back to JSON for anything unrecognized.
    ///
    /// ```
    /// use nestscope::export::ExportFormat;
    ///
    /// assert_eq!(ExportFormat::from_name_or_default("DOT"), ExportFormat::Dot);
    /// assert_eq!(ExportFormat::from_name_or_default("svg"), ExportFormat::Json);
    /// ```
    pub fn from_name_or_default(name: &str) -> Self {
        name.parse().unwrap_or_else(|e: String| {
            warn!("{}; falling back to {}", e, ExportFormat::default());
            ExportFormat::default()
        })
    }

    /// Conventional file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Dot => "dot",
        }
    }
}

/// Trait for exporters.
pub trait Exporter {
    /// Export the graph to the given writer.
    fn export<W: Write>(&self, graph: &ModuleGraph, writer: &mut W) -> io::Result<()>;
}

/// Export a graph in the specified format.
pub fn export<W: Write>(
    format: ExportFormat,
    graph: &ModuleGraph,
    writer: &mut W,
) -> io::Result<()> {
    match format {
        ExportFormat::Json => json::JsonExporter.export(graph, writer),
        ExportFormat::Dot => dot::DotExporter.export(graph, writer),
    }
}

/// Export a graph to a string.
pub fn export_to_string(format: ExportFormat, graph: &ModuleGraph) -> io::Result<String> {
    let mut buffer = Vec::new();
    export(format, graph, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
