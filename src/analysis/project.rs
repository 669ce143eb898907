//! Project scanning.
//!
//! Walks a project directory, extracts every module file with a fresh
//! [`ModuleParser`] and links the result into one [`ModuleGraph`].

use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::extractor::ModuleParser;
use crate::config::ScanConfig;
use crate::error::{AnalysisError, AnalysisResult};
use crate::graph::ModuleGraph;
use crate::parser::syntax::SyntaxTree;

/// Extract one module file and register the result in `graph`.
///
/// Returns true if the file declared a module.
pub fn register_file(
    graph: &mut ModuleGraph,
    path: &Path,
    source: String,
    config: &ScanConfig,
) -> AnalysisResult<bool> {
    let tree = SyntaxTree::parse(source, path)?;
    let mut parser = ModuleParser::with_decoy_names(config.decoy_names.clone());

    match parser.parse(&tree) {
        Some(extraction) => {
            for skipped in &extraction.skipped {
                debug!(module = %extraction.module.name, "skipped {}", skipped);
            }
            graph.register(extraction.module, extraction.skipped);
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Scan `root` for module files and build the linked project graph.
///
/// Traversal is sorted by file name, so discovery order (and therefore
/// graph order and first-match resolution) is deterministic. Any I/O error
/// aborts the scan.
///
/// # Example
///
/// ```ignore
/// use std::path::Path;
/// use nestscope::analysis::scan_project;
/// use nestscope::config::ScanConfig;
///
/// let graph = scan_project(Path::new("./my-api"), &ScanConfig::default())?;
/// for (name, module) in graph.iter() {
///     println!("{}: {} providers", name, module.providers.len());
/// }
/// ```
pub fn scan_project(root: &Path, config: &ScanConfig) -> AnalysisResult<ModuleGraph> {
    let mut graph = ModuleGraph::new();
    let mut files = 0usize;

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_ignored_dir(e, config));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if !config.is_module_file(&name) {
            continue;
        }

        let path = entry.path();
        // Undecodable bytes are replaced rather than failing the whole scan.
        let bytes = fs::read(path).map_err(|e| AnalysisError::io(path, e))?;
        let source = String::from_utf8_lossy(&bytes).into_owned();
        files += 1;

        match register_file(&mut graph, path, source, config) {
            Ok(_) => {}
            Err(AnalysisError::UnsupportedFileType(ext)) => {
                warn!(file = %path.display(), ext = %ext, "no grammar for module file; skipping");
            }
            Err(e) => return Err(e),
        }
    }

    let stats = graph.link();
    info!(
        root = %root.display(),
        files,
        modules = graph.len(),
        collisions = graph.collisions().len(),
        imports_unresolved = stats.imports_unresolved,
        "scan complete"
    );

    Ok(graph)
}

/// Check if a directory should be ignored during traversal.
fn is_ignored_dir(entry: &walkdir::DirEntry, config: &ScanConfig) -> bool {
    // Never filter the root itself, whatever it is called.
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    config.is_ignored_dir(&entry.file_name().to_string_lossy())
}
