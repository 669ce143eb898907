//! Tree-sitter adapter for TypeScript and JavaScript module files.
//!
//! [`SyntaxTree`] owns both the source text and its parsed tree so that
//! extraction code can hand out `&str` slices and [`Node`]s with the same
//! lifetime.

use std::path::{Path, PathBuf};

use tree_sitter::{Language, Node, Parser, Tree};

use crate::error::{AnalysisError, AnalysisResult};

/// Language type for file analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLanguage {
    JavaScript,
    TypeScript,
    Tsx,
    Jsx,
}

impl SourceLanguage {
    /// Determine language from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "js" | "mjs" | "cjs" => Some(SourceLanguage::JavaScript),
            "jsx" => Some(SourceLanguage::Jsx),
            "ts" | "mts" | "cts" => Some(SourceLanguage::TypeScript),
            "tsx" => Some(SourceLanguage::Tsx),
            _ => None,
        }
    }

    /// Determine language from a file path.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Get tree-sitter language for this source language.
    pub fn tree_sitter_language(&self) -> Language {
        match self {
            SourceLanguage::JavaScript | SourceLanguage::Jsx => {
                tree_sitter_javascript::LANGUAGE.into()
            }
            SourceLanguage::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            SourceLanguage::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

/// A parsed source file.
pub struct SyntaxTree {
    source: String,
    tree: Tree,
    path: PathBuf,
}

impl SyntaxTree {
    /// Parse `source`, picking the grammar from the extension of `path`.
    pub fn parse(source: impl Into<String>, path: &Path) -> AnalysisResult<Self> {
        let language = SourceLanguage::from_path(path).ok_or_else(|| {
            let ext = path.extension().map(|e| e.to_string_lossy()).unwrap_or_default();
            AnalysisError::UnsupportedFileType(ext.into_owned())
        })?;
        Self::parse_as(source, language, path)
    }

    /// Parse `source` with an explicit language.
    pub fn parse_as(
        source: impl Into<String>,
        language: SourceLanguage,
        path: &Path,
    ) -> AnalysisResult<Self> {
        let source = source.into();
        let mut parser = Parser::new();
        parser
            .set_language(&language.tree_sitter_language())
            .map_err(|_| AnalysisError::LanguageInit)?;

        // Trees with ERROR nodes are still usable for best-effort extraction.
        let tree = parser
            .parse(&source, None)
            .ok_or_else(|| AnalysisError::Parse {
                path: path.display().to_string(),
            })?;

        Ok(Self {
            source,
            tree,
            path: path.to_path_buf(),
        })
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Extract the text content of a node.
    pub fn text(&self, node: Node<'_>) -> &str {
        self.source
            .get(node.start_byte()..node.end_byte())
            .unwrap_or("")
    }

    /// Node text with surrounding quotes removed.
    pub fn unquoted(&self, node: Node<'_>) -> &str {
        unquote(self.text(node))
    }
}

/// Removes one matching pair of surrounding quotes (single, double or
/// backtick). Anything else is returned as is.
pub fn unquote(text: &str) -> &str {
    let bytes = text.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(&first), Some(&last))
            if bytes.len() >= 2 && first == last && matches!(first, b'"' | b'\'' | b'`') =>
        {
            &text[1..text.len() - 1]
        }
        _ => text,
    }
}

/// Named children of `node`, skipping comments.
pub fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

/// 1-indexed line a node starts on.
pub fn line_of(node: Node<'_>) -> usize {
    node.start_position().row + 1
}
