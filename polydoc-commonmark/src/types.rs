//! Types for polydoc-commonmark public API and internal use.
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Represents a header in a Markdown document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Header {
  /// Header text, with markup stripped.
  pub text:  String,
  /// Header level (1-4).
  pub level: u8,
  /// Generated anchor ID, `h{level}_{index}`.
  pub id:    String,
}

/// Result of Markdown processing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MarkdownResult {
  /// Rendered HTML output.
  pub html: String,

  /// Extracted headers of level 1 to 4, in document order.
  pub headers: Vec<Header>,

  /// Title of the document, if found (first H1).
  pub title: Option<String>,

  /// The language that was requested.
  pub original_language: Option<String>,

  /// The language code blocks were filtered for.
  pub language: Option<String>,

  /// Known languages used by the document's code blocks, first seen first.
  pub languages: Vec<String>,

  /// Extensions used by the document.
  pub extensions: Vec<String>,

  /// Rendered `tab:` blocks by label.
  pub tabs: IndexMap<String, String>,

  /// Icons referenced from headings.
  pub icons: Vec<String>,
}
