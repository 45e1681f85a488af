//! Type definitions for the Markdown processor.
//!
//! Contains the configuration options (`MarkdownOptions`), the processor
//! struct itself (`MarkdownProcessor`) and the handlers that can be plugged
//! into the block pipeline.
//!
//! # Examples
//!
//! ```
//! use polydoc_commonmark::{MarkdownOptions, MarkdownProcessor};
//!
//! let options = MarkdownOptions {
//!   language: Some("ruby".to_string()),
//!   line_numbers: false,
//!   ..Default::default()
//! };
//!
//! let processor = MarkdownProcessor::new(options);
//! ```

use std::{fmt, sync::Arc};

use indexmap::IndexMap;

/// Languages recognised in fenced code blocks by default.
pub const DEFAULT_LANGUAGES: &[&str] = &[
  "c",
  "clojure",
  "coffeescript",
  "cpp",
  "csharp",
  "elixir",
  "erlang",
  "fsharp",
  "go",
  "groovy",
  "haskell",
  "java",
  "javascript",
  "kotlin",
  "objc",
  "ocaml",
  "php",
  "python",
  "r",
  "ruby",
  "scala",
  "shell",
  "solidity",
  "sql",
  "swift",
  "typescript",
];

/// Function rendering the contents of an extension block.
pub type CodeFn = dyn Fn(&str) -> String + Send + Sync;

/// Function wrapping a rendered code block, given the block's info string.
pub type WrapperFn = dyn Fn(&str, &str) -> String + Send + Sync;

/// How an extension block (e.g. ```` ```mermaid ````) is rendered.
#[derive(Clone)]
pub enum CodeHandler {
  /// Template where `{code}` is replaced by the block contents.
  Template(String),
  /// Custom render function.
  Function(Arc<CodeFn>),
}

impl CodeHandler {
  /// Create a handler from a closure.
  pub fn function<F>(f: F) -> Self
  where
    F: Fn(&str) -> String + Send + Sync + 'static,
  {
    Self::Function(Arc::new(f))
  }

  #[must_use]
  pub fn apply(&self, code: &str) -> String {
    match self {
      Self::Template(template) => template.replacen("{code}", code, 1),
      Self::Function(f) => f(code),
    }
  }
}

impl fmt::Debug for CodeHandler {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Template(template) => {
        f.debug_tuple("Template").field(template).finish()
      },
      Self::Function(_) => f.write_str("Function(..)"),
    }
  }
}

/// Wrapper put around every rendered code block that has a language.
#[derive(Clone)]
pub enum LanguageWrapper {
  /// Template where `{slot}` is replaced by the rendered block.
  Template(String),
  /// Custom wrap function, called with the rendered block and info string.
  Function(Arc<WrapperFn>),
}

impl LanguageWrapper {
  /// Create a wrapper from a closure.
  pub fn function<F>(f: F) -> Self
  where
    F: Fn(&str, &str) -> String + Send + Sync + 'static,
  {
    Self::Function(Arc::new(f))
  }

  #[must_use]
  pub fn apply(&self, html: &str, info: &str) -> String {
    match self {
      Self::Template(template) => template.replacen("{slot}", html, 1),
      Self::Function(f) => f(html, info),
    }
  }
}

impl fmt::Debug for LanguageWrapper {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Template(template) => {
        f.debug_tuple("Template").field(template).finish()
      },
      Self::Function(_) => f.write_str("Function(..)"),
    }
  }
}

/// Options for configuring the Markdown processor.
#[derive(Debug, Clone)]
#[allow(
  clippy::struct_excessive_bools,
  reason = "Config struct with related boolean flags"
)]
pub struct MarkdownOptions {
  /// Enable GitHub Flavored Markdown (GFM) extensions.
  pub gfm: bool,

  /// Target language the document is rendered for.
  pub language: Option<String>,

  /// Drop code blocks written in any other known language.
  pub filter_languages: bool,

  /// If `language` is unset or does not appear in the document, switch to
  /// the first language that does.
  pub default_language_to_first: bool,

  /// Number lines of blocks whose info string has a start line, e.g.
  /// `ruby:10`.
  pub line_numbers: bool,

  /// Resolve `@@doc*:` tokens.
  pub doc_tokens: bool,

  /// Class prefix for `icon::name` markers in headings.
  pub icon_class_prefix: String,

  /// Language vocabulary used to classify code blocks.
  pub languages: Vec<String>,

  /// Info strings rendered by a custom handler instead of as code.
  pub extensions: IndexMap<String, CodeHandler>,

  /// Optional wrapper around rendered code blocks.
  pub language_wrapper: Option<LanguageWrapper>,
}

impl MarkdownOptions {
  /// Default extension handlers.
  #[must_use]
  pub fn default_extensions() -> IndexMap<String, CodeHandler> {
    IndexMap::from([(
      "mermaid".to_string(),
      CodeHandler::Template("<div class=\"mermaid\">{code}</div>".to_string()),
    )])
  }

  /// Options for a document rendered for `language`.
  #[must_use]
  pub fn for_language<S: Into<String>>(language: S) -> Self {
    Self {
      language: Some(language.into()),
      ..Self::default()
    }
  }
}

impl Default for MarkdownOptions {
  fn default() -> Self {
    Self {
      gfm:                       cfg!(feature = "gfm"),
      language:                  None,
      filter_languages:          true,
      default_language_to_first: true,
      line_numbers:              true,
      doc_tokens:                true,
      icon_class_prefix:         "icon-".to_string(),
      languages:                 DEFAULT_LANGUAGES
        .iter()
        .map(ToString::to_string)
        .collect(),
      extensions:                Self::default_extensions(),
      language_wrapper:          None,
    }
  }
}

/// Main Markdown processor.
///
/// Holds no per-document state, so one processor can render many documents,
/// also from several threads at once.
#[derive(Debug, Clone)]
pub struct MarkdownProcessor {
  pub(crate) options: MarkdownOptions,
}

/// Builder for constructing `MarkdownOptions` with method chaining.
#[derive(Debug, Clone)]
pub struct MarkdownOptionsBuilder {
  options: MarkdownOptions,
}

impl MarkdownOptionsBuilder {
  /// Create a new builder with default options.
  #[must_use]
  pub fn new() -> Self {
    Self {
      options: MarkdownOptions::default(),
    }
  }

  /// Enable or disable GitHub Flavored Markdown.
  #[must_use]
  pub const fn gfm(mut self, enabled: bool) -> Self {
    self.options.gfm = enabled;
    self
  }

  /// Set the target language.
  #[must_use]
  pub fn language<S: Into<String>>(mut self, language: Option<S>) -> Self {
    self.options.language = language.map(Into::into);
    self
  }

  /// Enable or disable filtering of other languages' code blocks.
  #[must_use]
  pub const fn filter_languages(mut self, enabled: bool) -> Self {
    self.options.filter_languages = enabled;
    self
  }

  /// Enable or disable falling back to the first language in the document.
  #[must_use]
  pub const fn default_language_to_first(mut self, enabled: bool) -> Self {
    self.options.default_language_to_first = enabled;
    self
  }

  /// Enable or disable line numbers.
  #[must_use]
  pub const fn line_numbers(mut self, enabled: bool) -> Self {
    self.options.line_numbers = enabled;
    self
  }

  /// Enable or disable doc token resolution.
  #[must_use]
  pub const fn doc_tokens(mut self, enabled: bool) -> Self {
    self.options.doc_tokens = enabled;
    self
  }

  /// Set the heading icon class prefix.
  #[must_use]
  pub fn icon_class_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
    self.options.icon_class_prefix = prefix.into();
    self
  }

  /// Replace the language vocabulary.
  #[must_use]
  pub fn languages<I, S>(mut self, languages: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.options.languages = languages.into_iter().map(Into::into).collect();
    self
  }

  /// Register (or replace) an extension handler.
  #[must_use]
  pub fn extension<S: Into<String>>(
    mut self,
    name: S,
    handler: CodeHandler,
  ) -> Self {
    self.options.extensions.insert(name.into(), handler);
    self
  }

  /// Set the code block wrapper.
  #[must_use]
  pub fn language_wrapper(mut self, wrapper: Option<LanguageWrapper>) -> Self {
    self.options.language_wrapper = wrapper;
    self
  }

  /// Build the final `MarkdownOptions`.
  #[must_use]
  pub fn build(self) -> MarkdownOptions {
    self.options
  }
}

impl Default for MarkdownOptionsBuilder {
  fn default() -> Self {
    Self::new()
  }
}
