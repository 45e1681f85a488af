//! # polydoc-commonmark - polyglot API documentation on top of `CommonMark`
//!
//! A Markdown processor for documentation that is written once and rendered
//! for many programming languages. Code blocks of other languages are
//! filtered out, `@@doc*:` tokens are resolved to the target language's type
//! names and naming conventions, and JSON-described methods and tables are
//! rendered as structured documentation.
//!
//! ## Quick Start
//!
//! ```rust
//! use polydoc_commonmark::{MarkdownOptions, MarkdownProcessor};
//!
//! let processor = MarkdownProcessor::new(MarkdownOptions::for_language("csharp"));
//! let result = processor.render("Returns @@docType:Array<String>.");
//!
//! assert!(result.html.contains("<dfn class=\"doc-type\">string[]</dfn>"));
//! ```
//!
//! ## Features
//!
//! - **Language filtering** of fenced code blocks, with `if:`/`if-not:`
//!   conditionals and `tab:` blocks
//! - **Doc tokens** (`@@docType:`, `@@docName:`, `@@docGlobal:`, ...) mapped
//!   per language
//! - **Structured blocks**: `%doc` definition lists, `%method-doc` and
//!   `%table-doc` JSON descriptions
//! - **Header extraction** with generated anchors and heading icons
//! - **Error recovery** with inline error markers for malformed input
//!
//! ## Tokens without the processor
//!
//! ```rust
//! use polydoc_commonmark::process_doc_tokens;
//!
//! let html = process_doc_tokens(Some("ruby"), false, "@@docName:first_item");
//! assert_eq!(html, "<dfn class=\"doc-name doc-name--name\">first_item</dfn>");
//! ```

pub mod docs;
pub mod processor;
pub mod tokens;
mod types;
pub mod utils;

pub use crate::{
  docs::{method_doc, render_method_doc, table_doc},
  processor::{
    CodeHandler,
    DEFAULT_LANGUAGES,
    LanguageWrapper,
    MarkdownOptions,
    MarkdownOptionsBuilder,
    MarkdownProcessor,
  },
  tokens::process_doc_tokens,
  types::{Header, MarkdownResult},
};
