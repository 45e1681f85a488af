//! Structured documentation blocks.
//!
//! `%method-doc` and `%table-doc` fenced blocks hold JSON instead of prose.
//! Invalid JSON never aborts a render; the block is replaced by an inline
//! error marker instead.

mod error;
pub mod method_doc;
pub mod table_doc;

pub use error::{DocBlockError, DocBlockResult};
pub use method_doc::{method_doc, render_method_doc};
pub use table_doc::{build_table_doc, table_doc};
