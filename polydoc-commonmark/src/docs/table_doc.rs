//! `%table-doc` blocks: a database table described in JSON.
//!
//! ```json
//! {
//!   "table": "users",
//!   "desc": "Registered users",
//!   "columns": { "id": "INT", "name": "VARCHAR(255)" }
//! }
//! ```

use html_escape::encode_text;
use indexmap::IndexMap;
use serde::Deserialize;

use super::error::{DocBlockError, DocBlockResult, json_type_name};

#[derive(Debug, Clone, Deserialize)]
struct TableDoc {
  #[serde(default, alias = "title")]
  table:   Option<String>,
  #[serde(default)]
  desc:    Option<String>,
  #[serde(default)]
  columns: Option<IndexMap<String, String>>,
}

/// Build the HTML for a table description, in column declaration order.
///
/// # Errors
///
/// Returns an error if `json` is not a valid table description.
pub fn build_table_doc(json: &str) -> DocBlockResult<String> {
  let value: serde_json::Value = serde_json::from_str(json)?;
  if !value.is_object() {
    return Err(DocBlockError::NotAnObject(json_type_name(&value)));
  }
  let doc: TableDoc = serde_json::from_value(value)?;
  let mut html = Vec::new();

  if let Some(table) = doc.table.as_deref().filter(|t| !t.is_empty()) {
    html.push(format!("<h3>{}</h3>", encode_text(table)));
  }
  if let Some(desc) = doc.desc.as_deref().filter(|d| !d.is_empty()) {
    html.push(format!("<p>{}</p>", encode_text(desc)));
  }

  html.push("<table>".to_string());
  html.push("<thead><tr><th>Name</th><th>Type</th></tr></thead>".to_string());
  if let Some(columns) = &doc.columns {
    html.push("<tbody>".to_string());
    html.extend(columns.iter().map(|(name, kind)| {
      format!(
        "<tr><td>{}</td><td>{}</td></tr>",
        encode_text(name),
        encode_text(kind)
      )
    }));
    html.push("</tbody>".to_string());
  }
  html.push("</table>".to_string());

  Ok(html.join("\n"))
}

/// Render a table description, or an inline error marker if it is invalid.
#[must_use]
pub fn table_doc(json: &str) -> String {
  build_table_doc(json).unwrap_or_else(|e: DocBlockError| {
    log::warn!("Invalid %table-doc block: {e}");
    e.marker("table-doc")
  })
}
