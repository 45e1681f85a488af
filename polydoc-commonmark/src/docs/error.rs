//! Error types for structured documentation blocks.

/// Result type for structured documentation blocks.
pub type DocBlockResult<T> = Result<T, DocBlockError>;

/// Errors that can occur while reading a structured documentation block.
///
/// These never abort a render. At the document level they are turned into
/// an inline marker with [`DocBlockError::marker`].
#[derive(Debug, thiserror::Error)]
pub enum DocBlockError {
  #[error("{0}")]
  Json(#[from] serde_json::Error),
  #[error("expected a JSON object, found {0}")]
  NotAnObject(&'static str),
  #[error("`languages.{0}` must be a JSON object")]
  InvalidLanguageOverride(String),
}

impl DocBlockError {
  /// Inline HTML reporting this error for the block named `block`.
  #[must_use]
  pub fn marker(&self, block: &str) -> String {
    let message = format!("Failed to render %{block}: {self}");
    format!(
      "<code class=\"doc-error\">{}</code>",
      html_escape::encode_text(&message)
    )
  }
}

/// Name of a JSON value's type, for error messages.
pub(crate) const fn json_type_name(value: &serde_json::Value) -> &'static str {
  match value {
    serde_json::Value::Null => "null",
    serde_json::Value::Bool(_) => "a boolean",
    serde_json::Value::Number(_) => "a number",
    serde_json::Value::String(_) => "a string",
    serde_json::Value::Array(_) => "an array",
    serde_json::Value::Object(_) => "an object",
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_marker_escapes_message() {
    let err = DocBlockError::InvalidLanguageOverride("<ruby>".into());
    assert_eq!(
      err.marker("method-doc"),
      "<code class=\"doc-error\">Failed to render %method-doc: \
       `languages.&lt;ruby&gt;` must be a JSON object</code>"
    );
  }

  #[test]
  fn test_json_error_message() {
    let err = serde_json::from_str::<serde_json::Value>("{")
      .map_err(DocBlockError::from)
      .unwrap_err();
    assert!(err.marker("table-doc").contains("EOF while parsing"));
  }
}
