//! `%method-doc` blocks: a callable described in JSON.
//!
//! The description is turned into markdown that still contains doc tokens,
//! so the signature and types come out right for whichever language the
//! document is rendered for.
//!
//! ```json
//! {
//!   "method": "open_files",
//!   "args": { "ext": "String", "limit": { "type": "Integer", "desc": "max" } },
//!   "returns": { "type": "Array<String>", "desc": "the file names" },
//!   "examples": [{ "args": ["txt", 2], "returns": ["a.txt", "b.txt"] }],
//!   "languages": { "ruby": { "method": "open_files!" } }
//! }
//! ```

use html_escape::{encode_safe, encode_text};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use super::error::{DocBlockError, DocBlockResult, json_type_name};

const DEFAULT_GLOBAL: &str = "Challenge";

/// Namespace the method is reached through. `false` disables it.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Global {
  Enabled(bool),
  Name(String),
}

/// A type given either as a bare string or with a description.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum TypeSpec {
  Type(String),
  Detailed {
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    desc: Option<String>,
  },
}

impl TypeSpec {
  fn kind(&self) -> Option<&str> {
    let kind = match self {
      Self::Type(kind) => Some(kind.as_str()),
      Self::Detailed { kind, .. } => kind.as_deref(),
    };
    kind.filter(|kind| !kind.is_empty())
  }

  fn desc(&self) -> Option<&str> {
    match self {
      Self::Type(_) => None,
      Self::Detailed { desc, .. } => desc.as_deref().filter(|d| !d.is_empty()),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
struct Example {
  #[serde(default)]
  name:    Option<String>,
  #[serde(default)]
  args:    Vec<Value>,
  #[serde(default)]
  returns: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MethodDoc {
  method:        String,
  #[serde(default)]
  global:        Option<Global>,
  #[serde(default)]
  class:         Option<String>,
  #[serde(default, alias = "params", alias = "parameters")]
  args:          Option<IndexMap<String, TypeSpec>>,
  #[serde(default)]
  desc:          Option<String>,
  #[serde(default)]
  returns:       Option<TypeSpec>,
  #[serde(default)]
  constraints:   Vec<String>,
  #[serde(default)]
  errors:        Vec<String>,
  #[serde(default)]
  examples:      Vec<Example>,
  #[serde(default)]
  raw_types:     bool,
  #[serde(default)]
  examples_only: bool,
}

impl MethodDoc {
  fn arg_names(&self) -> impl Iterator<Item = &str> {
    self.args.iter().flat_map(|args| args.keys().map(String::as_str))
  }

  fn type_token(&self, kind: &str) -> String {
    if self.raw_types {
      encode_text(kind).into_owned()
    } else {
      format!("@@docType:{kind}")
    }
  }

  /// Qualified method name. A class always wins over the global namespace.
  fn name(&self) -> String {
    let owner = match (&self.class, &self.global) {
      (Some(class), _) if !class.is_empty() => format!("@@docClass:{class}."),
      (_, Some(Global::Enabled(false))) => String::new(),
      (_, Some(Global::Name(global))) if !global.is_empty() => {
        format!("@@docGlobal:{global}.")
      },
      _ => format!("@@docGlobal:{DEFAULT_GLOBAL}."),
    };
    format!("{owner}@@docMethod:{}", self.method)
  }

  fn heading(&self) -> String {
    let args: Vec<String> = self
      .arg_names()
      .map(|name| format!("`@@docName:{name}`"))
      .collect();
    format!("### `{}`({})", self.name(), args.join(", "))
  }

  fn parameters(&self) -> Vec<String> {
    self
      .args
      .iter()
      .flatten()
      .map(|(name, spec)| {
        let mut line = format!(
          "@@docName:{name}: {}",
          self.type_token(spec.kind().unwrap_or("String"))
        );
        if let Some(desc) = spec.desc() {
          line.push_str(" - ");
          line.push_str(desc);
        }
        line
      })
      .collect()
  }

  fn return_value(&self) -> String {
    let kind = self.returns.as_ref().and_then(TypeSpec::kind);
    let mut line = self.type_token(kind.unwrap_or("void"));
    if let Some(desc) = self.returns.as_ref().and_then(TypeSpec::desc) {
      line.push_str(" - ");
      line.push_str(desc);
    }
    line
  }

  fn definitions(&self) -> Vec<String> {
    let mut md = vec!["```%doc".to_string()];
    if self.args.is_some() {
      md.push("Parameters:".to_string());
      md.extend(self.parameters());
    }
    md.push("Return Value:".to_string());
    md.push(self.return_value());
    if !self.constraints.is_empty() {
      md.push("Constraints:".to_string());
      md.extend(self.constraints.iter().cloned());
    }
    if !self.errors.is_empty() {
      md.push("Errors:".to_string());
      md.extend(self.errors.iter().cloned());
    }
    md.push("```".to_string());
    md
  }

  fn examples_table(&self) -> DocBlockResult<Vec<String>> {
    if self.examples.is_empty() {
      return Ok(Vec::new());
    }

    let mut header = String::from("<thead><tr><th></th>");
    for name in self.arg_names() {
      header.push_str(&format!("<th>{}</th>", encode_text(name)));
    }
    header.push_str("<th>Return Value</th></tr></thead>");

    let mut md = vec![
      "```%doc-block".to_string(),
      "#### Examples".to_string(),
      "<table>".to_string(),
      header,
      "<tbody>".to_string(),
    ];

    for (index, example) in self.examples.iter().enumerate() {
      let name = example
        .name
        .clone()
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| format!("Ex. #{}", index + 1));
      let mut row = format!("<tr><td><em>{}</em></td>", encode_text(&name));
      for arg in &example.args {
        row.push_str(&json_cell(arg)?);
      }
      match &example.returns {
        Some(returns) => row.push_str(&json_cell(returns)?),
        None => row.push_str("<td></td>"),
      }
      row.push_str("</tr>");
      md.push(row);
    }

    md.push("</tbody>".to_string());
    md.push("</table>".to_string());
    md.push("```".to_string());
    Ok(md)
  }
}

fn json_cell(value: &Value) -> DocBlockResult<String> {
  let json = serde_json::to_string(value)?;
  Ok(format!("<td><code>{}</code></td>", encode_safe(&json)))
}

/// Merge the `languages.{language}` fragment over the top level object.
fn apply_language_override(
  value: Value,
  language: Option<&str>,
) -> DocBlockResult<Value> {
  let mut doc = match value {
    Value::Object(doc) => doc,
    other => return Err(DocBlockError::NotAnObject(json_type_name(&other))),
  };

  let languages = doc.remove("languages");
  let fragment = match (language, languages) {
    (Some(language), Some(Value::Object(mut languages))) => {
      languages.remove(language).map(|f| (language, f))
    },
    _ => None,
  };

  match fragment {
    Some((_, Value::Object(fragment))) => {
      log::trace!("Applying per-language method-doc override");
      doc.extend(fragment);
    },
    Some((_, Value::Null)) | None => {},
    Some((language, _)) => {
      return Err(DocBlockError::InvalidLanguageOverride(language.to_string()));
    },
  }

  Ok(Value::Object(doc))
}

/// Build the markdown for a method description.
///
/// The result contains doc tokens and `%doc` blocks, so it is meant to be
/// rendered by the block pipeline rather than a plain markdown renderer.
///
/// # Errors
///
/// Returns an error if `json` is not a valid method description.
pub fn method_doc(json: &str, language: Option<&str>) -> DocBlockResult<String> {
  let value: Value = serde_json::from_str(json)?;
  let doc: MethodDoc =
    serde_json::from_value(apply_language_override(value, language)?)?;

  let mut md = Vec::new();
  if !doc.examples_only {
    md.push(doc.heading());
    if let Some(desc) = doc.desc.as_deref().filter(|d| !d.is_empty()) {
      md.push(desc.to_string());
    }
    md.extend(doc.definitions());
  }
  md.extend(doc.examples_table()?);

  Ok(md.join("\n"))
}

/// Render a method description with `render`, or return an inline error
/// marker if it is invalid.
pub fn render_method_doc<F>(
  json: &str,
  language: Option<&str>,
  render: F,
) -> String
where
  F: FnOnce(&str) -> String,
{
  match method_doc(json, language) {
    Ok(markdown) => render(&markdown),
    Err(e) => {
      log::warn!("Invalid %method-doc block: {e}");
      e.marker("method-doc")
    },
  }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Fine in tests")]
mod tests {
  use super::*;

  #[test]
  fn test_minimal() {
    let md = method_doc(r#"{"method":"openFiles","args":{"ext":"String"}}"#, None)
      .unwrap();
    assert_eq!(
      md,
      "### `@@docGlobal:Challenge.@@docMethod:openFiles`(`@@docName:ext`)\n\
       ```%doc\n\
       Parameters:\n\
       @@docName:ext: @@docType:String\n\
       Return Value:\n\
       @@docType:void\n\
       ```"
    );
  }

  #[test]
  fn test_parameter_aliases_and_defaults() {
    let md = method_doc(
      r#"{"method":"run","params":{"a":{"desc":"first"},"b":"Integer"},
          "returns":{"desc":"nothing"}}"#,
      None,
    )
    .unwrap();
    assert!(md.contains("@@docName:a: @@docType:String - first\n"));
    assert!(md.contains("@@docName:b: @@docType:Integer\n"));
    assert!(md.contains("Return Value:\n@@docType:void - nothing\n"));
    assert!(md.contains("(`@@docName:a`, `@@docName:b`)"));
  }

  #[test]
  fn test_no_args_has_no_parameters_section() {
    let md = method_doc(r#"{"method":"run","returns":"Boolean"}"#, None)
      .unwrap();
    assert!(!md.contains("Parameters:"));
    assert!(md.contains("`@@docGlobal:Challenge.@@docMethod:run`()"));
    assert!(md.contains("@@docType:Boolean"));
  }

  #[test]
  fn test_owner() {
    let class =
      method_doc(r#"{"method":"run","class":"Runner","global":"App"}"#, None)
        .unwrap();
    assert!(class.starts_with("### `@@docClass:Runner.@@docMethod:run`"));

    let global = method_doc(r#"{"method":"run","global":"App"}"#, None).unwrap();
    assert!(global.starts_with("### `@@docGlobal:App.@@docMethod:run`"));

    let bare = method_doc(r#"{"method":"run","global":false}"#, None).unwrap();
    assert!(bare.starts_with("### `@@docMethod:run`"));
  }

  #[test]
  fn test_constraints_and_errors() {
    let md = method_doc(
      r#"{"method":"run","constraints":["a > 0"],"errors":["Fails on 0"]}"#,
      None,
    )
    .unwrap();
    assert!(md.contains("Constraints:\na > 0\nErrors:\nFails on 0\n```"));
  }

  #[test]
  fn test_raw_types() {
    let md = method_doc(
      r#"{"method":"run","rawTypes":true,"args":{"a":"List<int>"}}"#,
      None,
    )
    .unwrap();
    assert!(md.contains("@@docName:a: List&lt;int&gt;\n"));
    assert!(!md.contains("@@docType:"));
  }

  #[test]
  fn test_examples_table() {
    let md = method_doc(
      r#"{"method":"add","args":{"a":"Integer","b":"Integer"},
          "examples":[{"args":[1,2],"returns":3},
                      {"name":"Strings","args":["<a>","b"]}]}"#,
      None,
    )
    .unwrap();
    assert!(md.contains("```%doc-block\n#### Examples\n<table>\n"));
    assert!(md.contains(
      "<thead><tr><th></th><th>a</th><th>b</th><th>Return \
       Value</th></tr></thead>"
    ));
    assert!(md.contains(
      "<tr><td><em>Ex. #1</em></td><td><code>1</code></td><td><code>2</code></\
       td><td><code>3</code></td></tr>"
    ));
    assert!(md.contains(
      "<tr><td><em>Strings</em></td><td><code>&quot;&lt;a&gt;&quot;</code></\
       td><td><code>&quot;b&quot;</code></td><td></td></tr>"
    ));
  }

  #[test]
  fn test_examples_only() {
    let md = method_doc(
      r#"{"method":"add","examplesOnly":true,"examples":[{"args":[1]}]}"#,
      None,
    )
    .unwrap();
    assert!(md.starts_with("```%doc-block"));
    assert!(!md.contains("###"));
    assert!(!md.contains("```%doc\n"));
  }

  #[test]
  fn test_language_override() {
    let json = r#"{"method":"open_files","args":{"ext":"String"},
                   "languages":{"ruby":{"method":"open_files!","args":{}}}}"#;
    let ruby = method_doc(json, Some("ruby")).unwrap();
    assert!(ruby.contains("@@docMethod:open_files!`()"));
    let java = method_doc(json, Some("java")).unwrap();
    assert!(java.contains("@@docMethod:open_files`(`@@docName:ext`)"));
  }

  #[test]
  fn test_invalid_override() {
    let err = method_doc(
      r#"{"method":"run","languages":{"ruby":"nope"}}"#,
      Some("ruby"),
    )
    .unwrap_err();
    assert!(matches!(err, DocBlockError::InvalidLanguageOverride(_)));
  }

  #[test]
  fn test_errors_become_markers() {
    let html = render_method_doc("[1, 2]", None, |md| md.to_string());
    assert_eq!(
      html,
      "<code class=\"doc-error\">Failed to render %method-doc: expected a \
       JSON object, found an array</code>"
    );

    let html = render_method_doc(r#"{"args":{}}"#, None, |md| md.to_string());
    assert!(html.contains("missing field `method`"));
  }

  #[test]
  fn test_render_is_called_with_markdown() {
    let html = render_method_doc(r#"{"method":"run"}"#, None, |md| {
      format!("<rendered>{}</rendered>", md.len())
    });
    assert!(html.starts_with("<rendered>"));
  }
}
