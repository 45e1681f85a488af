//! `@@docGlobal:` tokens.
//!
//! A global is a member reached through a namespace, e.g.
//! `@@docGlobal:Challenge.@@docMethod:open_files`. Only languages without
//! free functions keep the namespace.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::doc_names::replace_doc_names;
use crate::utils::{compile_or_never, process_html_elements};

static DOC_GLOBAL: LazyLock<Regex> = LazyLock::new(|| {
  // a member segment may itself be a name token
  let segment =
    r"(?:@@doc(?:Name|Method|Const|Prop|Class|Param): ?)?[A-Za-z0-9_?]+";
  let pattern = format!(
    r"@@docGlobal: ?([A-Za-z0-9_]+)(?:\.({segment}(?:\.{segment})*))?"
  );
  compile_or_never("DOC_GLOBAL", &pattern)
});

/// Languages where a global is always written with its namespace.
const QUALIFIED_LANGUAGES: &[&str] = &["java", "csharp"];

fn replace_global(language: &str, pre: bool, caps: &Captures) -> String {
  let namespace = caps.get(1).map_or("", |m| m.as_str());
  let value = match caps.get(2) {
    Some(rest) => {
      let rest = replace_doc_names(language, true, rest.as_str());
      if QUALIFIED_LANGUAGES.contains(&language) {
        format!("{namespace}.{rest}")
      } else {
        rest
      }
    },
    None => namespace.to_string(),
  };

  if pre {
    value
  } else {
    format!("<dfn class=\"doc-class\">{value}</dfn>")
  }
}

/// Replace every `@@docGlobal:` token in `content`.
#[must_use]
pub fn replace_doc_globals(language: &str, pre: bool, content: &str) -> String {
  process_html_elements(content, &DOC_GLOBAL, |caps| {
    replace_global(language, pre, caps)
  })
}
