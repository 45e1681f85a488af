//! Doc token resolution.
//!
//! Documents are written once and rendered for many target languages. Inline
//! `@@doc*:` tokens mark the places where a type or identifier has to be
//! spelled the way the target language spells it:
//!
//! - `@@docType:Hash<String, Integer>` becomes `Dictionary<string, int>` for
//!   C# and `dict (of Strings/Integers)` for Python
//! - `@@docName:first_name` becomes `firstName` for Java
//! - `@@docGlobal:Challenge.@@docMethod:run` becomes `Challenge.Run` for C#
//!   and `run` for Ruby
//!
//! Tokens are resolved globals first, then types, then names.

pub mod casing;
pub mod compose;
pub mod doc_globals;
pub mod doc_names;
pub mod doc_types;
pub mod table;

pub use compose::{TypeExpression, compose_type};
pub use doc_globals::replace_doc_globals;
pub use doc_names::{CaseStyle, IdentifierKind, replace_doc_names};
pub use doc_types::replace_doc_types;
pub use table::{map_nullable, map_type};

/// Resolve every doc token in `text` for `language`.
///
/// With `pre` set the results are emitted bare instead of being wrapped in
/// `<dfn>` elements, for text that is displayed verbatim. Unknown or missing
/// languages fall back to each concept's default spelling.
///
/// ```
/// use polydoc_commonmark::tokens::process_doc_tokens;
///
/// assert_eq!(
///   process_doc_tokens(Some("csharp"), true, "@@docType:Integer?"),
///   "Nullable&lt;int&gt;"
/// );
/// ```
#[must_use]
pub fn process_doc_tokens(
  language: Option<&str>,
  pre: bool,
  text: &str,
) -> String {
  if !text.contains("@@doc") {
    return text.to_string();
  }

  let language = language.unwrap_or_default();
  let globals = replace_doc_globals(language, pre, text);
  let types = replace_doc_types(language, pre, &globals);
  replace_doc_names(language, pre, &types)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_pipeline_order() {
    let text = "@@docGlobal:Challenge.@@docMethod:open_files(@@docName:ext: \
                @@docType:Array<String>)";
    assert_eq!(
      process_doc_tokens(Some("csharp"), true, text),
      "Challenge.OpenFiles(Ext: string[])"
    );
    assert_eq!(
      process_doc_tokens(Some("javascript"), true, text),
      "openFiles(ext: Array&lt;String&gt;)"
    );
  }

  #[test]
  fn test_idempotent() {
    let text = "<p>Returns <code>@@docType:Hash</code> for \
                @@docName:first_name and @@docGlobal:Challenge.run.</p>";
    for language in ["csharp", "ruby", "python", "java", "go", "unknown"] {
      for pre in [true, false] {
        let once = process_doc_tokens(Some(language), pre, text);
        assert_eq!(process_doc_tokens(Some(language), pre, &once), once);
      }
    }
  }

  #[test]
  fn test_no_language() {
    assert_eq!(
      process_doc_tokens(None, false, "@@docType:Integer"),
      "<dfn class=\"doc-type\">Integer</dfn>"
    );
  }

  #[test]
  fn test_plain_text_unchanged() {
    let text = "<p>Nothing to see @@ here</p>";
    assert_eq!(process_doc_tokens(Some("ruby"), false, text), text);
  }
}
