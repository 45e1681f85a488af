//! `@@docType:` tokens.
//!
//! Handles tokens in every shell they show up in after rendering:
//!
//! - `` `@@docType:Array<String>` ``
//! - `<code>@@docType:Array&lt;String&gt;</code>`
//! - `<pre>@@docType: Promise<Array<Integer>></pre>`
//! - `@@docType:Hash<String, Integer>?`

use std::sync::LazyLock;

use regex::Regex;

use super::compose::TypeExpression;
use crate::utils::compile_or_never;

static DOC_TYPE_START: LazyLock<Regex> = LazyLock::new(|| {
  compile_or_never("DOC_TYPE_START", r"(`|<code>|<pre>)?@@docType: ?")
});

fn closing_shell(start: &str) -> Option<&'static str> {
  match start {
    "`" => Some("`"),
    "<code>" => Some("</code>"),
    "<pre>" => Some("</pre>"),
    _ => None,
  }
}

/// Replace every `@@docType:` token in `content` with the spelling of the type
/// in `language`.
///
/// Tokens inside a shell keep the shell and lose any semantic wrapper, as do
/// all tokens when `pre` is set. Everything else is wrapped in
/// `<dfn class="doc-type">`.
#[must_use]
pub fn replace_doc_types(language: &str, pre: bool, content: &str) -> String {
  let mut result = String::with_capacity(content.len());
  let mut last = 0;

  for caps in DOC_TYPE_START.captures_iter(content) {
    let Some(token) = caps.get(0) else { continue };
    if token.start() < last {
      continue;
    }

    let start_shell = caps.get(1).map(|m| m.as_str());
    let mut end = token.end();

    let value = match TypeExpression::parse_prefix(&content[end..]) {
      Some((expr, consumed)) => {
        end += consumed;
        html_escape::encode_text(&expr.compose(language)).into_owned()
      },
      None => {
        log::warn!(
          "Empty @@docType token at byte {} ignored",
          token.start()
        );
        String::new()
      },
    };

    let end_shell = start_shell
      .and_then(closing_shell)
      .filter(|shell| content[end..].starts_with(shell));
    if let Some(shell) = end_shell {
      end += shell.len();
    }

    result.push_str(&content[last..token.start()]);
    match start_shell {
      Some(start) => {
        result.push_str(start);
        result.push_str(&value);
        result.push_str(end_shell.unwrap_or_default());
      },
      None if pre || value.is_empty() => result.push_str(&value),
      None => {
        result.push_str("<dfn class=\"doc-type\">");
        result.push_str(&value);
        result.push_str("</dfn>");
      },
    }
    last = end;
  }

  result.push_str(&content[last..]);
  result
}
