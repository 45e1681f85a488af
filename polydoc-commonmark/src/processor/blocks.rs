//! Fenced block classification and dispatch.
//!
//! Every fenced block of a document is classified here before the document
//! is handed to comrak. Blocks are either kept for comrak to render as
//! ordinary code, or replaced with HTML produced here.
use log::{debug, trace};

use super::{core::RenderContext, types::MarkdownProcessor};
use crate::{
  docs::{render_method_doc, table_doc},
  tokens::process_doc_tokens,
  utils::codeblock::{FencedBlock, fence_infos},
};

/// What to do with a fenced block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockOutput {
  /// Leave the block in the document for comrak.
  Keep,
  /// Replace the block with HTML (possibly empty).
  Html(String),
}

/// Strip an `if:`/`if-not:` prefix, allowing one space after the colon.
fn strip_condition(info: &str) -> &str {
  ["if-not:", "if:"]
    .iter()
    .find_map(|prefix| info.strip_prefix(prefix))
    .map_or(info, |rest| rest.strip_prefix(' ').unwrap_or(rest))
}

/// Whether `language` is one of the comma separated names in `list`.
fn lists_language(list: &str, language: Option<&str>) -> bool {
  language.is_some_and(|language| {
    list.split(',').any(|name| name.trim() == language)
  })
}

/// Start line of a `lang:N` info string. Zero disables numbering.
fn start_line(info: &str) -> Option<usize> {
  info
    .split(':')
    .nth(1)
    .and_then(|n| n.trim().parse::<usize>().ok())
    .filter(|n| *n > 0)
}

/// Prefix each line of `code` with its number, starting at `start`.
#[must_use]
pub fn number_lines(code: &str, start: usize) -> String {
  let body = code.strip_suffix('\n').unwrap_or(code);
  let mut out = String::with_capacity(code.len() + body.lines().count() * 4);
  for (offset, line) in body.split('\n').enumerate() {
    let number = start + offset;
    let padding = match number {
      0..=9 => "  ",
      10..=99 => " ",
      _ => "",
    };
    out.push_str(padding);
    out.push_str(&number.to_string());
    out.push(' ');
    out.push_str(line);
    out.push('\n');
  }
  out
}

/// Fence that cannot be closed by anything inside `code`.
fn fence_for(code: &str) -> String {
  let longest = code
    .split(|c| c != '`')
    .map(str::len)
    .max()
    .unwrap_or(0);
  "`".repeat(longest.max(2) + 1)
}

fn wrap_in_block_div(info: &str, contents: &str) -> String {
  let name = info.strip_prefix('%').unwrap_or(info);
  format!("<div class=\"block block--{name}\">{contents}</div>")
}

impl MarkdownProcessor {
  /// Look up `name` in the language vocabulary.
  #[must_use]
  pub fn find_language(&self, name: &str) -> Option<&str> {
    self
      .options
      .languages
      .iter()
      .find(|language| *language == name)
      .map(String::as_str)
  }

  /// Collect the languages and extensions used by the document's fenced
  /// blocks, in the order they first appear.
  #[must_use]
  pub fn scan_blocks(&self, markdown: &str) -> (Vec<String>, Vec<String>) {
    let mut languages: Vec<String> = Vec::new();
    let mut extensions: Vec<String> = Vec::new();

    for info in fence_infos(markdown) {
      let info = strip_condition(info);
      let names = info.split(':').next().unwrap_or_default();

      // % blocks are neither languages nor extensions
      for name in names.split(',').filter(|name| !name.contains('%')) {
        if self.options.extensions.contains_key(name) {
          if !extensions.iter().any(|e| e == name) {
            extensions.push(name.to_string());
          }
        } else if let Some(language) = self.find_language(name) {
          if !languages.iter().any(|l| l == language) {
            languages.push(language.to_string());
          }
        }
      }
    }

    (languages, extensions)
  }

  /// Decide what a fenced block becomes.
  pub(crate) fn render_block(
    &self,
    ctx: &mut RenderContext,
    block: &FencedBlock,
  ) -> BlockOutput {
    let info = block.info.as_str();
    let code = block.body.as_str();

    if info.is_empty() {
      return BlockOutput::Keep;
    }

    if let Some(list) = info.strip_prefix("if:") {
      let shown = lists_language(list, ctx.original_language.as_deref());
      trace!("if block `{info}` shown: {shown}");
      return BlockOutput::Html(if shown {
        self.render_markdown(ctx, code)
      } else {
        String::new()
      });
    }

    if let Some(list) = info.strip_prefix("if-not:") {
      let hidden = lists_language(list, ctx.original_language.as_deref());
      trace!("if-not block `{info}` hidden: {hidden}");
      return BlockOutput::Html(if hidden {
        String::new()
      } else {
        self.render_markdown(ctx, code)
      });
    }

    if let Some(rest) = info.strip_prefix("tab:") {
      let label = rest.split(':').next().unwrap_or_default().replace('+', " ");
      debug!("Collected tab `{label}`");
      let html = self.render_markdown(ctx, code);
      ctx.tabs.insert(label, html);
      return BlockOutput::Html(String::new());
    }

    if let Some(handler) = self.options.extensions.get(info) {
      trace!("Rendering extension block `{info}`");
      return BlockOutput::Html(handler.apply(code));
    }

    match info {
      "%definitions" | "%doc" => {
        return BlockOutput::Html(wrap_in_block_div(
          info,
          &self.render_definitions(ctx, code),
        ));
      },
      "%method-doc" => {
        let language = ctx.token_language().map(ToString::to_string);
        let html = render_method_doc(code, language.as_deref(), |markdown| {
          self.render_markdown(ctx, markdown)
        });
        return BlockOutput::Html(wrap_in_block_div(info, &html));
      },
      "%table-doc" => {
        return BlockOutput::Html(wrap_in_block_div(info, &table_doc(code)));
      },
      _ if info.starts_with('%') => {
        return BlockOutput::Html(wrap_in_block_div(
          info,
          &self.render_markdown(ctx, code),
        ));
      },
      _ => {},
    }

    self.render_code_block(ctx, block)
  }

  fn render_code_block(
    &self,
    ctx: &RenderContext,
    block: &FencedBlock,
  ) -> BlockOutput {
    let info = block.info.as_str();
    let base = info.split(':').next().unwrap_or_default();

    // Blocks nested in list items are examples for the current language
    if let (Some(found), Some(active)) =
      (self.find_language(base), ctx.language.as_deref())
      && self.options.filter_languages
      && !block.is_indented()
      && found != active
    {
      trace!("Filtered `{found}` block, rendering for `{active}`");
      return BlockOutput::Html(String::new());
    }

    let numbered = if self.options.line_numbers {
      start_line(info).map(|start| number_lines(&block.body, start))
    } else {
      None
    };

    if numbered.is_none() && self.options.language_wrapper.is_none() {
      return BlockOutput::Keep;
    }

    let mut code = numbered.unwrap_or_else(|| block.body.clone());
    if !code.is_empty() && !code.ends_with('\n') {
      code.push('\n');
    }
    let fence = fence_for(&code);
    let mut html =
      self.render_fragment(&format!("{fence}{base}\n{code}{fence}\n"));
    if let Some(wrapper) = &self.options.language_wrapper {
      html = wrapper.apply(&html, info);
    }

    BlockOutput::Html(html)
  }

  /// Render a `%doc` block as a definition list.
  ///
  /// Lines ending in `:` are terms, heading lines are rendered as markdown
  /// and everything else is a definition. Definitions that start with a tab,
  /// four spaces or a backtick are verbatim, so their doc tokens are resolved
  /// without semantic markup.
  pub(crate) fn render_definitions(
    &self,
    ctx: &RenderContext,
    code: &str,
  ) -> String {
    let mut html = String::from("<dl>");

    for line in code.lines() {
      if line.trim().is_empty() {
        continue;
      }

      if line.starts_with('#') {
        html.push_str(&self.render_fragment(line));
      } else if let Some(term) = line.trim_end().strip_suffix(':') {
        html.push_str("<dt>");
        html.push_str(term);
        html.push_str("</dt>");
      } else {
        let verbatim = line.starts_with('\t')
          || line.starts_with("    ")
          || line.starts_with('`');
        let mut rendered = self.render_fragment(line);
        if verbatim && self.options.doc_tokens {
          rendered = process_doc_tokens(ctx.token_language(), true, &rendered);
        }
        html.push_str("<dd>");
        html.push_str(&rendered);
        html.push_str("</dd>");
      }
    }

    html.push_str("</dl>");
    html
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::processor::MarkdownOptions;

  #[test]
  fn test_strip_condition() {
    assert_eq!(strip_condition("if:ruby,python"), "ruby,python");
    assert_eq!(strip_condition("if-not: ruby"), "ruby");
    assert_eq!(strip_condition("ruby:10"), "ruby:10");
  }

  #[test]
  fn test_lists_language() {
    assert!(lists_language("ruby, python", Some("python")));
    assert!(!lists_language("ruby,python", Some("java")));
    assert!(!lists_language("ruby", None));
  }

  #[test]
  fn test_start_line() {
    assert_eq!(start_line("ruby:10"), Some(10));
    assert_eq!(start_line("ruby"), None);
    assert_eq!(start_line("ruby:0"), None);
    assert_eq!(start_line("ruby:x"), None);
  }

  #[test]
  fn test_number_lines() {
    assert_eq!(number_lines("a\nb\n", 9), "  9 a\n 10 b\n");
    assert_eq!(number_lines("x", 100), "100 x\n");
  }

  #[test]
  fn test_fence_for() {
    assert_eq!(fence_for("plain"), "```");
    assert_eq!(fence_for("has ```` inside"), "`````");
  }

  #[test]
  fn test_scan_blocks() {
    let processor = MarkdownProcessor::new(MarkdownOptions::default());
    let md = "```ruby\n```\n```if:java,python\n```\n```%doc\n```\n\
              ```mermaid\n```\n```ruby:3\n```\n```tab:Ruby\n```\n";
    let (languages, extensions) = processor.scan_blocks(md);
    assert_eq!(languages, vec!["ruby", "java", "python"]);
    assert_eq!(extensions, vec!["mermaid"]);
  }
}
