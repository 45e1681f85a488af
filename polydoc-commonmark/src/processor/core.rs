//! Core implementation of the Markdown processor.
//!
//! This module contains the main implementation of `MarkdownProcessor` and its
//! methods, focused on the core rendering pipeline.
//!
//! Fenced blocks that the block pipeline renders itself are swapped for
//! `<!-- polydoc-block:N -->` markers before the document goes through comrak,
//! and the markers are swapped back for the block HTML afterwards. This keeps
//! comrak from touching HTML that is already final.
use std::sync::LazyLock;

use comrak::{markdown_to_html, options::Options};
use indexmap::IndexMap;
use log::{debug, trace};
use regex::{Captures, Regex};

use super::{blocks::BlockOutput, types::MarkdownOptions, types::MarkdownProcessor};
use crate::{
  tokens::process_doc_tokens,
  types::{Header, MarkdownResult},
  utils::{
    codeblock::{Segment, split_fenced_blocks},
    compile_or_never,
    process_html_elements,
  },
};

static BLOCK_MARKER: LazyLock<Regex> = LazyLock::new(|| {
  compile_or_never("BLOCK_MARKER", r"<!-- polydoc-block:(\d+) -->\n?")
});

static HEADING: LazyLock<Regex> = LazyLock::new(|| {
  compile_or_never("HEADING", r"<h([1-6])>(.*?)</h[1-6]>")
});

static ICON: LazyLock<Regex> =
  LazyLock::new(|| compile_or_never("ICON", r"icon::([a-z-]*)"));

static HTML_TAG: LazyLock<Regex> =
  LazyLock::new(|| compile_or_never("HTML_TAG", r"<[^>]*>"));

static PRE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
  compile_or_never("PRE_BLOCK", r"(?s)<pre(?:\s[^>]*)?>.*?</pre>")
});

/// Resolve doc tokens in rendered HTML. Code inside `<pre>` is displayed
/// verbatim, so tokens there are resolved without semantic markup.
fn resolve_doc_tokens(language: Option<&str>, html: &str) -> String {
  let mut result = String::with_capacity(html.len());
  let mut last = 0;
  for block in PRE_BLOCK.find_iter(html) {
    result.push_str(&process_doc_tokens(
      language,
      false,
      &html[last..block.start()],
    ));
    result.push_str(&process_doc_tokens(language, true, block.as_str()));
    last = block.end();
  }
  result.push_str(&process_doc_tokens(language, false, &html[last..]));
  result
}

/// Features that can be toggled on a processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorFeature {
  /// GitHub Flavored Markdown
  Gfm,
  /// `@@doc*:` token resolution
  DocTokens,
  /// `lang:N` line numbering
  LineNumbers,
  /// Dropping code blocks of other languages
  LanguageFiltering,
}

/// Per-document state threaded through the block pipeline.
#[derive(Debug, Default)]
pub(crate) struct RenderContext {
  pub(crate) original_language: Option<String>,
  pub(crate) language:          Option<String>,
  pub(crate) tabs:              IndexMap<String, String>,
}

impl RenderContext {
  /// Language doc tokens are resolved for: the requested one if any,
  /// otherwise the one selected from the document.
  pub(crate) fn token_language(&self) -> Option<&str> {
    self
      .original_language
      .as_deref()
      .or(self.language.as_deref())
  }
}

/// Heading post-processing output.
struct Headings {
  html:    String,
  headers: Vec<Header>,
  title:   Option<String>,
  icons:   Vec<String>,
}

fn plain_text(html: &str) -> String {
  let stripped = HTML_TAG.replace_all(html, "");
  html_escape::decode_html_entities(stripped.trim()).into_owned()
}

impl MarkdownProcessor {
  /// Create a new `MarkdownProcessor` with the given options.
  #[must_use]
  pub const fn new(options: MarkdownOptions) -> Self {
    Self { options }
  }

  /// Access processor options.
  #[must_use]
  pub const fn options(&self) -> &MarkdownOptions {
    &self.options
  }

  /// Check if a specific feature is enabled.
  #[must_use]
  pub const fn has_feature(&self, feature: ProcessorFeature) -> bool {
    match feature {
      ProcessorFeature::Gfm => self.options.gfm,
      ProcessorFeature::DocTokens => self.options.doc_tokens,
      ProcessorFeature::LineNumbers => self.options.line_numbers,
      ProcessorFeature::LanguageFiltering => self.options.filter_languages,
    }
  }

  /// Render Markdown to HTML for the configured language.
  #[must_use]
  pub fn render(&self, markdown: &str) -> MarkdownResult {
    let (languages, extensions) = self.scan_blocks(markdown);

    let original_language = self.options.language.clone();
    let language = if self.options.default_language_to_first
      && original_language
        .as_ref()
        .is_none_or(|requested| !languages.contains(requested))
    {
      languages.first().cloned()
    } else {
      original_language.clone()
    };
    debug!(
      "Rendering for {original_language:?} (selected {language:?}, found \
       {languages:?})"
    );

    let mut ctx = RenderContext {
      original_language: original_language.clone(),
      language: language.clone(),
      tabs: IndexMap::new(),
    };
    let mut html = self.render_markdown(&mut ctx, markdown);

    let token_language = ctx.token_language().map(ToString::to_string);
    let mut tabs = ctx.tabs;
    if self.options.doc_tokens {
      html = resolve_doc_tokens(token_language.as_deref(), &html);
      for tab in tabs.values_mut() {
        *tab = resolve_doc_tokens(token_language.as_deref(), tab);
      }
    }

    let headings = self.process_headings(&html);

    MarkdownResult {
      html: headings.html,
      headers: headings.headers,
      title: headings.title,
      original_language,
      language,
      languages,
      extensions,
      tabs,
      icons: headings.icons,
    }
  }

  /// Render a document (or a nested block's contents) through the block
  /// pipeline and comrak.
  pub(crate) fn render_markdown(
    &self,
    ctx: &mut RenderContext,
    markdown: &str,
  ) -> String {
    let mut source = String::with_capacity(markdown.len());
    let mut blocks = Vec::new();

    for segment in split_fenced_blocks(markdown) {
      match segment {
        Segment::Text(text) => source.push_str(&text),
        Segment::Fenced(block) => {
          match self.render_block(ctx, &block) {
            BlockOutput::Keep => source.push_str(&block.raw),
            BlockOutput::Html(html) => {
              // An empty block still gets a marker, so the text around it
              // stays in separate paragraphs.
              source.push_str(&block.indent);
              source.push_str(&format!("<!-- polydoc-block:{} -->\n", blocks.len()));
              blocks.push(html);
            },
          }
        },
      }
    }

    let html = self.render_fragment(&source);
    if blocks.is_empty() {
      return html;
    }

    trace!("Substituting {} rendered blocks", blocks.len());
    process_html_elements(&html, &BLOCK_MARKER, |caps: &Captures| {
      caps
        .get(1)
        .and_then(|index| index.as_str().parse::<usize>().ok())
        .and_then(|index| blocks.get(index))
        .cloned()
        .unwrap_or_default()
    })
  }

  /// Render markdown with comrak only, without the block pipeline or doc
  /// tokens.
  #[must_use]
  pub fn render_fragment(&self, markdown: &str) -> String {
    markdown_to_html(markdown, &self.comrak_options())
  }

  /// Build comrak options from `MarkdownOptions` and feature flags.
  fn comrak_options(&self) -> Options<'_> {
    let mut options = Options::default();
    if self.options.gfm {
      options.extension.table = true;
      options.extension.footnotes = true;
      options.extension.strikethrough = true;
      options.extension.tasklist = true;
    }
    // Doc tokens look enough like e-mail addresses to get mangled
    options.extension.autolink = false;
    options.extension.header_ids = None;
    options.render.r#unsafe = true;
    options
  }

  /// Add ids and icon classes to headings and collect them.
  fn process_headings(&self, html: &str) -> Headings {
    let mut counts = [0_usize; 4];
    let mut headers = Vec::new();
    let mut title = None;
    let mut icons: Vec<String> = Vec::new();

    let html = process_html_elements(html, &HEADING, |caps: &Captures| {
      let whole = caps.get(0).map_or("", |m| m.as_str());
      let (Some(level), Some(inner)) = (
        caps.get(1).and_then(|m| m.as_str().parse::<u8>().ok()),
        caps.get(2).map(|m| m.as_str()),
      ) else {
        return whole.to_string();
      };

      let mut text = inner.to_string();
      let mut attributes = String::new();

      if let Some(icon) = ICON.captures(inner).and_then(|c| c.get(1)) {
        let name = icon.as_str();
        if !icons.iter().any(|known| known == name) {
          icons.push(name.to_string());
        }
        attributes.push_str(&format!(
          " class=\"{}{name}\"",
          self.options.icon_class_prefix
        ));
        text = ICON.replacen(inner, 1, "").into_owned();
      }

      if let Some(count) = counts.get_mut(usize::from(level) - 1) {
        let id = format!("h{level}_{count}");
        *count += 1;
        attributes.push_str(&format!(" id=\"{id}\""));

        let plain = plain_text(&text);
        if level == 1 && title.is_none() {
          title = Some(plain.clone());
        }
        headers.push(Header {
          text: plain,
          level,
          id,
        });
      }

      format!("<h{level}{attributes}>{text}</h{level}>")
    });

    Headings {
      html,
      headers,
      title,
      icons,
    }
  }
}
