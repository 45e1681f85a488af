//! Markdown processing module with modular organization.
//!
//! # Architecture
//!
//! The processor module is organized into focused submodules:
//!
//! - [`core`]: Main processor implementation and rendering pipeline
//! - [`blocks`]: Fenced block classification, filtering and dispatch
//! - [`process`]: High-level processing functions with error recovery
//! - [`types`]: Configuration structures and pluggable handlers
pub mod blocks;
pub mod core;
pub mod process;
pub mod types;

pub use blocks::{BlockOutput, number_lines};
pub use core::ProcessorFeature;

pub use process::{process_markdown_file, process_with_recovery};
pub use types::{
  CodeHandler,
  DEFAULT_LANGUAGES,
  LanguageWrapper,
  MarkdownOptions,
  MarkdownOptionsBuilder,
  MarkdownProcessor,
};

#[cfg(test)]
mod tests {
  use super::{
    CodeHandler,
    LanguageWrapper,
    MarkdownOptions,
    MarkdownOptionsBuilder,
    MarkdownProcessor,
  };

  #[test]
  fn test_hardtabs_survive_code_blocks() {
    let processor = MarkdownProcessor::new(MarkdownOptions::default());
    let markdown = "```ruby\ndef main\n\tputs 1\nend\n```\n";

    let result = processor.render(markdown);
    assert!(result.html.contains("\tputs 1"));
  }

  #[test]
  fn test_line_numbers() {
    let processor = MarkdownProcessor::new(MarkdownOptions::default());
    let result = processor.render("```ruby:9\na = 1\nb = 2\n```\n");

    assert!(result.html.contains("  9 a = 1\n 10 b = 2"));
    assert!(result.html.contains("class=\"language-ruby\""));
    assert_eq!(result.languages, vec!["ruby"]);
  }

  #[test]
  fn test_line_numbers_disabled() {
    let options = MarkdownOptionsBuilder::new().line_numbers(false).build();
    let result =
      MarkdownProcessor::new(options).render("```ruby:9\na = 1\n```\n");
    assert!(result.html.contains("<code class=\"language-ruby:9\">a = 1"));
  }

  #[test]
  fn test_language_wrapper_template() {
    let options = MarkdownOptionsBuilder::new()
      .language_wrapper(Some(LanguageWrapper::Template(
        "<div class=\"code\">{slot}</div>".into(),
      )))
      .build();
    let html = MarkdownProcessor::new(options)
      .render("```ruby\nputs 1\n```\n")
      .html;
    assert!(html.contains("<div class=\"code\"><pre><code class=\"language-ruby\">"));
  }

  #[test]
  fn test_function_extension() {
    let options = MarkdownOptionsBuilder::new()
      .extension(
        "shout",
        CodeHandler::function(|code| format!("<b>{}</b>", code.trim())),
      )
      .build();
    let result = MarkdownProcessor::new(options)
      .render("text\n\n```shout\nhello\n```\n");
    assert!(result.html.contains("<b>hello</b>"));
    assert_eq!(result.extensions, vec!["shout"]);
  }
}
