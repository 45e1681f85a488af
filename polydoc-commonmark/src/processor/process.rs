//! Main processing functions for Markdown content.
use std::{fs, io, path::Path};

use log::{debug, error};

use super::types::MarkdownProcessor;
use crate::types::MarkdownResult;

/// Process markdown content with error recovery.
///
/// Attempts to process the markdown content and falls back to an error
/// message if rendering panics.
///
/// # Arguments
///
/// * `processor` - The configured markdown processor
/// * `content` - The raw markdown content to process
///
/// # Returns
///
/// A `MarkdownResult` with processed HTML and document metadata
#[must_use]
pub fn process_with_recovery(
  processor: &MarkdownProcessor,
  content: &str,
) -> MarkdownResult {
  match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
    processor.render(content)
  })) {
    Ok(result) => result,
    Err(panic_err) => {
      error!("Panic during markdown processing: {panic_err:?}");
      MarkdownResult {
        html: "<div class=\"error\">Critical error processing markdown \
               content</div>"
          .to_string(),
        original_language: processor.options.language.clone(),
        ..Default::default()
      }
    },
  }
}

/// Process markdown content from a file with error recovery.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn process_markdown_file(
  file_path: &Path,
  processor: &MarkdownProcessor,
) -> io::Result<MarkdownResult> {
  let content = fs::read_to_string(file_path)?;
  debug!("Processing {}", file_path.display());
  Ok(process_with_recovery(processor, &content))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Fine in tests")]
mod tests {
  use super::*;
  use crate::processor::MarkdownOptions;

  #[test]
  fn test_process_with_recovery_renders() {
    let processor = MarkdownProcessor::new(MarkdownOptions::for_language("ruby"));
    let result = process_with_recovery(&processor, "# Title\n\nSome content.");

    assert_eq!(result.title.as_deref(), Some("Title"));
    assert_eq!(result.original_language.as_deref(), Some("ruby"));
    assert_eq!(result.headers.len(), 1);
  }

  #[test]
  fn test_process_markdown_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.md");
    fs::write(&path, "# From disk").unwrap();

    let processor = MarkdownProcessor::new(MarkdownOptions::default());
    let result = process_markdown_file(&path, &processor).unwrap();
    assert_eq!(result.title.as_deref(), Some("From disk"));

    let missing = process_markdown_file(&dir.path().join("nope.md"), &processor);
    assert_eq!(
      missing.map(|_| ()).unwrap_err().kind(),
      io::ErrorKind::NotFound
    );
  }
}
