//! Rendering documents and directories to disk.
use std::{
  fs,
  path::{Path, PathBuf},
};

use log::{info, trace};
use polydoc_commonmark::{
  Header,
  MarkdownProcessor,
  MarkdownResult,
  processor::process_markdown_file,
};
use rayon::prelude::*;
use serde::Serialize;
use walkdir::WalkDir;

use crate::{config::Config, error::RenderError};

/// One rendered page, as listed in `manifest.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestEntry {
  /// Source file, relative to the input directory.
  pub source:    PathBuf,
  /// Rendered file, relative to the language's output directory.
  pub output:    PathBuf,
  pub title:     Option<String>,
  pub headers:   Vec<Header>,
  /// Language code blocks were filtered for.
  pub language:  Option<String>,
  pub languages: Vec<String>,
  /// Labels of the page's `tab:` blocks.
  pub tabs:      Vec<String>,
}

/// Collect all markdown files from the input directory.
#[must_use]
pub fn collect_markdown_files(input_dir: &Path) -> Vec<PathBuf> {
  let mut files: Vec<PathBuf> = WalkDir::new(input_dir)
    .follow_links(true)
    .into_iter()
    .filter_map(Result::ok)
    .map(walkdir::DirEntry::into_path)
    .filter(|path| {
      path.is_file() && path.extension().is_some_and(|ext| ext == "md")
    })
    .collect();
  files.sort();

  trace!("Found {} markdown files to process", files.len());
  files
}

/// Render one markdown file.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn render_file(
  processor: &MarkdownProcessor,
  path: &Path,
) -> Result<MarkdownResult, RenderError> {
  process_markdown_file(path, processor).map_err(|source| {
    RenderError::Read {
      path: path.to_path_buf(),
      source,
    }
  })
}

/// Render one markdown file as HTML, or as the full result in JSON.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the result cannot be
/// serialized.
pub fn render_to_string(
  config: &Config,
  input: &Path,
  language: Option<&str>,
  json: bool,
) -> Result<String, RenderError> {
  let processor = MarkdownProcessor::new(config.markdown_options(language));
  let result = render_file(&processor, input)?;
  if json {
    Ok(serde_json::to_string_pretty(&result)?)
  } else {
    Ok(result.html)
  }
}

fn write_file(path: &Path, content: &str) -> Result<(), RenderError> {
  let write_error = |source| {
    RenderError::Write {
      path: path.to_path_buf(),
      source,
    }
  };
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).map_err(write_error)?;
  }
  fs::write(path, content).map_err(write_error)
}

fn build_page(
  processor: &MarkdownProcessor,
  input_dir: &Path,
  output_dir: &Path,
  file: &Path,
) -> Result<ManifestEntry, RenderError> {
  let result = render_file(processor, file)?;

  let source = file.strip_prefix(input_dir).unwrap_or(file).to_path_buf();
  let mut output = source.clone();
  output.set_extension("html");
  write_file(&output_dir.join(&output), &result.html)?;

  Ok(ManifestEntry {
    source,
    output,
    title: result.title,
    headers: result.headers,
    language: result.language,
    languages: result.languages,
    tabs: result.tabs.into_keys().collect(),
  })
}

/// Render every markdown file under `input_dir` into `output_dir`, in
/// parallel, and write a `manifest.json` describing the pages.
///
/// # Errors
///
/// Returns an error if the input directory is missing, or if any file cannot
/// be read or written.
pub fn build_directory(
  config: &Config,
  input_dir: &Path,
  output_dir: &Path,
  language: Option<&str>,
) -> Result<Vec<ManifestEntry>, RenderError> {
  if !input_dir.is_dir() {
    return Err(RenderError::MissingInput(input_dir.to_path_buf()));
  }

  let files = collect_markdown_files(input_dir);
  info!(
    "Rendering {} markdown files from {} for {}",
    files.len(),
    input_dir.display(),
    language.or(config.language.as_deref()).unwrap_or("any language")
  );

  let processor = MarkdownProcessor::new(config.markdown_options(language));
  let mut pool = rayon::ThreadPoolBuilder::new();
  if let Some(jobs) = config.jobs {
    pool = pool.num_threads(jobs);
  }
  let pool = pool.build()?;

  let entries = pool.install(|| {
    files
      .par_iter()
      .map(|file| build_page(&processor, input_dir, output_dir, file))
      .collect::<Result<Vec<_>, _>>()
  })?;

  let manifest = serde_json::to_string_pretty(&entries)?;
  write_file(&output_dir.join("manifest.json"), &manifest)?;

  Ok(entries)
}

/// Render the configured input directory once per language. With more than
/// one language, each is written to `output_dir/<language>`.
///
/// # Errors
///
/// Returns an error if any build fails.
pub fn build(
  config: &Config,
  input_dir: &Path,
  languages: &[String],
) -> Result<usize, RenderError> {
  if let [_, _, ..] = languages {
    let mut pages = 0;
    for language in languages {
      let output_dir = config.output_dir.join(language);
      pages += build_directory(config, input_dir, &output_dir, Some(language))?
        .len();
    }
    return Ok(pages);
  }

  let language = languages.first().map(String::as_str);
  let entries =
    build_directory(config, input_dir, &config.output_dir, language)?;
  Ok(entries.len())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Fine in tests")]
mod tests {
  use super::*;

  fn write(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
  }

  #[test]
  fn test_collect_markdown_files() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "b.md", "");
    write(dir.path(), "nested/a.md", "");
    write(dir.path(), "notes.txt", "");

    let files = collect_markdown_files(dir.path());
    assert_eq!(files, vec![
      dir.path().join("b.md"),
      dir.path().join("nested/a.md"),
    ]);
  }

  #[test]
  fn test_render_to_string() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "doc.md", "# Hi\n\nUse @@docName:open_files.\n");
    let input = dir.path().join("doc.md");
    let config = Config::default();

    let html = render_to_string(&config, &input, Some("java"), false).unwrap();
    assert!(html.contains("openFiles"));

    let json = render_to_string(&config, &input, Some("java"), true).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["title"], "Hi");

    let missing = render_to_string(&config, &dir.path().join("x.md"), None, false);
    assert!(matches!(missing, Err(RenderError::Read { .. })));
  }

  #[test]
  fn test_build_directory() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write(
      input.path(),
      "guide/intro.md",
      "# Intro\n\n```ruby\nputs 1\n```\n\n```python\nprint(1)\n```\n",
    );
    write(input.path(), "index.md", "# Home\n\n```tab:Ruby\nx\n```\n");

    let config = Config {
      jobs: Some(2),
      ..Config::default()
    };
    let entries =
      build_directory(&config, input.path(), output.path(), Some("python"))
        .unwrap();
    assert_eq!(entries.len(), 2);

    let intro = fs::read_to_string(output.path().join("guide/intro.html"))
      .unwrap();
    assert!(intro.contains("print(1)"));
    assert!(!intro.contains("puts 1"));

    let index = entries
      .iter()
      .find(|e| e.source == Path::new("index.md"))
      .unwrap();
    assert_eq!(index.output, PathBuf::from("index.html"));
    assert_eq!(index.tabs, vec!["Ruby"]);

    let manifest: serde_json::Value = serde_json::from_str(
      &fs::read_to_string(output.path().join("manifest.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(manifest.as_array().unwrap().len(), 2);
  }

  #[test]
  fn test_build_per_language() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write(input.path(), "a.md", "```ruby\nputs 1\n```\n```go\nx := 1\n```\n");

    let config = Config {
      output_dir: output.path().to_path_buf(),
      ..Config::default()
    };
    let pages =
      build(&config, input.path(), &["ruby".into(), "go".into()]).unwrap();
    assert_eq!(pages, 2);

    let ruby = fs::read_to_string(output.path().join("ruby/a.html")).unwrap();
    let go = fs::read_to_string(output.path().join("go/a.html")).unwrap();
    assert!(ruby.contains("puts 1") && !ruby.contains("x :="));
    assert!(go.contains("x :=") && !go.contains("puts 1"));
  }

  #[test]
  fn test_build_missing_input() {
    let config = Config::default();
    let result = build_directory(
      &config,
      Path::new("/definitely/not/here"),
      Path::new("out"),
      None,
    );
    assert!(matches!(result, Err(RenderError::MissingInput(_))));
  }
}
