//! Fenced code block detection for the block pipeline.
//!
//! Markdown is split into plain text runs and fenced blocks before it is
//! handed to comrak, so that conditional, tab and structured documentation
//! blocks can be rendered (or dropped) by the processor itself.

/// An opening code fence line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fence<'a> {
  fence_char:  char,
  fence_count: usize,
  indent:      &'a str,
  info:        &'a str,
}

/// A fenced code block lifted out of a markdown document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FencedBlock {
  /// Whitespace preceding the opening fence.
  pub indent: String,
  /// Info string following the opening fence, trimmed.
  pub info:   String,
  /// Block contents with the fence indentation removed.
  pub body:   String,
  /// The block exactly as it appeared in the source, fences included.
  pub raw:    String,
}

impl FencedBlock {
  /// Whether the block is nested (e.g. inside a list item).
  #[must_use]
  pub const fn is_indented(&self) -> bool {
    !self.indent.is_empty()
  }
}

/// A piece of a markdown document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
  /// Markdown outside of any fenced block.
  Text(String),
  /// A fenced code block.
  Fenced(FencedBlock),
}

fn parse_fence(line: &str) -> Option<Fence<'_>> {
  let content = line.trim_end_matches(['\n', '\r']);
  let trimmed = content.trim_start();
  let indent = &content[..content.len() - trimmed.len()];

  let fence_char = trimmed.chars().next()?;
  if fence_char != '`' && fence_char != '~' {
    return None;
  }

  let fence_count = trimmed.chars().take_while(|&c| c == fence_char).count();
  if fence_count < 3 {
    return None;
  }

  // Fence characters are ASCII, so the char count is also the byte offset
  let info = trimmed[fence_count..].trim();
  if fence_char == '`' && info.contains('`') {
    return None;
  }

  Some(Fence {
    fence_char,
    fence_count,
    indent,
    info,
  })
}

fn closes(line: &str, fence_char: char, fence_count: usize) -> bool {
  let trimmed = line.trim();
  let count = trimmed.chars().take_while(|&c| c == fence_char).count();
  count >= fence_count && count == trimmed.len()
}

fn dedent(line: &str, width: usize) -> &str {
  let strip = line
    .char_indices()
    .take(width)
    .take_while(|(_, c)| *c == ' ' || *c == '\t')
    .count();
  &line[strip..]
}

/// Split markdown into text runs and fenced blocks.
///
/// An unterminated fence extends to the end of the document, matching
/// `CommonMark`.
#[must_use]
pub fn split_fenced_blocks(markdown: &str) -> Vec<Segment> {
  let mut segments = Vec::new();
  let mut text = String::new();
  let mut lines = markdown.split_inclusive('\n');

  while let Some(line) = lines.next() {
    let Some(fence) = parse_fence(line) else {
      text.push_str(line);
      continue;
    };

    if !text.is_empty() {
      segments.push(Segment::Text(std::mem::take(&mut text)));
    }

    let mut raw = line.to_string();
    let mut body = String::new();
    for next in lines.by_ref() {
      raw.push_str(next);
      if closes(next, fence.fence_char, fence.fence_count) {
        break;
      }
      body.push_str(dedent(next, fence.indent.len()));
    }

    segments.push(Segment::Fenced(FencedBlock {
      indent: fence.indent.to_string(),
      info: fence.info.to_string(),
      body,
      raw,
    }));
  }

  if !text.is_empty() {
    segments.push(Segment::Text(text));
  }

  segments
}

/// Info strings of every unindented fence line in the document.
///
/// Closing fences carry no info string and are skipped. Like a plain line
/// scan, this also reports fences that appear inside other blocks.
#[must_use]
pub fn fence_infos(markdown: &str) -> Vec<&str> {
  markdown
    .lines()
    .filter_map(parse_fence)
    .filter(|fence| fence.indent.is_empty() && !fence.info.is_empty())
    .map(|fence| fence.info)
    .collect()
}
