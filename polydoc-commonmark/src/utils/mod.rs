pub mod codeblock;

use regex::Regex;

/// Apply a regex transformation to HTML elements using the provided function.
/// Used by the markdown processor for HTML element transformations.
pub fn process_html_elements<F>(
  html: &str,
  regex: &Regex,
  transform: F,
) -> String
where
  F: FnMut(&regex::Captures) -> String,
{
  match regex.replace_all(html, transform) {
    std::borrow::Cow::Borrowed(_) => html.to_string(),
    std::borrow::Cow::Owned(s) => s,
  }
}

/// Compile a pattern, logging and falling back to [`never_matching_regex`]
/// if it is invalid.
#[must_use]
pub fn compile_or_never(name: &str, pattern: &str) -> Regex {
  Regex::new(pattern).unwrap_or_else(|e| {
    log::error!(
      "Failed to compile {name} regex: {e}\n Falling back to never matching \
       regex."
    );
    never_matching_regex()
  })
}

/// Create a regex that never matches anything.
///
/// This is used as a fallback pattern when a regex fails to compile.
/// It will never match any input, which is safer than using a trivial regex
/// like `^$` which would match empty strings.
///
/// # Panics
///
/// Panics if the fallback regex pattern `r"^\b$"` fails to compile, which
/// should never happen.
#[must_use]
pub fn never_matching_regex() -> Regex {
  // Use a pattern that will never match anything because it asserts something
  // impossible - this pattern is guaranteed to be valid
  Regex::new(r"[^\s\S]").unwrap_or_else(|_| {
    #[allow(
      clippy::expect_used,
      reason = "This pattern is guaranteed to be valid"
    )]
    Regex::new(r"^\b$").expect("regex pattern ^\\b$ should always compile")
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_never_matching_regex() {
    let re = never_matching_regex();
    assert!(!re.is_match(""));
    assert!(!re.is_match("anything at all"));
  }

  #[test]
  fn test_compile_or_never_falls_back() {
    let re = compile_or_never("BROKEN", "(unclosed");
    assert!(!re.is_match("(unclosed"));
  }

  #[test]
  fn test_process_html_elements_borrowed() {
    let re = compile_or_never("X", "x");
    assert_eq!(process_html_elements("abc", &re, |_| "y".into()), "abc");
    assert_eq!(process_html_elements("axc", &re, |_| "y".into()), "ayc");
  }
}
