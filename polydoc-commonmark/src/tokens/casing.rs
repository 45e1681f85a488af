//! Identifier case conversion.
//!
//! Source identifiers are written in `snake_case` and converted to the
//! convention of the target language.

/// Uppercase the first letter of every whitespace separated word.
#[must_use]
pub fn upper_case_words(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  let mut at_boundary = true;
  for c in s.chars() {
    if at_boundary && !c.is_whitespace() {
      out.extend(c.to_uppercase());
    } else {
      out.push(c);
    }
    at_boundary = c.is_whitespace();
  }
  out
}

/// Lowercase the first character of a string.
#[must_use]
pub fn lower_case_first(s: &str) -> String {
  let mut chars = s.chars();
  chars.next().map_or_else(String::new, |c| {
    c.to_lowercase().collect::<String>() + chars.as_str()
  })
}

/// Convert a `snake_case` or space delimited string to `camelCase`, or to
/// `PascalCase` when `capitalize` is set.
///
/// ```
/// use polydoc_commonmark::tokens::casing::camel_case;
///
/// assert_eq!(camel_case("foo_bar", false), "fooBar");
/// assert_eq!(camel_case("foo_bar", true), "FooBar");
/// ```
#[must_use]
pub fn camel_case(s: &str, capitalize: bool) -> String {
  if s.is_empty() {
    return String::new();
  }

  let cased: String = upper_case_words(&s.replace('_', " "))
    .chars()
    .filter(|c| !c.is_whitespace())
    .collect();

  if capitalize {
    cased
  } else {
    lower_case_first(&cased)
  }
}

/// Convert a `snake_case` string to `kebab-case`.
#[must_use]
pub fn kebab_case(s: &str) -> String {
  s.chars()
    .map(|c| if c == '_' || c.is_whitespace() { '-' } else { c })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_camel_case() {
    assert_eq!(camel_case("foo_bar", false), "fooBar");
    assert_eq!(camel_case("first_names", false), "firstNames");
    assert_eq!(camel_case("foo bar baz", false), "fooBarBaz");
    assert_eq!(camel_case("already", false), "already");
  }

  #[test]
  fn test_pascal_case() {
    assert_eq!(camel_case("foo_bar", true), "FooBar");
    assert_eq!(camel_case("open_files", true), "OpenFiles");
    assert_eq!(camel_case("x", true), "X");
  }

  #[test]
  fn test_camel_case_edges() {
    assert_eq!(camel_case("", false), "");
    assert_eq!(camel_case("", true), "");
    assert_eq!(camel_case("_leading", false), "leading");
    assert_eq!(camel_case("double__underscore", false), "doubleUnderscore");
    assert_eq!(camel_case("is_empty?", false), "isEmpty?");
    assert_eq!(camel_case("HTTP_status", false), "hTTPStatus");
  }

  #[test]
  fn test_kebab_case() {
    assert_eq!(kebab_case("first_names"), "first-names");
    assert_eq!(kebab_case("valid?"), "valid?");
  }

  #[test]
  fn test_upper_case_words() {
    assert_eq!(upper_case_words("a b  c"), "A B  C");
    assert_eq!(upper_case_words(""), "");
  }
}
