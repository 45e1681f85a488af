//! Generic and collection type composition.
//!
//! Type expressions such as `Promise<Array<Integer>>` are parsed into a
//! [`TypeExpression`] tree and then written out in the collection idiom of the
//! target language (`int[]`, `[]int`, `Array (of Strings)`, ...).

use super::table::{is_known_concept, map_nullable, map_type};

/// Nesting limit for generic arguments. Deeper input is left unparsed.
const MAX_DEPTH: usize = 64;

/// A parsed type token value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeExpression {
  pub root:     String,
  pub args:     Vec<TypeExpression>,
  pub nullable: bool,
}

/// Opening delimiters of a generic group. Markdown renderers escape only the
/// brackets that do not form an HTML tag, so both spellings show up inside a
/// single rendered token (`Promise&lt;Array<Integer>&gt;`).
const OPEN: [&str; 2] = ["<", "&lt;"];
const CLOSE: [&str; 2] = [">", "&gt;"];

/// Recursive descent parser over a single token value.
struct Parser<'a> {
  input: &'a str,
  pos:   usize,
}

impl<'a> Parser<'a> {
  const fn new(input: &'a str) -> Self {
    Self { input, pos: 0 }
  }

  fn rest(&self) -> &'a str {
    &self.input[self.pos..]
  }

  fn eat(&mut self, token: &str) -> bool {
    if self.rest().starts_with(token) {
      self.pos += token.len();
      true
    } else {
      false
    }
  }

  fn eat_any(&mut self, tokens: &[&str]) -> bool {
    tokens.iter().any(|token| self.eat(token))
  }

  fn skip_blanks(&mut self) {
    let rest = self.rest();
    let trimmed = rest.trim_start_matches([' ', '\t']);
    self.pos += rest.len() - trimmed.len();
  }

  fn identifier(&mut self) -> Option<&'a str> {
    let rest = self.rest();
    let len = rest
      .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
      .unwrap_or(rest.len());
    if len == 0 {
      return None;
    }
    self.pos += len;
    Some(&rest[..len])
  }

  fn node(&mut self, depth: usize) -> Option<TypeExpression> {
    let root = self.identifier()?.to_string();

    let mut args = Vec::new();
    if depth < MAX_DEPTH {
      let saved = self.pos;
      match self.arguments(depth) {
        Some(parsed) => args = parsed,
        None => self.pos = saved,
      }
    }

    let nullable = self.eat("?");
    Some(TypeExpression {
      root,
      args,
      nullable,
    })
  }

  fn arguments(&mut self, depth: usize) -> Option<Vec<TypeExpression>> {
    if !self.eat_any(&OPEN) {
      return None;
    }
    let mut args = vec![self.node(depth + 1)?];
    loop {
      self.skip_blanks();
      if self.eat_any(&CLOSE) {
        return Some(args);
      }
      if !self.eat(",") {
        return None;
      }
      self.skip_blanks();
      args.push(self.node(depth + 1)?);
    }
  }
}

impl TypeExpression {
  /// Parse the longest type expression at the start of `input`.
  ///
  /// Returns the expression and the number of bytes consumed. A generic group
  /// that does not close is not part of the expression, so
  /// `String</code>` parses as `String`.
  #[must_use]
  pub fn parse_prefix(input: &str) -> Option<(Self, usize)> {
    let mut parser = Parser::new(input);
    let expr = parser.node(0)?;
    Some((expr, parser.pos))
  }

  /// Parse a complete type expression, ignoring surrounding whitespace.
  #[must_use]
  pub fn parse(input: &str) -> Option<Self> {
    let input = input.trim();
    match Self::parse_prefix(input)? {
      (expr, consumed) if consumed == input.len() => Some(expr),
      _ => None,
    }
  }

  /// Generic nesting depth; a bare type has depth 0.
  #[must_use]
  pub fn depth(&self) -> usize {
    self
      .args
      .iter()
      .map(|arg| arg.depth() + 1)
      .max()
      .unwrap_or(0)
  }

  /// Write the expression out for `language`.
  #[must_use]
  pub fn compose(&self, language: &str) -> String {
    let value = if self.args.is_empty() {
      map_type(language, &self.root)
    } else {
      self.compose_collection(language)
    };

    if self.nullable {
      map_nullable(language, &value)
    } else {
      value
    }
  }

  fn compose_collection(&self, language: &str) -> String {
    if is_known_concept(&self.root) {
      if let Some(idiom) = self.collection_idiom(language) {
        return idiom;
      }
    }

    let args: Vec<String> =
      self.args.iter().map(|arg| arg.compose(language)).collect();
    format!("{}<{}>", map_type(language, &self.root), args.join(", "))
  }

  fn single_arg(&self) -> Option<&Self> {
    match self.args.as_slice() {
      [arg] => Some(arg),
      _ => None,
    }
  }

  fn root_is(&self, names: &[&str]) -> bool {
    names.contains(&self.root.as_str())
  }

  fn collection_idiom(&self, language: &str) -> Option<String> {
    match language {
      "ruby" | "python" | "objc" => {
        let plurals: Vec<String> = self
          .args
          .iter()
          .map(|arg| {
            let mapped = arg.compose(language).replace(" *", "");
            if mapped.ends_with(')') {
              mapped
            } else {
              mapped + "s"
            }
          })
          .collect();
        Some(format!(
          "{} (of {})",
          map_type(language, &self.root),
          plurals.join("/")
        ))
      },
      "csharp" | "java" if self.root_is(&["Array"]) => {
        self
          .single_arg()
          .filter(|arg| arg.args.is_empty())
          .map(|arg| format!("{}[]", arg.compose(language)))
      },
      "c" if self.root_is(&["List"]) => {
        self
          .single_arg()
          .map(|arg| format!("{}[]", arg.compose(language)))
      },
      "haskell" if self.root_is(&["List", "Array"]) => {
        self
          .single_arg()
          .map(|arg| format!("[{}]", arg.compose(language)))
      },
      "go" if self.root_is(&["List", "Array"]) => {
        self
          .single_arg()
          .map(|arg| format!("[]{}", arg.compose(language)))
      },
      _ => None,
    }
  }
}

/// Map a raw type expression to its spelling in `language`.
///
/// Input that does not parse as a type expression is mapped as a plain name.
#[must_use]
pub fn compose_type(language: &str, raw: &str) -> String {
  TypeExpression::parse(raw).map_or_else(
    || map_type(language, raw.trim()),
    |expr| expr.compose(language),
  )
}
