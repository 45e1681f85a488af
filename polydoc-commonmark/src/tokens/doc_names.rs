//! `@@docName:`, `@@docMethod:`, `@@docConst:`, `@@docProp:`, `@@docClass:`
//! and `@@docParam:` tokens.
//!
//! Identifiers are written in `snake_case` in the source documents and cased
//! for the target language here.

use std::{fmt, sync::LazyLock};

use regex::{Captures, Regex};

use super::casing::{camel_case, kebab_case};
use crate::utils::{compile_or_never, process_html_elements};

static DOC_NAME: LazyLock<Regex> = LazyLock::new(|| {
  compile_or_never(
    "DOC_NAME",
    r"(`)?@@doc(Name|Method|Const|Prop|Class|Param): ?([A-Za-z0-9?_]*)(`)?",
  )
});

/// The kind of identifier a name token refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierKind {
  Name,
  Method,
  Const,
  Prop,
  Class,
  Param,
}

impl IdentifierKind {
  #[must_use]
  pub fn from_token(kind: &str) -> Option<Self> {
    match kind {
      "Name" => Some(Self::Name),
      "Method" => Some(Self::Method),
      "Const" => Some(Self::Const),
      "Prop" => Some(Self::Prop),
      "Class" => Some(Self::Class),
      "Param" => Some(Self::Param),
      _ => None,
    }
  }

  /// Lowercase name used in the `doc-name--{kind}` CSS class.
  #[must_use]
  pub const fn css_name(self) -> &'static str {
    match self {
      Self::Name => "name",
      Self::Method => "method",
      Self::Const => "const",
      Self::Prop => "prop",
      Self::Class => "class",
      Self::Param => "param",
    }
  }
}

impl fmt::Display for IdentifierKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.css_name())
  }
}

/// How an identifier is cased.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseStyle {
  /// `FOO_BAR`
  Upper,
  /// `fooBar`
  Camel,
  /// `FooBar`
  UpperCamel,
  /// `foo-bar`
  Kabob,
  /// `$fooBar`
  DollarCamel,
  /// `foo_bar`, unchanged
  Passthrough,
}

impl CaseStyle {
  #[must_use]
  pub fn apply(self, identifier: &str) -> String {
    match self {
      Self::Upper => identifier.to_uppercase(),
      Self::Camel => camel_case(identifier, false),
      Self::UpperCamel => camel_case(identifier, true),
      Self::Kabob => kebab_case(identifier),
      Self::DollarCamel => format!("${}", camel_case(identifier, false)),
      Self::Passthrough => identifier.to_string(),
    }
  }
}

/// Language entry matching any language when nothing more specific applies.
const DEFAULT: &str = "default";

type StyleRules = &'static [(CaseStyle, &'static [&'static str])];

/// Casing rules per identifier kind, in priority order.
static STYLE_RULES: &[(IdentifierKind, StyleRules)] = &[
  (IdentifierKind::Const, &[(CaseStyle::Upper, &[DEFAULT])]),
  (IdentifierKind::Param, &[
    (CaseStyle::Camel, &["csharp"]),
    (CaseStyle::DollarCamel, &["php"]),
  ]),
  (IdentifierKind::Method, &[(CaseStyle::Camel, &["php"])]),
  (IdentifierKind::Prop, &[(CaseStyle::Camel, &["php"])]),
  (IdentifierKind::Class, &[(CaseStyle::UpperCamel, &[DEFAULT])]),
  // Name is the fallback for every other kind
  (IdentifierKind::Name, &[
    (CaseStyle::Camel, &[
      "javascript",
      "typescript",
      "coffeescript",
      "java",
      "kotlin",
      "scala",
      "groovy",
      "swift",
      "objc",
      "haskell",
      "go",
    ]),
    (CaseStyle::UpperCamel, &["csharp", "fsharp"]),
    (CaseStyle::Kabob, &["clojure"]),
    (CaseStyle::DollarCamel, &["php"]),
  ]),
];

fn rule_for(kind: IdentifierKind, language: &str) -> Option<CaseStyle> {
  STYLE_RULES
    .iter()
    .filter(|(k, _)| *k == kind)
    .flat_map(|(_, rules)| rules.iter())
    .find(|(_, languages)| languages.contains(&language))
    .map(|(style, _)| *style)
}

/// Resolve the casing of `kind` identifiers in `language`.
///
/// Falls back from the kind's own rules to its default entry, then to the
/// `Name` rules for the language, and finally leaves the identifier as is.
#[must_use]
pub fn find_style(kind: IdentifierKind, language: &str) -> CaseStyle {
  rule_for(kind, language)
    .or_else(|| rule_for(kind, DEFAULT))
    .or_else(|| rule_for(IdentifierKind::Name, language))
    .or_else(|| rule_for(IdentifierKind::Name, DEFAULT))
    .unwrap_or(CaseStyle::Passthrough)
}

fn replace_name(language: &str, pre: bool, caps: &Captures) -> String {
  let lead = caps.get(1).map_or("", |m| m.as_str());
  let trail = caps.get(4).map_or("", |m| m.as_str());
  let identifier = caps.get(3).map_or("", |m| m.as_str());
  let Some(kind) = caps
    .get(2)
    .and_then(|m| IdentifierKind::from_token(m.as_str()))
  else {
    return caps.get(0).map_or_else(String::new, |m| m.as_str().to_string());
  };

  if identifier.is_empty() {
    log::warn!("@@doc{kind} token without an identifier ignored");
    return format!("{lead}{trail}");
  }

  let value = find_style(kind, language).apply(identifier);
  if !lead.is_empty() || pre {
    format!("{lead}{value}{trail}")
  } else {
    format!(
      "<dfn class=\"doc-name doc-name--{}\">{value}</dfn>{trail}",
      kind.css_name()
    )
  }
}

/// Replace every name token in `content` with the identifier cased for
/// `language`.
#[must_use]
pub fn replace_doc_names(language: &str, pre: bool, content: &str) -> String {
  process_html_elements(content, &DOC_NAME, |caps| {
    replace_name(language, pre, caps)
  })
}
