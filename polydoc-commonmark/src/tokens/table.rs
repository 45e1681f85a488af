//! Per-language spellings of common type concepts.
//!
//! We don't try to maintain a list of every type for every language, only the
//! common ones (hashes, void, primitives) where a literal spelling would
//! confuse readers of a given language. Rules are evaluated in declaration
//! order and the first rule listing the language wins.

/// A semantic type category and its spellings.
#[derive(Debug, Clone, Copy)]
pub struct TypeConcept {
  /// Lowercase concept name, e.g. `hash`.
  pub name:    &'static str,
  /// Ordered `(spelling, languages)` rules.
  pub rules:   &'static [(&'static str, &'static [&'static str])],
  /// Concept to resolve when no rule matches.
  pub alias:   Option<&'static str>,
  /// Spelling used when no rule matches and there is no alias.
  pub default: Option<&'static str>,
}

/// A nullable wrapper template for one language. `@@` marks where the mapped
/// type goes.
#[derive(Debug, Clone, Copy)]
pub struct NullabilityRule {
  pub language: &'static str,
  /// Templates keyed by the root of the mapped spelling, so `Dictionary`
  /// also covers `Dictionary<string, int>`.
  pub exact:    &'static [(&'static str, &'static str)],
  /// Template for every other spelling.
  pub default:  Option<&'static str>,
}

pub static TYPE_CONCEPTS: &[TypeConcept] = &[
  TypeConcept {
    name:    "void",
    rules:   &[
      ("undefined", &["javascript", "coffeescript", "typescript"]),
      ("nil", &["ruby", "clojure"]),
      ("None", &["python"]),
      ("Unit", &["kotlin", "scala"]),
      ("Void", &["swift"]),
    ],
    alias:   None,
    default: None,
  },
  TypeConcept {
    name:    "null",
    rules:   &[
      ("nil", &["ruby", "clojure", "go", "swift"]),
      ("NSNull", &["objc"]),
      ("None", &["python"]),
      ("nullptr", &["cpp"]),
      ("NULL", &["c"]),
    ],
    alias:   None,
    default: None,
  },
  TypeConcept {
    name:    "object",
    rules:   &[("NSObject", &["objc"])],
    alias:   Some("hash"),
    default: None,
  },
  TypeConcept {
    name:    "hash",
    rules:   &[
      ("Hash", &["ruby"]),
      ("dict", &["python"]),
      ("Dictionary", &["csharp", "swift"]),
      ("HashMap", &["java"]),
      ("Object", &["javascript", "typescript", "coffeescript"]),
      ("Map", &["kotlin", "scala"]),
      ("map", &["go"]),
      ("std::map", &["cpp"]),
      ("array", &["php"]),
    ],
    alias:   None,
    default: None,
  },
  TypeConcept {
    name:    "collection",
    rules:   &[("List", &["java"]), ("Collection", &["csharp"])],
    alias:   Some("list"),
    default: None,
  },
  TypeConcept {
    name:    "enumerable",
    rules:   &[("IEnumerable", &["csharp"]), ("Iterable", &["java"])],
    alias:   Some("array"),
    default: None,
  },
  TypeConcept {
    name:    "array",
    rules:   &[
      ("List", &["java"]),
      ("NSArray*", &["objc"]),
      ("std::list", &["cpp"]),
    ],
    alias:   None,
    default: Some("Array"),
  },
  TypeConcept {
    name:    "list",
    rules:   &[
      ("List", &["java", "csharp", "scala", "groovy", "kotlin"]),
      ("std::list", &["cpp"]),
    ],
    alias:   None,
    default: Some("Array"),
  },
  TypeConcept {
    name:    "string",
    rules:   &[
      ("string", &["csharp", "typescript", "go"]),
      ("std::string", &["cpp"]),
      ("char*", &["c"]),
      ("NSString *", &["objc"]),
    ],
    alias:   None,
    default: Some("String"),
  },
  TypeConcept {
    name:    "integer",
    rules:   &[
      ("int", &["csharp", "cpp", "c", "go"]),
      ("Int", &["swift", "haskell", "kotlin", "scala"]),
      ("NSNumber *", &["objc"]),
      ("Number", &["javascript", "coffeescript"]),
      ("number", &["typescript"]),
    ],
    alias:   None,
    default: Some("Integer"),
  },
  TypeConcept {
    name:    "long",
    rules:   &[
      ("long", &["csharp", "java", "c", "cpp"]),
      ("Int64", &["swift"]),
      ("Long", &["kotlin", "scala"]),
      ("int64", &["go"]),
      ("NSNumber *", &["objc"]),
      ("Number", &["javascript", "coffeescript"]),
      ("number", &["typescript"]),
      ("Integer", &["ruby", "python"]),
    ],
    alias:   None,
    default: Some("Long"),
  },
  TypeConcept {
    name:    "boolean",
    rules:   &[
      ("bool", &["csharp", "c", "cpp", "go"]),
      ("Bool", &["swift", "haskell"]),
      ("BOOL", &["objc"]),
      ("boolean", &["java", "typescript"]),
    ],
    alias:   None,
    default: Some("Boolean"),
  },
  TypeConcept {
    name:    "float",
    rules:   &[
      ("float", &["csharp", "c", "cpp"]),
      ("float64", &["go"]),
      ("Double", &["swift", "kotlin", "scala"]),
      ("Number", &["javascript", "coffeescript"]),
      ("number", &["typescript"]),
    ],
    alias:   None,
    default: Some("Float"),
  },
];

pub static NULLABILITY_RULES: &[NullabilityRule] = &[
  NullabilityRule {
    language: "csharp",
    exact:    &[("string", "@@"), ("Dictionary", "@@")],
    default:  Some("Nullable<@@>"),
  },
  NullabilityRule {
    language: "typescript",
    exact:    &[],
    default:  Some("@@ | null"),
  },
  NullabilityRule {
    language: "swift",
    exact:    &[],
    default:  Some("@@?"),
  },
  NullabilityRule {
    language: "kotlin",
    exact:    &[],
    default:  Some("@@?"),
  },
];

/// Look up a concept by name, ignoring case.
#[must_use]
pub fn find_concept(name: &str) -> Option<&'static TypeConcept> {
  TYPE_CONCEPTS
    .iter()
    .find(|concept| concept.name.eq_ignore_ascii_case(name))
}

/// Whether `name` is one of the concepts in [`TYPE_CONCEPTS`].
#[must_use]
pub fn is_known_concept(name: &str) -> bool {
  find_concept(name).is_some()
}

/// Map a type name to its spelling in `language`.
///
/// Names that are not known concepts are returned unchanged, which lets
/// documentation refer to project specific classes.
#[must_use]
pub fn map_type(language: &str, type_name: &str) -> String {
  resolve(language, type_name, type_name)
}

fn resolve(language: &str, type_name: &str, original: &str) -> String {
  let Some(concept) = find_concept(type_name) else {
    return type_name.to_string();
  };

  if let Some((spelling, _)) = concept
    .rules
    .iter()
    .find(|(_, languages)| languages.contains(&language))
  {
    return (*spelling).to_string();
  }

  if let Some(alias) = concept.alias {
    // The alias may not know this language either, in which case the
    // caller's own spelling is kept.
    return resolve(language, alias, original);
  }

  concept
    .default
    .map_or_else(|| original.to_string(), ToString::to_string)
}

/// Wrap an already mapped type in the nullable form of `language`.
///
/// Languages without a rule have no special spelling, so the value is
/// returned as is.
#[must_use]
pub fn map_nullable(language: &str, mapped: &str) -> String {
  let Some(rule) = NULLABILITY_RULES.iter().find(|r| r.language == language)
  else {
    return mapped.to_string();
  };

  let root = mapped
    .split(['<', '[', ' '])
    .next()
    .unwrap_or(mapped);
  rule
    .exact
    .iter()
    .find(|(key, _)| *key == root)
    .map(|(_, template)| *template)
    .or(rule.default)
    .map_or_else(|| mapped.to_string(), |t| t.replacen("@@", mapped, 1))
}
