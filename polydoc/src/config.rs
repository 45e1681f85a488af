use std::{
  fs,
  path::{Path, PathBuf},
};

use indexmap::IndexMap;
use polydoc_commonmark::{
  CodeHandler,
  LanguageWrapper,
  MarkdownOptions,
  MarkdownOptionsBuilder,
};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default configuration written by `polydoc init`.
const DEFAULT_TOML: &str = r#"# polydoc configuration

# Directory containing markdown files, for `polydoc build`
# input_dir = "docs"

# Output directory for rendered HTML
output_dir = "build"

# Language documents are rendered for. Code blocks in other languages are
# removed and doc tokens are resolved for this language.
# language = "python"

# Enable GitHub Flavored Markdown (tables, strikethrough, task lists)
gfm = true

# Remove code blocks written in any other known language
filter_languages = true

# Fall back to the first language used by a document when `language` is
# unset or not used by it
default_language_to_first = true

# Number lines of code blocks with a start line, e.g. ```ruby:10
line_numbers = true

# Resolve @@docType:, @@docName:, ... tokens
doc_tokens = true

# Class prefix for `icon::name` markers in headings
icon_class_prefix = "icon-"

# Language vocabulary; leave empty for the built-in list
languages = []

# Template wrapped around every rendered code block; {slot} is the block
# language_wrapper = "<div class=\"code\">{slot}</div>"

# Number of threads for `polydoc build`
# jobs = 4

# Info strings rendered by a template instead of as code; {code} is the
# block contents
[extensions]
mermaid = "<div class=\"mermaid\">{code}</div>"
"#;

fn default_output_dir() -> PathBuf {
  PathBuf::from("build")
}

fn default_icon_class_prefix() -> String {
  "icon-".to_string()
}

const fn default_true() -> bool {
  true
}

fn default_extensions() -> IndexMap<String, String> {
  IndexMap::from([(
    "mermaid".to_string(),
    "<div class=\"mermaid\">{code}</div>".to_string(),
  )])
}

/// Configuration options for polydoc
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(
  clippy::struct_excessive_bools,
  reason = "Mirrors the processor's boolean switches"
)]
pub struct Config {
  /// Input directory containing markdown files
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub input_dir: Option<PathBuf>,

  /// Output directory for rendered documentation
  #[serde(default = "default_output_dir")]
  pub output_dir: PathBuf,

  /// Language documents are rendered for
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub language: Option<String>,

  /// Whether to enable GitHub Flavored Markdown
  #[serde(default = "default_true")]
  pub gfm: bool,

  /// Whether to remove code blocks of other languages
  #[serde(default = "default_true")]
  pub filter_languages: bool,

  /// Whether to fall back to the first language used by a document
  #[serde(default = "default_true")]
  pub default_language_to_first: bool,

  /// Whether to number lines of `lang:N` blocks
  #[serde(default = "default_true")]
  pub line_numbers: bool,

  /// Whether to resolve doc tokens
  #[serde(default = "default_true")]
  pub doc_tokens: bool,

  /// Class prefix for heading icons
  #[serde(default = "default_icon_class_prefix")]
  pub icon_class_prefix: String,

  /// Language vocabulary. Empty means the built-in list.
  #[serde(default)]
  pub languages: Vec<String>,

  /// Extension templates by info string
  #[serde(default = "default_extensions")]
  pub extensions: IndexMap<String, String>,

  /// Template wrapped around rendered code blocks
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub language_wrapper: Option<String>,

  /// Number of threads to use for parallel processing
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub jobs: Option<usize>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      input_dir:                 None,
      output_dir:                default_output_dir(),
      language:                  None,
      gfm:                       true,
      filter_languages:          true,
      default_language_to_first: true,
      line_numbers:              true,
      doc_tokens:                true,
      icon_class_prefix:         default_icon_class_prefix(),
      languages:                 Vec::new(),
      extensions:                default_extensions(),
      language_wrapper:          None,
      jobs:                      None,
    }
  }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
  match value.to_lowercase().as_str() {
    "true" | "yes" | "on" | "1" => Ok(true),
    "false" | "no" | "off" | "0" => Ok(false),
    _ => {
      Err(ConfigError::Config(format!(
        "Invalid boolean value for '{key}': '{value}'"
      )))
    },
  }
}

/// `None` for an empty value, so overrides can unset optional fields.
fn non_empty(value: &str) -> Option<String> {
  (!value.is_empty()).then(|| value.to_string())
}

impl Config {
  /// Load configuration from a file (TOML or JSON).
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if the format is
  /// unsupported.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to read config file: {}: {}",
        path.display(),
        e
      ))
    })?;

    let extension = path
      .extension()
      .and_then(|ext| ext.to_str())
      .map(str::to_lowercase);

    match extension.as_deref() {
      Some("json") => {
        serde_json::from_str(&content).map_err(|e| {
          ConfigError::Config(format!(
            "Failed to parse JSON config from {}: {}",
            path.display(),
            e
          ))
        })
      },
      Some("toml") => {
        toml::from_str(&content).map_err(|e| {
          ConfigError::Config(format!(
            "Failed to parse TOML config from {}: {}",
            path.display(),
            e
          ))
        })
      },
      Some(_) => {
        Err(ConfigError::Config(format!(
          "Unsupported config file format: {}",
          path.display()
        )))
      },
      None => {
        Err(ConfigError::Config(format!(
          "Config file has no extension: {}",
          path.display()
        )))
      },
    }
  }

  /// Load configuration from the given files (merged in order), or from a
  /// discovered config file, then apply `KEY=VALUE` overrides.
  ///
  /// # Errors
  ///
  /// Returns an error if a file cannot be loaded or an override is invalid.
  pub fn load(
    config_files: &[PathBuf],
    config_overrides: &[String],
  ) -> Result<Self, ConfigError> {
    let mut config = if let Some((first, rest)) = config_files.split_first() {
      let mut merged = Self::from_file(first)?;
      for config_path in rest {
        merged.merge(Self::from_file(config_path)?);
      }

      if config_files.len() > 1 {
        log::info!("Loaded and merged {} config files", config_files.len());
      }
      merged
    } else if let Some(discovered) = Self::find_config_file() {
      log::info!("Using discovered config file: {}", discovered.display());
      Self::from_file(&discovered)?
    } else {
      Self::default()
    };

    config.apply_overrides(config_overrides)?;
    config.validate()?;
    Ok(config)
  }

  /// Search for config files in common locations of `dir`.
  #[must_use]
  pub fn find_config_file_in(dir: &Path) -> Option<PathBuf> {
    [
      "polydoc.toml",
      "polydoc.json",
      ".polydoc.toml",
      ".polydoc.json",
      ".config/polydoc.toml",
      ".config/polydoc.json",
    ]
    .iter()
    .map(|filename| dir.join(filename))
    .find(|path| path.is_file())
  }

  /// Search for config files in the current directory.
  #[must_use]
  pub fn find_config_file() -> Option<PathBuf> {
    let current_dir = std::env::current_dir().ok()?;
    Self::find_config_file_in(&current_dir)
  }

  /// Apply configuration overrides from KEY=VALUE strings.
  ///
  /// # Errors
  ///
  /// Returns an error if an override is not in KEY=VALUE format, the key is
  /// unknown or the value cannot be parsed.
  pub fn apply_overrides(
    &mut self,
    overrides: &[String],
  ) -> Result<(), ConfigError> {
    for override_str in overrides {
      let (key, value) = override_str.split_once('=').ok_or_else(|| {
        ConfigError::Config(format!(
          "Invalid config override format: '{override_str}'. Expected \
           KEY=VALUE"
        ))
      })?;

      self.apply_override(key.trim(), value.trim())?;
    }

    Ok(())
  }

  fn apply_override(
    &mut self,
    key: &str,
    value: &str,
  ) -> Result<(), ConfigError> {
    if let Some(name) = key.strip_prefix("extensions.") {
      if value.is_empty() {
        self.extensions.shift_remove(name);
      } else {
        self.extensions.insert(name.to_string(), value.to_string());
      }
      return Ok(());
    }

    match key {
      "input_dir" => self.input_dir = non_empty(value).map(PathBuf::from),
      "output_dir" => self.output_dir = PathBuf::from(value),
      "language" => self.language = non_empty(value),
      "gfm" => self.gfm = parse_bool(key, value)?,
      "filter_languages" => self.filter_languages = parse_bool(key, value)?,
      "default_language_to_first" => {
        self.default_language_to_first = parse_bool(key, value)?;
      },
      "line_numbers" => self.line_numbers = parse_bool(key, value)?,
      "doc_tokens" => self.doc_tokens = parse_bool(key, value)?,
      "icon_class_prefix" => self.icon_class_prefix = value.to_string(),
      "languages" => {
        self.languages = value
          .split(',')
          .map(str::trim)
          .filter(|l| !l.is_empty())
          .map(ToString::to_string)
          .collect();
      },
      "language_wrapper" => self.language_wrapper = non_empty(value),
      "jobs" => {
        self.jobs = if value.is_empty() {
          None
        } else {
          Some(value.parse().map_err(|e| {
            ConfigError::Config(format!("Invalid value for 'jobs': {e}"))
          })?)
        };
      },
      _ => {
        return Err(ConfigError::Config(format!(
          "Unknown configuration key: '{key}'"
        )));
      },
    }

    Ok(())
  }

  /// Merge another config into this one, with the other config's values taking
  /// precedence.
  ///
  /// # Merge Rules
  ///
  /// - [`Option<T>`] fields: Other's [`Some`] value replaces this config's
  ///   value
  /// - [`Vec<T>`] fields: Other's entries are appended, skipping duplicates
  /// - Map fields: Other's entries are merged in, overriding individual keys
  /// - Plain fields: Other's value always replaces
  pub fn merge(&mut self, other: Self) {
    if other.input_dir.is_some() {
      self.input_dir = other.input_dir;
    }
    if other.language.is_some() {
      self.language = other.language;
    }
    if other.language_wrapper.is_some() {
      self.language_wrapper = other.language_wrapper;
    }
    if other.jobs.is_some() {
      self.jobs = other.jobs;
    }

    self.output_dir = other.output_dir;
    self.gfm = other.gfm;
    self.filter_languages = other.filter_languages;
    self.default_language_to_first = other.default_language_to_first;
    self.line_numbers = other.line_numbers;
    self.doc_tokens = other.doc_tokens;
    self.icon_class_prefix = other.icon_class_prefix;

    for language in other.languages {
      if !self.languages.contains(&language) {
        self.languages.push(language);
      }
    }
    self.extensions.extend(other.extensions);
  }

  /// Check values that cannot be expressed in the file format.
  ///
  /// # Errors
  ///
  /// Returns an error for a zero job count or an empty extension name.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.jobs == Some(0) {
      return Err(ConfigError::Config(
        "'jobs' must be at least 1".to_string(),
      ));
    }
    if self.extensions.keys().any(String::is_empty) {
      return Err(ConfigError::Config(
        "Extension names must not be empty".to_string(),
      ));
    }
    Ok(())
  }

  /// Processor options for rendering documents for `language`, or the
  /// configured language when `None`.
  #[must_use]
  pub fn markdown_options(&self, language: Option<&str>) -> MarkdownOptions {
    let mut builder = MarkdownOptionsBuilder::new()
      .gfm(self.gfm)
      .language(language.or(self.language.as_deref()))
      .filter_languages(self.filter_languages)
      .default_language_to_first(self.default_language_to_first)
      .line_numbers(self.line_numbers)
      .doc_tokens(self.doc_tokens)
      .icon_class_prefix(self.icon_class_prefix.as_str())
      .language_wrapper(
        self.language_wrapper.clone().map(LanguageWrapper::Template),
      );

    if !self.languages.is_empty() {
      builder = builder.languages(self.languages.iter().cloned());
    }

    let mut options = builder.build();
    // configured extensions replace the built-in ones entirely
    options.extensions = self
      .extensions
      .iter()
      .map(|(name, template)| {
        (name.clone(), CodeHandler::Template(template.clone()))
      })
      .collect();
    options
  }

  /// Generate a default configuration file.
  ///
  /// # Errors
  ///
  /// Returns an error if the format is unknown or the file cannot be written.
  pub fn generate_default_config(
    format: &str,
    path: &Path,
  ) -> Result<(), ConfigError> {
    let content = match format {
      "toml" => DEFAULT_TOML.to_string(),
      "json" => serde_json::to_string_pretty(&Self::default())?,
      other => {
        return Err(ConfigError::Config(format!(
          "Unsupported config format: {other}"
        )));
      },
    };

    fs::write(path, content).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to write default config to {}: {}",
        path.display(),
        e
      ))
    })?;

    log::info!("Created default configuration file: {}", path.display());
    Ok(())
  }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Fine in tests")]
mod tests {
  use super::*;

  #[test]
  fn test_default_toml_matches_default() {
    let parsed: Config = toml::from_str(DEFAULT_TOML).unwrap();
    assert_eq!(parsed, Config::default());
  }

  #[test]
  fn test_generated_configs_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    for format in ["toml", "json"] {
      let path = dir.path().join(format!("polydoc.{format}"));
      Config::generate_default_config(format, &path).unwrap();
      assert_eq!(Config::from_file(&path).unwrap(), Config::default());
    }
    assert!(
      Config::generate_default_config("yaml", &dir.path().join("x.yaml"))
        .is_err()
    );
  }

  #[test]
  fn test_from_file_rejects_unknown_formats() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("polydoc.ini");
    fs::write(&path, "language = ruby").unwrap();
    assert!(Config::from_file(&path).is_err());
    assert!(Config::from_file(dir.path().join("missing.toml")).is_err());
  }

  #[test]
  fn test_load_merges_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("a.toml");
    let second = dir.path().join("b.json");
    fs::write(
      &first,
      "language = \"ruby\"\nlanguages = [\"ruby\", \"go\"]\njobs = 2\n",
    )
    .unwrap();
    fs::write(
      &second,
      r#"{"language": "go", "languages": ["go", "rust"], "line_numbers": false}"#,
    )
    .unwrap();

    let config = Config::load(&[first, second], &[]).unwrap();
    assert_eq!(config.language.as_deref(), Some("go"));
    assert_eq!(config.languages, vec!["ruby", "go", "rust"]);
    assert_eq!(config.jobs, Some(2));
    assert!(!config.line_numbers);
  }

  #[test]
  fn test_merge_option_fields() {
    let mut base = Config {
      input_dir: Some(PathBuf::from("base-input")),
      ..Config::default()
    };
    let other = Config {
      language_wrapper: Some("<div>{slot}</div>".into()),
      ..Config::default()
    };
    base.merge(other);

    assert_eq!(base.input_dir, Some(PathBuf::from("base-input")));
    assert_eq!(base.language_wrapper.as_deref(), Some("<div>{slot}</div>"));
  }

  #[test]
  fn test_apply_overrides() {
    let mut config = Config::default();
    config
      .apply_overrides(&[
        "language=python".to_string(),
        "line_numbers=no".to_string(),
        "languages=python, ruby".to_string(),
        "jobs=3".to_string(),
        "extensions.dot=<svg>{code}</svg>".to_string(),
        "extensions.mermaid=".to_string(),
      ])
      .unwrap();

    assert_eq!(config.language.as_deref(), Some("python"));
    assert!(!config.line_numbers);
    assert_eq!(config.languages, vec!["python", "ruby"]);
    assert_eq!(config.jobs, Some(3));
    assert_eq!(config.extensions.len(), 1);
    assert_eq!(config.extensions["dot"], "<svg>{code}</svg>");
  }

  #[test]
  fn test_apply_overrides_errors() {
    let mut config = Config::default();
    assert!(config.apply_overrides(&["language".to_string()]).is_err());
    assert!(config.apply_overrides(&["colour=red".to_string()]).is_err());
    assert!(config.apply_overrides(&["gfm=maybe".to_string()]).is_err());
    assert!(config.apply_overrides(&["jobs=many".to_string()]).is_err());
  }

  #[test]
  fn test_validate() {
    let config = Config {
      jobs: Some(0),
      ..Config::default()
    };
    assert!(config.validate().is_err());
    assert!(Config::default().validate().is_ok());
  }

  #[test]
  fn test_markdown_options() {
    let config = Config {
      language: Some("ruby".into()),
      line_numbers: false,
      languages: vec!["ruby".into(), "crystal".into()],
      language_wrapper: Some("<div>{slot}</div>".into()),
      ..Config::default()
    };

    let options = config.markdown_options(None);
    assert_eq!(options.language.as_deref(), Some("ruby"));
    assert!(!options.line_numbers);
    assert_eq!(options.languages, vec!["ruby", "crystal"]);
    assert!(options.extensions.contains_key("mermaid"));
    assert!(options.language_wrapper.is_some());

    let options = config.markdown_options(Some("crystal"));
    assert_eq!(options.language.as_deref(), Some("crystal"));

    let options = Config::default().markdown_options(None);
    assert_eq!(
      options.languages.len(),
      polydoc_commonmark::DEFAULT_LANGUAGES.len()
    );
  }
}
