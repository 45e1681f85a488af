#![allow(
  clippy::expect_used,
  clippy::unwrap_used,
  clippy::panic,
  reason = "Fine in tests"
)]
use polydoc_commonmark::{
  process_doc_tokens,
  tokens::{
    casing::camel_case,
    compose_type,
    map_type,
    replace_doc_globals,
    replace_doc_names,
    replace_doc_types,
    table::TYPE_CONCEPTS,
  },
};

#[test]
fn test_csharp_array_becomes_brackets() {
  assert_eq!(
    replace_doc_types("csharp", false, "@@docType:Array<String>"),
    "<dfn class=\"doc-type\">string[]</dfn>"
  );
}

#[test]
fn test_java_generic_is_escaped() {
  assert_eq!(
    replace_doc_types("java", false, "@@docType:List<Integer>"),
    "<dfn class=\"doc-type\">List&lt;Integer&gt;</dfn>"
  );
}

#[test]
fn test_nullable_wrapping() {
  assert_eq!(
    replace_doc_types("csharp", true, "@@docType:Integer?"),
    "Nullable&lt;int&gt;"
  );
  assert_eq!(replace_doc_types("java", true, "@@docType:Integer?"), "Integer");
}

#[test]
fn test_global_namespace_per_language() {
  assert_eq!(
    replace_doc_globals("javascript", true, "@@docGlobal:Challenge.foo"),
    "foo"
  );
  assert_eq!(
    replace_doc_globals("csharp", true, "@@docGlobal:Challenge.foo"),
    "Challenge.foo"
  );
}

#[test]
fn test_camel_case() {
  assert_eq!(camel_case("foo_bar", false), "fooBar");
  assert_eq!(camel_case("foo_bar", true), "FooBar");
}

#[test]
fn test_every_declared_spelling_is_returned() {
  for concept in TYPE_CONCEPTS {
    for (spelling, languages) in concept.rules {
      for language in *languages {
        // the first rule listing a language wins
        let first = concept
          .rules
          .iter()
          .find(|(_, langs)| langs.contains(language))
          .map(|(s, _)| *s);
        if first == Some(*spelling) {
          assert_eq!(
            map_type(language, concept.name),
            *spelling,
            "{} in {language}",
            concept.name
          );
        }
      }
    }
  }
}

#[test]
fn test_unknown_types_pass_through() {
  assert_eq!(map_type("ruby", "FileHandle"), "FileHandle");
  assert_eq!(compose_type("ruby", "FileHandle<Token>"), "FileHandle<Token>");
}

#[test]
fn test_name_styles() {
  let text = "@@docConst:max_size @@docMethod:open_files @@docParam:file_name";
  assert_eq!(
    replace_doc_names("csharp", true, text),
    "MAX_SIZE OpenFiles fileName"
  );
  assert_eq!(
    replace_doc_names("php", true, text),
    "MAX_SIZE openFiles $fileName"
  );
  assert_eq!(
    replace_doc_names("ruby", true, text),
    "MAX_SIZE open_files file_name"
  );
  assert_eq!(
    replace_doc_names("clojure", true, "@@docName:open_files"),
    "open-files"
  );
}

#[test]
fn test_code_spans_keep_their_shell() {
  assert_eq!(
    process_doc_tokens(Some("java"), false, "Call `@@docName:open_files`."),
    "Call `openFiles`."
  );
  assert_eq!(
    process_doc_tokens(Some("csharp"), false, "<code>@@docType:Integer</code>"),
    "<code>int</code>"
  );
}

#[test]
fn test_pipeline_is_idempotent() {
  let text = "@@docGlobal:Challenge.@@docMethod:open_files(@@docName:ext: \
              @@docType:Array<String>) returns @@docType:Hash<String, \
              Integer?>";
  for language in ["csharp", "java", "ruby", "python", "typescript", "go"] {
    for pre in [true, false] {
      let once = process_doc_tokens(Some(language), pre, text);
      let twice = process_doc_tokens(Some(language), pre, &once);
      assert_eq!(once, twice, "{language} pre={pre}");
      assert!(!once.contains("@@doc"), "{language}: {once}");
    }
  }
}

#[test]
fn test_text_without_tokens_is_untouched() {
  let html = "<p>Nothing <em>to</em> see &amp; here.</p>";
  assert_eq!(process_doc_tokens(Some("ruby"), false, html), html);
}
