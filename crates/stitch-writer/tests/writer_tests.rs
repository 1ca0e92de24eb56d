//! Integration tests for the insertion operations
//!
//! Exercises the full query-then-splice path on realistic class sources,
//! including the degradation rules for methodless classes and the import
//! handling of cross-namespace interfaces.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use stitch_analyse::{AnalyseError, ClassAnalyser};
use stitch_writer::{splice, CodeWriter, WriteError};

const METHOD: &str = "public function fresh()\n{\n}\n";

const WITH_METHODS: &str = "\
class Ledger
{
    /**
     * First entry.
     */
    public function a()
    {
        $x = \"}\";
    }

    public function b()
    {
    }
}
";

fn writer() -> CodeWriter {
    CodeWriter::new()
}

#[test]
fn insert_first_lands_before_the_original_first_method() {
    let analyser = ClassAnalyser::new();
    let original_start = analyser.start_line_of_first_method(WITH_METHODS).unwrap();

    let out = writer()
        .insert_method_first_in_class(WITH_METHODS, METHOD)
        .unwrap();

    let new_start = analyser.start_line_of_first_method(&out).unwrap();
    assert!(new_start <= original_start);
    let fresh_at = out.find("function fresh").unwrap();
    let a_at = out.find("function a").unwrap();
    assert!(fresh_at < a_at);
}

#[test]
fn insert_first_keeps_doc_comment_with_its_method() {
    let out = writer()
        .insert_method_first_in_class(WITH_METHODS, METHOD)
        .unwrap();
    // The snippet goes above the doc comment, never between it and a().
    let fresh_at = out.find("function fresh").unwrap();
    let doc_at = out.find("/**").unwrap();
    assert!(fresh_at < doc_at);
}

#[test]
fn insert_last_lands_after_the_last_method() {
    let out = writer()
        .insert_method_last_in_class(WITH_METHODS, METHOD)
        .unwrap();
    let b_close = out.find("function b").unwrap();
    let fresh_at = out.find("function fresh").unwrap();
    assert!(fresh_at > b_close);
    // Still inside the class body.
    assert!(out.trim_end().ends_with('}'));
}

#[test]
fn methodless_class_first_and_last_are_identical() {
    let empty = "class Foo\n{\n}\n";
    let first = writer().insert_method_first_in_class(empty, METHOD).unwrap();
    let last = writer().insert_method_last_in_class(empty, METHOD).unwrap();
    assert_eq!(first, last);
}

#[test]
fn inserted_method_round_trips_through_the_analyser() {
    let empty = "class Foo\n{\n}\n";
    let analyser = ClassAnalyser::new();
    assert!(!analyser.class_has_methods(empty));

    let out = writer().insert_method_first_in_class(empty, METHOD).unwrap();
    assert!(analyser.class_has_methods(&out));
}

#[test]
fn methodless_class_append_precedes_closing_brace() {
    let out = writer()
        .insert_method_first_in_class("class Foo\n{\n}\n", "public function bar() {}\n")
        .unwrap();
    assert_eq!(out, "class Foo\n{\npublic function bar() {}\n}\n");
}

#[test]
fn empty_single_line_body_uses_character_splice() {
    let out = writer()
        .insert_method_last_in_class("class Foo {}", "public function bar() {}\n")
        .unwrap();
    assert_eq!(out, "class Foo {\npublic function bar() {}\n}");
}

#[test]
fn insert_after_named_method_lands_between_siblings() {
    let snippet = "public function between()\n{\n}\n";
    let out = writer()
        .insert_after_method(WITH_METHODS, "a", snippet)
        .unwrap();

    let a_at = out.find("function a(").unwrap();
    let between_at = out.find("function between(").unwrap();
    let b_at = out.find("function b(").unwrap();
    assert!(a_at < between_at);
    assert!(between_at < b_at);
}

#[test]
fn insert_after_unknown_method_propagates() {
    let err = writer()
        .insert_after_method(WITH_METHODS, "missing", METHOD)
        .unwrap_err();
    assert_eq!(
        err,
        WriteError::Analyse(AnalyseError::NamedMethodNotFound {
            name: "missing".to_string()
        })
    );
}

#[test]
fn implements_same_namespace_adds_no_import() {
    let source = "namespace Acme;\n\nclass Foo\n{\n}\n";
    let out = writer()
        .insert_implements_in_class(source, "Acme\\Payable")
        .unwrap();

    assert_eq!(
        out,
        "namespace Acme;\n\nclass Foo implements Payable\n{\n}\n"
    );
}

#[test]
fn implements_short_name_without_namespace() {
    let out = writer()
        .insert_implements_in_class("class Bar\n{\n}\n", "Baz")
        .unwrap();
    assert_eq!(out, "class Bar implements Baz\n{\n}\n");
}

#[test]
fn implements_cross_namespace_imports_after_last_use() {
    let source = "\
namespace Acme;

use Other\\Thing;

class Foo
{
}
";
    let out = writer()
        .insert_implements_in_class(source, "Contracts\\Payable")
        .unwrap();

    assert_eq!(
        out,
        "\
namespace Acme;

use Other\\Thing;
use Contracts\\Payable;

class Foo implements Payable
{
}
"
    );
    assert_eq!(out.matches("use Contracts\\Payable;").count(), 1);
}

#[test]
fn implements_cross_namespace_without_imports_goes_below_namespace() {
    let source = "namespace Acme;\n\nclass Foo\n{\n}\n";
    let out = writer()
        .insert_implements_in_class(source, "Contracts\\Payable")
        .unwrap();

    assert_eq!(
        out,
        "namespace Acme;\n\nuse Contracts\\Payable;\n\nclass Foo implements Payable\n{\n}\n"
    );
}

#[test]
fn implements_twice_joins_with_commas_in_order() {
    let source = "namespace Acme;\n\nclass Foo\n{\n}\n";
    let once = writer()
        .insert_implements_in_class(source, "Acme\\First")
        .unwrap();
    let twice = writer()
        .insert_implements_in_class(&once, "Acme\\Second")
        .unwrap();

    assert!(twice.contains("class Foo implements First, Second"));
}

#[test]
fn implements_on_wrapped_header_continues_on_new_line() {
    let source = "class Foo implements\n    Bar\n{\n}\n";
    let out = writer()
        .insert_implements_in_class(source, "Baz")
        .unwrap();
    assert_eq!(out, "class Foo implements\n    Bar,\n    Baz\n{\n}\n");
}

#[test]
fn string_braces_do_not_disturb_insertion() {
    // a()'s body holds a brace inside a string literal; b() must still be
    // the method the snippet lands after when appending last.
    let out = writer()
        .insert_method_last_in_class(WITH_METHODS, METHOD)
        .unwrap();
    let analyser = ClassAnalyser::new();
    assert_eq!(
        analyser.end_line_of_named_method(&out, "fresh").ok(),
        analyser.end_line_of_last_method(&out).ok()
    );
}

#[test]
fn interpolation_braces_stay_balanced_through_insertion() {
    let source = "\
class Greeter
{
    public function greet()
    {
        return \"hello {$this->name}!\";
    }
}
";
    let out = writer()
        .insert_method_last_in_class(source, METHOD)
        .unwrap();
    let fresh_at = out.find("function fresh").unwrap();
    let greet_at = out.find("function greet").unwrap();
    assert!(fresh_at > greet_at);
    assert!(out.trim_end().ends_with('}'));
}

#[test]
fn malformed_source_fails_before_producing_output() {
    let err = writer()
        .insert_method_first_in_class("no class here", METHOD)
        .unwrap_err();
    assert_eq!(err, WriteError::ClassBodyNotFound);
}

proptest! {
    // Splicing never loses or reorders the original document's lines.
    #[test]
    fn prop_splice_preserves_original_lines(
        lines in proptest::collection::vec("[a-z ]{0,12}", 1..8),
        snippet in "[a-z(){} ]{0,20}",
        at in 0usize..10,
        leading in any::<bool>(),
    ) {
        let target = lines.join("\n");
        let out = splice::insert_after_line(&target, &snippet, at, leading);

        let out_lines: Vec<&str> = out.split('\n').collect();
        let mut cursor = 0;
        for original in &lines {
            let found = out_lines[cursor..]
                .iter()
                .position(|l| l == original)
                .map(|p| p + cursor);
            prop_assert!(found.is_some(), "lost line {:?} in {:?}", original, out);
            // Order preserved: continue searching strictly forward.
            cursor = found.unwrap_or(cursor) + 1;
        }
    }
}
