//! Token-guided source mutation
//!
//! [`CodeWriter`] turns analyser anchors into new source text: insert a
//! method first, last or after a named sibling, or add an interface to the
//! class header (importing it first when it lives in another namespace).
//!
//! Input is assumed to hold exactly one class definition. That invariant is
//! not validated; multi-class or malformed sources get best-effort output.

use crate::error::WriteError;
use crate::splice;
use stitch_analyse::ClassAnalyser;
use stitch_lexer::{TokenKind, TokenStream};

/// The two append-at-end-of-class strategies
///
/// Which one applies depends on what the backward scan past the class's
/// closing brace reaches first: a write point (the body spans lines) or the
/// opening brace itself (a single-line body with nothing to anchor a line
/// splice on).
#[derive(Debug, Clone, PartialEq, Eq)]
enum AppendPoint {
    /// Body spans lines: splice after `line`.
    AfterLine {
        line: usize,
        leading_newline: bool,
    },
    /// Single-line body: character-offset splice directly after the literal
    /// `{` located by searching for `pattern` (the brace plus everything the
    /// scan walked over) in the raw text.
    InsideBraces { pattern: String },
}

/// Mutation layer over [`ClassAnalyser`] anchors
#[derive(Debug, Clone, Default)]
pub struct CodeWriter {
    analyser: ClassAnalyser,
}

impl CodeWriter {
    /// Create a writer with its own analyser (and token cache).
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer sharing an existing analyser.
    #[inline]
    #[must_use]
    pub fn with_analyser(analyser: ClassAnalyser) -> Self {
        Self { analyser }
    }

    /// The analyser backing this writer.
    #[inline]
    #[must_use]
    pub fn analyser(&self) -> &ClassAnalyser {
        &self.analyser
    }

    /// Insert `method` as the first method of the class.
    ///
    /// The snippet lands immediately before the current first method's
    /// anchor (doc comment included); a methodless class degrades to
    /// appending at the end of the body.
    ///
    /// # Errors
    /// [`WriteError::ClassBodyNotFound`] on malformed input.
    pub fn insert_method_first_in_class(
        &self,
        class: &str,
        method: &str,
    ) -> Result<String, WriteError> {
        if !self.analyser.class_has_methods(class) {
            return self.write_at_end_of_class(class, method);
        }

        let line = self.analyser.start_line_of_first_method(class)?;
        Ok(splice::insert_before_line(class, method, line))
    }

    /// Insert `method` as the last method of the class.
    ///
    /// # Errors
    /// [`WriteError::ClassBodyNotFound`] on malformed input.
    pub fn insert_method_last_in_class(
        &self,
        class: &str,
        method: &str,
    ) -> Result<String, WriteError> {
        if self.analyser.class_has_methods(class) {
            let line = self.analyser.end_line_of_last_method(class)?;
            return Ok(splice::insert_after_line(class, method, line, true));
        }

        self.write_at_end_of_class(class, method)
    }

    /// Insert `method` directly after the method named `method_name`.
    ///
    /// # Errors
    /// [`AnalyseError::NamedMethodNotFound`] when no such method exists;
    /// callers are expected to have verified the name against the same
    /// class first.
    ///
    /// [`AnalyseError::NamedMethodNotFound`]: stitch_analyse::AnalyseError::NamedMethodNotFound
    pub fn insert_after_method(
        &self,
        class: &str,
        method_name: &str,
        method: &str,
    ) -> Result<String, WriteError> {
        let line = self.analyser.end_line_of_named_method(class, method_name)?;
        Ok(splice::insert_after_line(class, method, line, true))
    }

    /// Add `interface` to the class's implements clause.
    ///
    /// A same-namespace interface joins the header under its unqualified
    /// name. A cross-namespace one is imported first — after the last
    /// existing import, or on a fresh blank-line-preceded line under the
    /// namespace declaration — and joins under its final path segment. An
    /// existing clause is extended with a comma; a header already wrapped
    /// across lines continues on a fresh indented line instead of growing
    /// sideways.
    ///
    /// # Errors
    /// [`AnalyseError::ClassDeclarationNotFound`] when the source has no
    /// class keyword.
    ///
    /// [`AnalyseError::ClassDeclarationNotFound`]: stitch_analyse::AnalyseError::ClassDeclarationNotFound
    pub fn insert_implements_in_class(
        &self,
        class: &str,
        interface: &str,
    ) -> Result<String, WriteError> {
        let interface_namespace = namespace_of(interface);
        let class_namespace = self.analyser.class_namespace(class);
        let mut declaration_line = self.analyser.last_line_of_class_declaration(class)?;

        let mut lines: Vec<String> = class.split('\n').map(str::to_string).collect();

        let interface_name = if class_namespace == interface_namespace {
            strip_namespace(interface, &class_namespace)
        } else {
            let use_statement = format!("use {interface};");
            // Inserting import lines above the header shifts its anchor.
            if let Some(use_line) = self.analyser.last_line_of_use_statements(class) {
                lines.insert(use_line.min(lines.len()), use_statement);
                declaration_line += 1;
            } else {
                let at = self
                    .analyser
                    .line_of_namespace_declaration(class)
                    .unwrap_or(0)
                    .min(lines.len());
                lines.insert(at, use_statement);
                lines.insert(at, String::new());
                declaration_line += 2;
            }
            tracing::debug!(interface, "imported cross-namespace interface");
            short_name_of(interface).to_string()
        };

        let index = declaration_line.saturating_sub(1).min(lines.len() - 1);
        let continuation = if lines[index].contains("class ") {
            " "
        } else {
            // Header already wrapped: continue on a fresh indented line.
            "\n    "
        };

        lines[index] = if self.analyser.class_implements_any_interface(class) {
            format!("{},{}{}", lines[index], continuation, interface_name)
        } else {
            format!("{} implements {}", lines[index], interface_name)
        };

        Ok(lines.join("\n"))
    }

    /// Append `method` at the end of the class body.
    ///
    /// Used when the class has no methods to anchor on. The strategy split
    /// is described on [`AppendPoint`].
    fn write_at_end_of_class(&self, class: &str, method: &str) -> Result<String, WriteError> {
        let tokens = self.analyser.tokens(class);

        match locate_append_point(&tokens)? {
            AppendPoint::AfterLine {
                line,
                leading_newline,
            } => {
                tracing::debug!(line, "appending after line at end of class body");
                Ok(splice::insert_after_line(class, method, line, leading_newline))
            }
            AppendPoint::InsideBraces { pattern } => {
                tracing::debug!("appending inside single-line class body");
                let offset = class
                    .find(&pattern)
                    .map(|p| p + 1)
                    .ok_or(WriteError::ClassBodyNotFound)?;
                let mut out = String::with_capacity(class.len() + method.len() + 2);
                out.push_str(&class[..offset]);
                out.push('\n');
                out.push_str(splice::trim_blank(method));
                out.push('\n');
                out.push_str(&class[offset..]);
                Ok(out)
            }
        }
    }
}

/// Backward scan past the class's closing brace for the append point.
///
/// Brace tokens inside double-quoted strings are skipped via an explicit
/// in-string state toggled by the quote delimiters — string contents must
/// not terminate the scan.
fn locate_append_point(tokens: &TokenStream) -> Result<AppendPoint, WriteError> {
    let mut searching = false;
    let mut in_string = false;
    let mut pattern_parts: Vec<&str> = Vec::new();

    for i in (0..tokens.len()).rev() {
        let token = &tokens[i];

        if token.kind == TokenKind::CloseBrace && !in_string {
            searching = true;
            continue;
        }

        if !searching {
            continue;
        }

        match token.kind {
            TokenKind::DoubleQuote => in_string = !in_string,
            TokenKind::Newline => {
                return Ok(AppendPoint::AfterLine {
                    line: token.line,
                    leading_newline: false,
                });
            }
            TokenKind::Comment | TokenKind::DocComment => {
                return Ok(AppendPoint::AfterLine {
                    line: token.line,
                    leading_newline: true,
                });
            }
            _ => {
                pattern_parts.push(&token.text);
                if token.kind == TokenKind::OpenBrace {
                    pattern_parts.reverse();
                    return Ok(AppendPoint::InsideBraces {
                        pattern: pattern_parts.concat(),
                    });
                }
            }
        }
    }

    Err(WriteError::ClassBodyNotFound)
}

/// Namespace portion of a qualified name; empty when unqualified.
fn namespace_of(fqn: &str) -> String {
    match fqn.rfind('\\') {
        Some(i) => fqn[..i].to_string(),
        None => String::new(),
    }
}

/// Final path segment of a qualified name.
fn short_name_of(fqn: &str) -> &str {
    fqn.rsplit('\\').next().unwrap_or(fqn)
}

/// Qualified name with the class's own namespace prefix removed.
fn strip_namespace(fqn: &str, namespace: &str) -> String {
    if namespace.is_empty() {
        return fqn.trim_start_matches('\\').to_string();
    }
    fqn.replacen(namespace, "", 1)
        .trim_start_matches('\\')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fqn_helpers() {
        assert_eq!(namespace_of("Acme\\Contracts\\Payable"), "Acme\\Contracts");
        assert_eq!(namespace_of("Payable"), "");
        assert_eq!(short_name_of("Acme\\Contracts\\Payable"), "Payable");
        assert_eq!(short_name_of("Payable"), "Payable");
        assert_eq!(strip_namespace("Acme\\Payable", "Acme"), "Payable");
        assert_eq!(strip_namespace("Payable", ""), "Payable");
    }

    #[test]
    fn append_point_multiline_body() {
        let writer = CodeWriter::new();
        let tokens = writer.analyser().tokens("class Foo\n{\n}\n");
        let point = locate_append_point(&tokens).unwrap();
        assert_eq!(
            point,
            AppendPoint::AfterLine {
                line: 2,
                leading_newline: false
            }
        );
    }

    #[test]
    fn append_point_single_line_body() {
        let writer = CodeWriter::new();
        let tokens = writer.analyser().tokens("class Foo { }");
        let point = locate_append_point(&tokens).unwrap();
        assert_eq!(
            point,
            AppendPoint::InsideBraces {
                pattern: "{ ".to_string()
            }
        );
    }

    #[test]
    fn append_point_skips_string_braces() {
        let writer = CodeWriter::new();
        let source = "class Foo\n{\n    private $t = \"}\";\n}\n";
        let tokens = writer.analyser().tokens(source);
        // The string's brace must not become the class-close anchor.
        let point = locate_append_point(&tokens).unwrap();
        assert_eq!(
            point,
            AppendPoint::AfterLine {
                line: 3,
                leading_newline: false
            }
        );
    }

    #[test]
    fn append_point_missing_body_is_an_error() {
        let writer = CodeWriter::new();
        let tokens = writer.analyser().tokens("not a class at all");
        assert_eq!(
            locate_append_point(&tokens).unwrap_err(),
            WriteError::ClassBodyNotFound
        );
    }

    #[test]
    fn single_line_body_splices_after_brace() {
        let writer = CodeWriter::new();
        let out = writer
            .insert_method_first_in_class("class Foo {}", "public function bar() {}")
            .unwrap();
        assert_eq!(out, "class Foo {\npublic function bar() {}\n}");
    }

    #[test]
    fn comment_line_before_class_close_anchors_after_it() {
        let writer = CodeWriter::new();
        let source = "class Foo\n{\n    // marker\n}\n";
        let out = writer
            .insert_method_last_in_class(source, "public function bar() {}\n")
            .unwrap();
        assert_eq!(
            out,
            "class Foo\n{\n    // marker\npublic function bar() {}\n}\n"
        );
    }
}
