//! Structural queries over a flat token stream
//!
//! [`ClassAnalyser`] answers "where is X" questions about a single class
//! definition without building a syntax tree: method, class and namespace
//! boundaries are inferred from brace-depth tracking plus forward/backward
//! scans over the token stream.
//!
//! Every line number returned here is an insertion anchor, defined by how the
//! writer will splice against it — before-line anchors point at the line the
//! snippet must precede, after-line anchors at the line it must follow.
//!
//! Input is assumed to hold exactly one top-level class. The analyser does
//! not validate that invariant: multi-class or malformed sources get a
//! best-effort answer, not a diagnostic.

use crate::cache::TokenCache;
use crate::error::AnalyseError;
use std::sync::Arc;
use stitch_lexer::{TokenKind, TokenStream};

/// Read-only structural query layer over single-class sources
///
/// Holds the token cache; all queries are pure functions of the source text
/// and are safe to call concurrently.
#[derive(Debug, Clone, Default)]
pub struct ClassAnalyser {
    cache: TokenCache,
}

impl ClassAnalyser {
    /// Create an analyser with the default token-cache capacity.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an analyser backed by a specific cache.
    #[inline]
    #[must_use]
    pub fn with_cache(cache: TokenCache) -> Self {
        Self { cache }
    }

    /// Token stream for `class`, served through the cache.
    #[inline]
    #[must_use]
    pub fn tokens(&self, class: &str) -> Arc<TokenStream> {
        self.cache.tokens(class)
    }

    /// True iff the class declares at least one method.
    #[inline]
    #[must_use]
    pub fn class_has_methods(&self, class: &str) -> bool {
        self.tokens(class).contains_kind(TokenKind::Function)
    }

    /// Line on which the first method begins, doc comment included.
    ///
    /// A doc comment attached to the method (separated only by whitespace
    /// and declaration modifiers) moves with it, so its line wins over the
    /// `function` keyword's own line.
    ///
    /// # Errors
    /// [`AnalyseError::NoMethodFound`] when the class has no methods.
    pub fn start_line_of_first_method(&self, class: &str) -> Result<usize, AnalyseError> {
        let tokens = self.tokens(class);
        let index = tokens
            .position_of(TokenKind::Function)
            .ok_or(AnalyseError::NoMethodFound)?;
        let anchor = docblock_offset(&tokens, index);
        Ok(tokens[anchor].line)
    }

    /// After-insertion anchor for the end of the last method.
    ///
    /// Finds the class's own closing brace by depth-matching from the class
    /// keyword, then scans backward for the nearest method-closing `}` and
    /// returns the line of the token following it.
    ///
    /// # Errors
    /// [`AnalyseError::NoMethodFound`] when no method brace precedes the
    /// class end, [`AnalyseError::ClassDeclarationNotFound`] without a class
    /// keyword.
    pub fn end_line_of_last_method(&self, class: &str) -> Result<usize, AnalyseError> {
        let tokens = self.tokens(class);
        let class_close = class_end_index(&tokens)?;

        for i in (1..class_close).rev() {
            if tokens[i].kind == TokenKind::CloseBrace {
                let anchor = tokens.get(i + 1).unwrap_or(&tokens[i]);
                return Ok(anchor.line);
            }
        }

        Err(AnalyseError::NoMethodFound)
    }

    /// After-insertion anchor for the end of the method named `name`.
    ///
    /// The scan arms itself on each `function` keyword and matches the next
    /// identifier against `name`; a non-matching identifier disarms it until
    /// the next keyword. From the match, brace depth is tracked on literal
    /// brace text and the line of the token after the depth-zero close is
    /// returned.
    ///
    /// # Errors
    /// [`AnalyseError::NamedMethodNotFound`] when no method matches.
    pub fn end_line_of_named_method(
        &self,
        class: &str,
        name: &str,
    ) -> Result<usize, AnalyseError> {
        let tokens = self.tokens(class);
        let index = find_named_method(&tokens, name)?;

        match method_or_class_end(&tokens, index) {
            Some(end) => {
                let anchor = tokens.get(end).unwrap_or(&tokens[end - 1]);
                Ok(anchor.line)
            }
            // Unbalanced braces: best effort, anchor at the last token.
            None => Ok(tokens[tokens.len() - 1].line),
        }
    }

    /// True iff the class header declares an `implements` clause.
    #[inline]
    #[must_use]
    pub fn class_implements_any_interface(&self, class: &str) -> bool {
        self.tokens(class).contains_kind(TokenKind::Implements)
    }

    /// Namespace of the class, `\`-joined; empty when undeclared.
    ///
    /// Only the first namespace declaration is honored, per the single-class
    /// input invariant. Segments are the identifiers on the declaration's
    /// own line.
    #[must_use]
    pub fn class_namespace(&self, class: &str) -> String {
        let tokens = self.tokens(class);
        let Some(index) = tokens.position_of(TokenKind::Namespace) else {
            return String::new();
        };
        let line = tokens[index].line;

        tokens
            .iter()
            .skip(index + 1)
            .take_while(|t| t.line == line)
            .filter(|t| t.kind == TokenKind::Identifier)
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join("\\")
    }

    /// Line of the last import statement before the class keyword, if any.
    ///
    /// Stopping at the class keyword keeps trait imports inside the class
    /// body out of the answer.
    #[must_use]
    pub fn last_line_of_use_statements(&self, class: &str) -> Option<usize> {
        let mut last = None;
        for token in self.tokens(class).iter() {
            match token.kind {
                TokenKind::Use => last = Some(token.line),
                TokenKind::Class => return last,
                _ => {}
            }
        }
        last
    }

    /// Line of the first namespace declaration, if any.
    #[inline]
    #[must_use]
    pub fn line_of_namespace_declaration(&self, class: &str) -> Option<usize> {
        let tokens = self.tokens(class);
        tokens
            .position_of(TokenKind::Namespace)
            .map(|i| tokens[i].line)
    }

    /// Line on which the class declaration header ends.
    ///
    /// With an `implements` clause this is the line of the token immediately
    /// preceding the body's opening brace (the last interface name's line);
    /// otherwise the class keyword's own line.
    ///
    /// # Errors
    /// [`AnalyseError::ClassDeclarationNotFound`] without a class keyword.
    pub fn last_line_of_class_declaration(&self, class: &str) -> Result<usize, AnalyseError> {
        let tokens = self.tokens(class);

        if let Some(index) = tokens.position_of(TokenKind::Implements) {
            for i in index + 1..tokens.len() {
                if tokens[i].opens_brace() {
                    return Ok(tokens[i - 1].line);
                }
            }
            // No body brace after the clause: fall through to the keyword.
        }

        let index = tokens
            .position_of(TokenKind::Class)
            .ok_or(AnalyseError::ClassDeclarationNotFound)?;
        Ok(tokens[index].line)
    }
}

/// Walk backward from a `function` keyword over trivia and modifiers; an
/// immediately attached doc comment becomes the anchor, anything else keeps
/// the keyword's own index.
fn docblock_offset(tokens: &TokenStream, index: usize) -> usize {
    for i in (0..index).rev() {
        let token = &tokens[i];
        if token.kind.is_trivia() || token.kind.is_modifier() {
            continue;
        }
        if token.kind == TokenKind::DocComment {
            return i;
        }
        return index;
    }
    index
}

/// Index of the identifier naming the method `name`, using the arm/disarm
/// scan described on [`ClassAnalyser::end_line_of_named_method`].
fn find_named_method(tokens: &TokenStream, name: &str) -> Result<usize, AnalyseError> {
    let mut searching = false;

    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::Function => searching = true,
            TokenKind::Identifier if searching => {
                if token.text == name {
                    return Ok(i);
                }
                searching = false;
            }
            _ => {}
        }
    }

    Err(AnalyseError::NamedMethodNotFound {
        name: name.to_string(),
    })
}

/// Index one past the closing brace that rebalances depth from `from`.
///
/// Depth counts every token whose literal text is `{` or `}` outside opaque
/// content, interpolation braces included — their closers are plain braces,
/// so the count stays balanced. `None` when the input runs out first.
fn method_or_class_end(tokens: &TokenStream, from: usize) -> Option<usize> {
    let mut depth: i64 = 0;

    for i in from..tokens.len() {
        let token = &tokens[i];
        if token.opens_brace() {
            depth += 1;
        } else if token.closes_brace() {
            depth -= 1;
            if depth == 0 {
                return Some(i + 1);
            }
        }
    }

    None
}

/// Index of the class's own closing brace.
fn class_end_index(tokens: &TokenStream) -> Result<usize, AnalyseError> {
    let class_index = tokens
        .position_of(TokenKind::Class)
        .ok_or(AnalyseError::ClassDeclarationNotFound)?;
    let end = method_or_class_end(tokens, class_index)
        .ok_or(AnalyseError::ClassDeclarationNotFound)?;
    Ok(end - 1)
}
