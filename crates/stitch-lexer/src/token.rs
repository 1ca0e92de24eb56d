//! Token model for structural queries
//!
//! Provides [`Token`], [`TokenKind`] and [`TokenStream`] — the flat,
//! line-tagged lexical units every structural query operates on. There is
//! deliberately no tree structure here: brace-depth tracking over the flat
//! stream is the whole analysis model.

use std::fmt::{self, Display, Formatter};
use std::ops::Index;
use std::sync::Arc;

/// Lexical classification of a [`Token`]
///
/// The set is intentionally narrow: only the kinds the structural queries
/// distinguish get their own variant, everything else lands in
/// [`TokenKind::Punct`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Horizontal whitespace (spaces, tabs, lone carriage returns)
    Whitespace,
    /// A single line break (`\n` or `\r\n`)
    Newline,
    /// Documentation comment block (`/** … */`)
    DocComment,
    /// Any other comment (`// …`, `# …`, `/* … */`)
    Comment,
    /// `function` keyword
    Function,
    /// `class` keyword
    Class,
    /// `namespace` keyword
    Namespace,
    /// `use` import keyword
    Use,
    /// `implements` keyword
    Implements,
    /// `final` modifier
    Final,
    /// `abstract` modifier
    Abstract,
    /// `public` modifier
    Public,
    /// `private` modifier
    Private,
    /// `protected` modifier
    Protected,
    /// `static` modifier
    Static,
    /// Bare name (class, method, interface, namespace segment, …)
    Identifier,
    /// Variable (`$name`)
    Variable,
    /// Numeric literal
    Number,
    /// Structural `{`
    OpenBrace,
    /// Structural `}`
    CloseBrace,
    /// A `{` opening a `{$…}` interpolation inside a double-quoted literal.
    /// Literal text is `{`, but the kind records the string context.
    InterpOpen,
    /// A literal `"` delimiting a double-quoted string
    DoubleQuote,
    /// Plain text inside a double-quoted string
    StringFragment,
    /// Complete single-quoted string literal, quotes included
    StringLiteral,
    /// Opening `<?php` tag
    OpenTag,
    /// Any other punctuation, one character per token
    Punct,
}

impl TokenKind {
    /// True for the declaration-modifier keywords that may sit between a
    /// method's doc comment and its `function` keyword.
    #[inline]
    #[must_use]
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            Self::Final
                | Self::Abstract
                | Self::Public
                | Self::Private
                | Self::Protected
                | Self::Static
        )
    }

    /// True for whitespace and line breaks.
    #[inline]
    #[must_use]
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::Whitespace | Self::Newline)
    }

    /// True for kinds whose text is opaque content, not code: braces inside
    /// these must never affect depth counting.
    #[inline]
    #[must_use]
    pub fn is_opaque(self) -> bool {
        matches!(
            self,
            Self::StringFragment | Self::StringLiteral | Self::Comment | Self::DocComment
        )
    }
}

/// One lexical unit: kind, literal text and the 1-based line it begins on
///
/// Tokens are immutable once produced. Multi-line tokens (comments, string
/// fragments) keep the line of their first character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Lexical classification
    pub kind: TokenKind,
    /// Exact source text of the token
    pub text: String,
    /// 1-based line on which the token begins
    pub line: usize,
}

impl Token {
    /// Create a new token.
    #[inline]
    #[must_use]
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
        }
    }

    /// True when this token increments brace depth.
    ///
    /// Depth counting is normalized on literal text, not kind: an
    /// interpolation `{` counts exactly like a structural one, because its
    /// closing `}` is emitted as a plain [`TokenKind::CloseBrace`]. Opaque
    /// token contents never count.
    #[inline]
    #[must_use]
    pub fn opens_brace(&self) -> bool {
        self.text == "{" && !self.kind.is_opaque()
    }

    /// True when this token decrements brace depth.
    #[inline]
    #[must_use]
    pub fn closes_brace(&self) -> bool {
        self.text == "}" && !self.kind.is_opaque()
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?})@{}", self.kind, self.text, self.line)
    }
}

/// Immutable ordered token sequence, indexable by position
///
/// Produced once per distinct source text and shared via [`Arc`]; two queries
/// against textually identical sources observe the same stream content.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Wrap a token vector.
    #[inline]
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    /// Token at `index`, if any.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// Number of tokens.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True when the stream holds no tokens.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Iterate over the tokens in order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// Borrow the tokens as a slice.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    /// Position of the first token of `kind`.
    #[inline]
    #[must_use]
    pub fn position_of(&self, kind: TokenKind) -> Option<usize> {
        self.tokens.iter().position(|t| t.kind == kind)
    }

    /// True when any token is of `kind`.
    #[inline]
    #[must_use]
    pub fn contains_kind(&self, kind: TokenKind) -> bool {
        self.position_of(kind).is_some()
    }

    /// Share the stream.
    #[inline]
    #[must_use]
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl Index<usize> for TokenStream {
    type Output = Token;

    fn index(&self, index: usize) -> &Token {
        &self.tokens[index]
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
