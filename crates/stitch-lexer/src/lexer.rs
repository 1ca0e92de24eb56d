//! Single-pass scanner producing line-tagged tokens
//!
//! The scanner is a small state machine over the raw text. It never fails:
//! truncated or malformed input yields a best-effort token sequence to end of
//! input, which is all the structural queries need.
//!
//! Double-quoted strings get special treatment because interpolation braces
//! are real tokens in the modelled language: `"{$x}"` lexes as
//! `DoubleQuote, InterpOpen, Variable, CloseBrace, DoubleQuote`, while a
//! plain `"{"` keeps its brace inside an opaque `StringFragment`. Depth
//! counting downstream relies on exactly this split.

use crate::token::{Token, TokenKind, TokenStream};

/// Tokenize `source` into a line-tagged [`TokenStream`].
///
/// Pure function of the text; line numbers are 1-based and count `\n`
/// occurrences exactly as they appear in `source`.
#[must_use]
pub fn tokenize(source: &str) -> TokenStream {
    let mut scanner = Scanner::new(source);
    let mut out = Vec::new();
    while !scanner.at_end() {
        scanner.lex_token(&mut out);
    }
    tracing::trace!(tokens = out.len(), "tokenized source");
    TokenStream::new(out)
}

/// Cursor over the raw text with line tracking
struct Scanner<'src> {
    src: &'src str,
    pos: usize,
    line: usize,
}

impl<'src> Scanner<'src> {
    fn new(src: &'src str) -> Self {
        Self { src, pos: 0, line: 1 }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn rest(&self) -> &'src str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Consume one char, advancing the line counter on `\n`.
    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    /// Consume chars while `pred` holds, returning the consumed text.
    fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> &'src str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.bump();
        }
        &self.src[start..self.pos]
    }

    /// Lex one construct, pushing one or more tokens.
    fn lex_token(&mut self, out: &mut Vec<Token>) {
        if self.peek() == Some('"') {
            self.lex_double_quoted(out);
        } else {
            let token = self.lex_simple();
            out.push(token);
        }
    }

    /// Lex a single token for every construct except double-quoted strings.
    fn lex_simple(&mut self) -> Token {
        let line = self.line;
        let rest = self.rest();

        if rest.starts_with("\r\n") {
            self.bump();
            self.bump();
            return Token::new(TokenKind::Newline, "\r\n", line);
        }

        if rest.starts_with("<?php") {
            for _ in 0..5 {
                self.bump();
            }
            return Token::new(TokenKind::OpenTag, "<?php", line);
        }

        if rest.starts_with("/**") {
            return Token::new(TokenKind::DocComment, self.eat_block_comment(), line);
        }

        if rest.starts_with("/*") {
            return Token::new(TokenKind::Comment, self.eat_block_comment(), line);
        }

        if rest.starts_with("//") || rest.starts_with('#') {
            let text = self.eat_while(|c| c != '\n');
            return Token::new(TokenKind::Comment, text, line);
        }

        let c = self.peek().unwrap_or('\0');
        match c {
            '\n' => {
                self.bump();
                Token::new(TokenKind::Newline, "\n", line)
            }
            ' ' | '\t' | '\r' => {
                let text = self.eat_while(|c| c == ' ' || c == '\t' || c == '\r');
                Token::new(TokenKind::Whitespace, text, line)
            }
            '\'' => Token::new(TokenKind::StringLiteral, self.eat_single_quoted(), line),
            '{' => {
                self.bump();
                Token::new(TokenKind::OpenBrace, "{", line)
            }
            '}' => {
                self.bump();
                Token::new(TokenKind::CloseBrace, "}", line)
            }
            '$' if is_ident_start(second_char(rest)) => {
                self.bump();
                let name = self.eat_while(is_ident_continue);
                Token::new(TokenKind::Variable, format!("${name}"), line)
            }
            c if is_ident_start(Some(c)) => {
                let word = self.eat_while(is_ident_continue);
                Token::new(keyword_kind(word).unwrap_or(TokenKind::Identifier), word, line)
            }
            c if c.is_ascii_digit() => {
                let text = self.eat_while(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_');
                Token::new(TokenKind::Number, text, line)
            }
            other => {
                self.bump();
                Token::new(TokenKind::Punct, other.to_string(), line)
            }
        }
    }

    /// Consume a `/* … */` block, tolerating a missing terminator.
    fn eat_block_comment(&mut self) -> &'src str {
        let start = self.pos;
        self.bump();
        self.bump();
        while !self.at_end() {
            if self.rest().starts_with("*/") {
                self.bump();
                self.bump();
                break;
            }
            self.bump();
        }
        &self.src[start..self.pos]
    }

    /// Consume a single-quoted literal including its quotes.
    fn eat_single_quoted(&mut self) -> &'src str {
        let start = self.pos;
        self.bump();
        while let Some(c) = self.bump() {
            match c {
                '\\' => {
                    self.bump();
                }
                '\'' => break,
                _ => {}
            }
        }
        &self.src[start..self.pos]
    }

    /// Lex a double-quoted literal into delimiter, fragment and
    /// interpolation tokens.
    fn lex_double_quoted(&mut self, out: &mut Vec<Token>) {
        let line = self.line;
        self.bump();
        out.push(Token::new(TokenKind::DoubleQuote, "\"", line));

        let mut fragment = String::new();
        let mut fragment_line = self.line;

        loop {
            let Some(c) = self.peek() else {
                // Unterminated literal: flush what we have.
                flush_fragment(out, &mut fragment, fragment_line);
                return;
            };

            match c {
                '"' => {
                    flush_fragment(out, &mut fragment, fragment_line);
                    let quote_line = self.line;
                    self.bump();
                    out.push(Token::new(TokenKind::DoubleQuote, "\"", quote_line));
                    return;
                }
                '\\' => {
                    if fragment.is_empty() {
                        fragment_line = self.line;
                    }
                    fragment.push('\\');
                    self.bump();
                    if let Some(escaped) = self.bump() {
                        fragment.push(escaped);
                    }
                }
                '{' if second_char(self.rest()) == Some('$') => {
                    flush_fragment(out, &mut fragment, fragment_line);
                    let brace_line = self.line;
                    self.bump();
                    out.push(Token::new(TokenKind::InterpOpen, "{", brace_line));
                    self.lex_interpolation(out);
                    fragment_line = self.line;
                }
                _ => {
                    if fragment.is_empty() {
                        fragment_line = self.line;
                    }
                    fragment.push(c);
                    self.bump();
                }
            }
        }
    }

    /// Lex the body of a `{$…}` interpolation until its matching `}`.
    ///
    /// The opening brace has already been emitted; inner tokens lex exactly
    /// as they would outside a string, so the closing brace lands as a plain
    /// [`TokenKind::CloseBrace`] and depth counting stays balanced.
    fn lex_interpolation(&mut self, out: &mut Vec<Token>) {
        let mut depth = 1usize;
        while depth > 0 && !self.at_end() {
            let before = out.len();
            self.lex_token(out);
            for token in &out[before..] {
                if token.opens_brace() {
                    depth += 1;
                } else if token.closes_brace() {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
            }
        }
    }
}

fn flush_fragment(out: &mut Vec<Token>, fragment: &mut String, line: usize) {
    if !fragment.is_empty() {
        out.push(Token::new(
            TokenKind::StringFragment,
            std::mem::take(fragment),
            line,
        ));
    }
}

fn second_char(s: &str) -> Option<char> {
    s.chars().nth(1)
}

fn is_ident_start(c: Option<char>) -> bool {
    matches!(c, Some(c) if c.is_alphabetic() || c == '_')
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Keyword lookup; the modelled language matches keywords case-insensitively.
fn keyword_kind(word: &str) -> Option<TokenKind> {
    let kind = match word.to_ascii_lowercase().as_str() {
        "function" => TokenKind::Function,
        "class" => TokenKind::Class,
        "namespace" => TokenKind::Namespace,
        "use" => TokenKind::Use,
        "implements" => TokenKind::Implements,
        "final" => TokenKind::Final,
        "abstract" => TokenKind::Abstract,
        "public" => TokenKind::Public,
        "private" => TokenKind::Private,
        "protected" => TokenKind::Protected,
        "static" => TokenKind::Static,
        _ => return None,
    };
    Some(kind)
}
