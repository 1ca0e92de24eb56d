//! Stitch Lexer
//!
//! Line-tagged lexical model for single-class sources.
//!
//! # Overview
//!
//! This crate provides:
//! - **Token / TokenKind**: flat lexical units tagged with their 1-based line
//! - **TokenStream**: immutable, indexable token sequence
//! - **tokenize**: single-pass, never-failing scanner
//!
//! The lexer models a curly-brace, class-based language (PHP-style): the
//! keywords `function`, `class`, `namespace`, `use` and `implements`, the
//! declaration modifiers, doc comments, and string literals with `{$…}`
//! interpolation. Everything else is generic punctuation — structural
//! queries downstream need nothing finer.
//!
//! # Example
//!
//! ```
//! use stitch_lexer::{tokenize, TokenKind};
//!
//! let stream = tokenize("class Foo\n{\n}\n");
//! assert!(stream.contains_kind(TokenKind::Class));
//! assert_eq!(stream.iter().find(|t| t.kind == TokenKind::CloseBrace).unwrap().line, 3);
//! ```

pub mod lexer;
pub mod token;

pub use lexer::tokenize;
pub use token::{Token, TokenKind, TokenStream};
