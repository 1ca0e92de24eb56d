//! Stitch Analyse
//!
//! Structural queries over tokenized single-class sources.
//!
//! # Overview
//!
//! This crate provides:
//! - **TokenCache**: bounded, content-addressed memoization of lexing
//! - **ClassAnalyser**: the "where is X" query layer — method, class,
//!   namespace and import boundaries inferred from a flat token stream
//! - **AnalyseError**: typed errors for absent structure
//!
//! Queries return insertion anchors: 1-based line numbers whose meaning is
//! defined by how the writer splices against them.
//!
//! # Example
//!
//! ```
//! use stitch_analyse::ClassAnalyser;
//!
//! let analyser = ClassAnalyser::new();
//! let class = "class Foo\n{\n    public function bar()\n    {\n    }\n}\n";
//!
//! assert!(analyser.class_has_methods(class));
//! assert_eq!(analyser.start_line_of_first_method(class), Ok(3));
//! ```

pub mod analyser;
pub mod cache;
pub mod error;

pub use analyser::ClassAnalyser;
pub use cache::{SourceHash, TokenCache, DEFAULT_CAPACITY};
pub use error::AnalyseError;
