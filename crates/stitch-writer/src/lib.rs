//! Stitch Writer
//!
//! Token-guided insertion of generated snippets into single-class sources.
//!
//! # Overview
//!
//! This crate provides:
//! - **CodeWriter**: insert a method first/last/after a named sibling, or
//!   add an implemented interface (importing it when cross-namespace)
//! - **splice**: the generic before/after line splice primitives
//! - **WriteError**: typed failures, wrapping the analyser's errors
//!
//! The writer receives raw source text and a raw snippet and returns new
//! source text. It never touches the filesystem, decides snippet content,
//! logs beyond trace-level diagnostics, or partially commits — each call
//! returns a complete document or fails first.
//!
//! # Example
//!
//! ```
//! use stitch_writer::CodeWriter;
//!
//! let writer = CodeWriter::new();
//! let out = writer
//!     .insert_method_first_in_class(
//!         "class Foo\n{\n}\n",
//!         "public function bar()\n{\n}\n",
//!     )
//!     .unwrap();
//! assert!(out.contains("function bar"));
//! ```

pub mod error;
pub mod splice;
pub mod writer;

pub use error::WriteError;
pub use writer::CodeWriter;
