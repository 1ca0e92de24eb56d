//! Error types for insertion operations

use stitch_analyse::AnalyseError;

/// Insertion operation errors
///
/// Every operation either returns a complete new source text or fails before
/// producing any output; there are no partial commits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WriteError {
    /// A structural query the operation depends on failed.
    #[error("analysis failed: {0}")]
    Analyse(#[from] AnalyseError),

    /// The backward scan found no class body brace to append into. Reached
    /// only on malformed input; well-formed single-class sources always have
    /// one.
    #[error("no class body found in source")]
    ClassBodyNotFound,
}
