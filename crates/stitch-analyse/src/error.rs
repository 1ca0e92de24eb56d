//! Error types for structural queries
//!
//! All variants are programmer-input errors: the caller asked a question the
//! source cannot answer. Nothing here is retried or logged away — errors
//! propagate synchronously and the source text is never partially modified.

/// Structural query errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalyseError {
    /// An operation assumed at least one method exists but none was found.
    /// Guard with [`ClassAnalyser::class_has_methods`] or fall back to
    /// appending at the end of the class body.
    ///
    /// [`ClassAnalyser::class_has_methods`]: crate::ClassAnalyser::class_has_methods
    #[error("no method found in class")]
    NoMethodFound,

    /// No method with the requested name exists in the class.
    #[error("method `{name}` not found in class")]
    NamedMethodNotFound {
        /// The method name that was searched for
        name: String,
    },

    /// The source contains no class keyword, so class-relative anchors
    /// cannot be resolved. Single-class input is otherwise unvalidated.
    #[error("no class declaration found in source")]
    ClassDeclarationNotFound,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            AnalyseError::NoMethodFound.to_string(),
            "no method found in class"
        );
        assert_eq!(
            AnalyseError::NamedMethodNotFound {
                name: "bar".to_string()
            }
            .to_string(),
            "method `bar` not found in class"
        );
    }
}
