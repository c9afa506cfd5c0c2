//! Error types for variant declaration

/// Result type for declaration operations
pub type DeclareResult<T> = Result<T, DeclareError>;

/// Errors raised while declaring a variant.
///
/// Declaration is the only fallible public operation; instantiation and
/// response serialization degrade to defaults instead of erroring.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DeclareError {
    #[error("Variant name is missing or normalizes to nothing: '{input}'")]
    MissingName { input: String },

    #[error("Variant '{name}' cannot be declared as its own ancestor (via parent '{parent}')")]
    SelfParent { name: String, parent: String },
}

impl DeclareError {
    /// Create a missing name error
    pub fn missing_name(input: &str) -> Self {
        Self::MissingName {
            input: input.to_string(),
        }
    }

    /// Create a self-parent error
    pub fn self_parent(name: &str, parent: &str) -> Self {
        Self::SelfParent {
            name: name.to_string(),
            parent: parent.to_string(),
        }
    }
}
