use crate::Label;

pub type Result<T> = std::result::Result<T, TaxonomyError>;

/// Failures raised while reading the category graph behind a taxonomy.
///
/// None of these are fatal: the closure operations on [`crate::Taxonomy`]
/// log them and answer with an empty set, leaving the caches untouched so a
/// later call can retry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaxonomyError {
    #[error("backend query failed for `{label}`: {message}")]
    Backend { label: Label, message: String },

    #[error("label not found: {0}")]
    UnknownLabel(Label),
}

impl TaxonomyError {
    pub fn backend(label: impl Into<Label>, message: impl ToString) -> Self {
        Self::Backend {
            label: label.into(),
            message: message.to_string(),
        }
    }

    /// The label whose lookup failed.
    pub fn label(&self) -> &str {
        match self {
            Self::Backend { label, .. } => label,
            Self::UnknownLabel(label) => label,
        }
    }
}
