//! Error types for the rxh-core library.

use thiserror::Error;

/// Main error type for the rxh library.
#[derive(Error, Debug)]
pub enum RxhError {
    /// Document extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Invoice draft mapping error.
    #[error("draft error: {0}")]
    Draft(#[from] DraftError),
}

/// Coarse classification of an [`ExtractionError`] for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidXml,
    MissingField,
    MissingNamespace,
    UnexpectedRoot,
}

/// Errors raised while turning an XML buffer into an invoice record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The buffer is not well-formed XML.
    #[error("The xml content is not valid: {message}")]
    InvalidXml {
        message: String,
        /// Byte offset where the parser gave up, when known.
        position: Option<u64>,
    },

    /// A required element (or its text) is absent. Holds the element path.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// The root does not declare a namespace needed for qualified lookups.
    #[error("missing namespace declaration: {0}")]
    MissingNamespace(String),

    /// The root element is not the expected document type.
    #[error("unexpected root element: expected {expected}, found {found}")]
    UnexpectedRoot { expected: String, found: String },
}

impl ExtractionError {
    pub(crate) fn invalid_xml(message: impl Into<String>, position: Option<u64>) -> Self {
        Self::InvalidXml {
            message: message.into(),
            position,
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidXml { .. } => ErrorKind::InvalidXml,
            Self::MissingField(_) => ErrorKind::MissingField,
            Self::MissingNamespace(_) => ErrorKind::MissingNamespace,
            Self::UnexpectedRoot { .. } => ErrorKind::UnexpectedRoot,
        }
    }
}

/// Errors related to building a supplier invoice draft.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    /// The supplier is not known and creating it was not allowed.
    #[error("The supplier {account_id} - {name} doesn't exist")]
    UnknownSupplier { account_id: String, name: String },

    /// A record value could not be converted to its typed form.
    #[error("invalid value for {field}: {value:?}")]
    InvalidValue { field: String, value: String },
}

/// Result type for the rxh library.
pub type Result<T> = std::result::Result<T, RxhError>;
