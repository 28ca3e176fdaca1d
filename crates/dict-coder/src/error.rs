use std::error::Error as StdError;

use dict_coder_value::ValueKind;
use thiserror::Error;

use crate::path::CodingPath;

/// Boxed caller failure carried through the coder unchanged.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// The three container shapes a context can vend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Keyed,
    Indexed,
    Single,
}

impl std::fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ContainerKind::Keyed => "keyed",
            ContainerKind::Indexed => "indexed",
            ContainerKind::Single => "single value",
        })
    }
}

#[derive(Debug, Error)]
pub enum EncodingError {
    /// A context was asked for a second container of a different shape.
    #[error("{requested} container requested at \"{path}\" after a {existing} container")]
    ContainerConflict {
        existing: ContainerKind,
        requested: ContainerKind,
        path: CodingPath,
    },
    /// A single value container was written twice.
    #[error("single value already written at \"{path}\"")]
    ValueAlreadyWritten { path: CodingPath },
    /// A value could not be rendered by the active strategy.
    #[error("invalid value at \"{path}\": {message}")]
    InvalidValue { path: CodingPath, message: String },
    #[error(transparent)]
    Custom(BoxError),
}

impl EncodingError {
    /// Wraps a caller failure, e.g. from a custom strategy.
    pub fn custom(err: impl Into<BoxError>) -> Self {
        EncodingError::Custom(err.into())
    }
}

#[derive(Debug, Error)]
pub enum DecodingError {
    /// The node present does not have the shape or tag the target requires.
    #[error("type mismatch at \"{path}\": expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: ValueKind,
        path: CodingPath,
    },
    /// A keyed or indexed lookup found no entry.
    #[error("value not found at \"{path}\": expected {expected}")]
    ValueNotFound {
        expected: &'static str,
        path: CodingPath,
    },
    #[error(transparent)]
    Custom(BoxError),
}

impl DecodingError {
    /// Wraps a caller failure, e.g. a failed invariant in a `Decode` impl.
    pub fn custom(err: impl Into<BoxError>) -> Self {
        DecodingError::Custom(err.into())
    }

    /// Path of the failing node; `None` for caller failures.
    pub fn path(&self) -> Option<&CodingPath> {
        match self {
            DecodingError::TypeMismatch { path, .. } | DecodingError::ValueNotFound { path, .. } => {
                Some(path)
            }
            DecodingError::Custom(_) => None,
        }
    }
}

/// A strftime pattern that chrono cannot interpret.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid timestamp pattern \"{0}\"")]
pub struct PatternError(pub String);
