#![warn(missing_docs)]
//! Lumos specific error structures
use std::{error::Error, fmt::Display};

/// Lumos application specific Result type
pub type LumosResult<T> = std::result::Result<T, LumosError>;

/// Errors that can be returned by various LUMOS functions.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum LumosError {
    /// degenerate vectors or invalid floating point coordinates (e.g. from a malformed configuration)
    Geometry(String),
    /// invalid parameters of components, sources or the ray tracer
    Configuration(String),
    /// runtime errors occuring during a trace pass
    Trace(String),
    /// errors while reading or writing scene documents
    Document(String),
    /// errors console io
    Console(String),
    /// errors not falling in one of the categories above
    Other(String),
}

impl Display for LumosError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Geometry(m) => {
                write!(f, "Geometry:{m}")
            }
            Self::Configuration(m) => {
                write!(f, "Configuration:{m}")
            }
            Self::Trace(m) => {
                write!(f, "Trace:{m}")
            }
            Self::Document(m) => {
                write!(f, "Document:{m}")
            }
            Self::Console(m) => {
                write!(f, "Console:{m}")
            }
            Self::Other(m) => write!(f, "Lumos Error:Other:{m}"),
        }
    }
}
impl Error for LumosError {}

impl std::convert::From<String> for LumosError {
    fn from(msg: String) -> Self {
        Self::Other(msg)
    }
}
#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn from() {
        let error = LumosError::from("test".to_string());
        assert_eq!(error, LumosError::Other("test".to_string()));
    }
    #[test]
    fn display() {
        assert_eq!(
            format!("{}", LumosError::Geometry("test".to_string())),
            "Geometry:test"
        );
        assert_eq!(
            format!("{}", LumosError::Configuration("test".to_string())),
            "Configuration:test"
        );
        assert_eq!(
            format!("{}", LumosError::Trace("test".to_string())),
            "Trace:test"
        );
        assert_eq!(
            format!("{}", LumosError::Document("test".to_string())),
            "Document:test"
        );
        assert_eq!(
            format!("{}", LumosError::Console("test".to_string())),
            "Console:test"
        );
        assert_eq!(
            format!("{}", LumosError::Other("test".to_string())),
            "Lumos Error:Other:test"
        );
    }
    #[test]
    fn debug() {
        assert_eq!(
            format!("{:?}", LumosError::Trace("test".to_string())),
            "Trace(\"test\")"
        );
    }
}
