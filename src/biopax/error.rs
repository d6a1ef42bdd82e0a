use std::string::FromUtf8Error;

use thiserror::Error;

/// Errors that can occur while writing a BioPAX document
#[derive(Debug, Error)]
pub enum WriteError {
    /// Error when the output cannot be written
    #[error("Failed to write BioPAX document: {0}")]
    IoError(#[from] std::io::Error),

    /// Error when an XML event cannot be serialized
    #[error("Failed to serialize BioPAX document: {0}")]
    XmlError(#[from] quick_xml::Error),

    /// Error when the serialized document is not valid UTF-8
    #[error("BioPAX document is not valid UTF-8: {0}")]
    Utf8Error(#[from] FromUtf8Error),
}
