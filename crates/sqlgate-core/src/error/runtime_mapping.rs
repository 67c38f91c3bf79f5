use super::Error;

/// Error when a lookup against otherwise valid metadata fails.
///
/// Unknown columns, relationship properties and discriminators end up
/// here. The message lists what *is* available so the caller can fix the
/// criteria.
#[derive(Debug)]
pub(super) struct RuntimeMappingError {
    message: Box<str>,
}

impl std::error::Error for RuntimeMappingError {}

impl core::fmt::Display for RuntimeMappingError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "mapping failed: {}", self.message)
    }
}

impl Error {
    /// Creates a runtime mapping error.
    pub fn runtime_mapping(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::RuntimeMapping(RuntimeMappingError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is a runtime mapping error.
    pub fn is_runtime_mapping(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::RuntimeMapping(_))
    }
}
