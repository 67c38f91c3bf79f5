use super::Error;

/// Programmer error: an operator or composite kind the compiler does not
/// know how to render.
#[derive(Debug)]
pub(super) struct InternalError {
    message: Box<str>,
}

impl std::error::Error for InternalError {}

impl core::fmt::Display for InternalError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "internal error: {}", self.message)
    }
}

impl Error {
    pub fn internal(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Internal(InternalError {
            message: message.into().into(),
        }))
    }

    pub fn is_internal(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Internal(_))
    }
}
