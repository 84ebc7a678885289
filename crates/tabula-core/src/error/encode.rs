use super::Error;

/// A value could not be rendered as a SQL literal for its column.
#[derive(Debug)]
pub(super) struct EncodeError {
    column: Box<str>,
    kind: Box<str>,
    message: Box<str>,
}

impl std::error::Error for EncodeError {}

impl core::fmt::Display for EncodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "cannot encode `{}` as {}: {}",
            self.column, self.kind, self.message
        )
    }
}

impl Error {
    /// Creates an encode error for `column`, whose leaf kind is `kind`.
    pub fn encode(
        column: impl Into<String>,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::Encode(EncodeError {
            column: column.into().into(),
            kind: kind.into().into(),
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an encode error.
    pub fn is_encode(&self) -> bool {
        self.any_in_chain(|kind| matches!(kind, super::ErrorKind::Encode(_)))
    }
}
