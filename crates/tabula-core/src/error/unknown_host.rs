use super::Error;

#[derive(Debug)]
pub(super) struct UnknownHost {
    host: Box<str>,
}

impl std::error::Error for UnknownHost {}

impl core::fmt::Display for UnknownHost {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "unknown host `{}`", self.host)
    }
}

impl Error {
    /// Creates an error for a table whose host has no registered driver.
    pub fn unknown_host(host: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnknownHost(UnknownHost {
            host: host.into().into(),
        }))
    }

    /// Returns `true` if this error is an unknown host error.
    pub fn is_unknown_host(&self) -> bool {
        self.any_in_chain(|kind| matches!(kind, super::ErrorKind::UnknownHost(_)))
    }
}
