use super::Error;

/// A filter named a column the table does not have, or an operator object
/// held something other than exactly one known operator.
#[derive(Debug)]
pub(super) struct InvalidFilterKey {
    table: Box<str>,
    key: Box<str>,
}

impl std::error::Error for InvalidFilterKey {}

impl core::fmt::Display for InvalidFilterKey {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "invalid filter key `{}` for table `{}`",
            self.key, self.table
        )
    }
}

impl Error {
    /// Creates an invalid filter key error.
    pub fn invalid_filter_key(table: impl Into<String>, key: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidFilterKey(InvalidFilterKey {
            table: table.into().into(),
            key: key.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid filter key error.
    pub fn is_invalid_filter_key(&self) -> bool {
        self.any_in_chain(|kind| matches!(kind, super::ErrorKind::InvalidFilterKey(_)))
    }
}
