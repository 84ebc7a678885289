use super::Error;

/// A revision was recorded without one of the fields the table requires.
#[derive(Debug)]
pub(super) struct MissingRevisionField {
    table: Box<str>,
    field: Box<str>,
}

impl std::error::Error for MissingRevisionField {}

impl core::fmt::Display for MissingRevisionField {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "revision for table `{}` is missing required field `{}`",
            self.table, self.field
        )
    }
}

impl Error {
    /// Creates a missing revision field error.
    pub fn missing_revision_field(table: impl Into<String>, field: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::MissingRevisionField(MissingRevisionField {
            table: table.into().into(),
            field: field.into().into(),
        }))
    }

    /// Returns `true` if this error is a missing revision field error.
    pub fn is_missing_revision_field(&self) -> bool {
        self.any_in_chain(|kind| matches!(kind, super::ErrorKind::MissingRevisionField(_)))
    }
}
