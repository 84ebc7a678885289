use super::Error;

#[derive(Debug)]
pub(super) struct RevisionsDisabled {
    table: Box<str>,
}

impl std::error::Error for RevisionsDisabled {}

impl core::fmt::Display for RevisionsDisabled {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "table `{}` is not configured for revisions", self.table)
    }
}

impl Error {
    /// Creates an error for a revision recorded against a table whose
    /// revisions are disabled.
    pub fn revisions_disabled(table: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::RevisionsDisabled(RevisionsDisabled {
            table: table.into().into(),
        }))
    }

    /// Returns `true` if this error is a revisions disabled error.
    pub fn is_revisions_disabled(&self) -> bool {
        self.any_in_chain(|kind| matches!(kind, super::ErrorKind::RevisionsDisabled(_)))
    }
}
