use crate::Error;
use std::{
    borrow::Cow,
    error,
    fmt::{self, Debug, Display, Formatter},
};

/// The scope was asked to run with a malformed configuration. Raised before any I/O.
#[derive(Debug)]
pub struct PreconditionError {
    pub reason: Cow<'static, str>,
}

impl PreconditionError {
    pub fn new(reason: impl Into<Cow<'static, str>>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Display for PreconditionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid connection scope: {}", self.reason)
    }
}

impl error::Error for PreconditionError {}

/// The work failed and then releasing its connection failed too.
///
/// Both errors are kept. `primary` is the failure of the work and is also
/// exposed as [`source`](error::Error::source), `secondary` is the failure
/// raised while releasing the leased connection.
pub struct CompositeError {
    pub primary: Error,
    pub secondary: Error,
}

impl CompositeError {
    pub fn new(primary: Error, secondary: Error) -> Self {
        Self { primary, secondary }
    }
}

impl Display for CompositeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Primary failure: {}\nSecondary failure, while releasing the connection: {:#}",
            self.primary, self.secondary
        )
    }
}

impl Debug for CompositeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeError")
            .field("primary", &self.primary)
            .field("secondary", &self.secondary)
            .finish()
    }
}

impl error::Error for CompositeError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        Some(&*self.primary)
    }
}
