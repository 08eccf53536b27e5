//! Error types crossing the analysis boundary.
//!
//! Only two things can abort a run: a transfer relation that cannot handle an
//! edge, and a cooperative shutdown request. Pruning (a `None` from precision
//! adjustment, a positive stop or forced-covering answer) is normal control
//! flow and never shows up here.

use std::fmt;

/// A transfer relation could not compute the successors of a state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferError {
    /// Identity of the offending edge or location.
    pub location: String,
    /// Human-readable cause.
    pub reason: String,
}

impl TransferError {
    pub fn new(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot compute successors at {}: {}", self.location, self.reason)
    }
}

impl std::error::Error for TransferError {}

/// Error type for analysis runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CpaError {
    /// Transfer relation failure.
    Transfer(TransferError),
    /// Shutdown was requested.
    Interrupted,
}

impl CpaError {
    /// Whether this error stems from a shutdown request rather than a domain failure.
    pub fn is_interrupted(&self) -> bool {
        matches!(self, CpaError::Interrupted)
    }
}

impl From<TransferError> for CpaError {
    fn from(e: TransferError) -> Self {
        CpaError::Transfer(e)
    }
}

impl fmt::Display for CpaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CpaError::Transfer(e) => write!(f, "Transfer error: {}", e),
            CpaError::Interrupted => write!(f, "Analysis interrupted"),
        }
    }
}

impl std::error::Error for CpaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CpaError::Transfer(e) => Some(e),
            CpaError::Interrupted => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CpaError>;
