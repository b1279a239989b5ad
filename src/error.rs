//! Error types for fairsplit.

use crate::amount::Amount;
use thiserror::Error;

/// Result type alias for fairsplit operations
pub type Result<T> = std::result::Result<T, FairsplitError>;

/// A malformed input line.
///
/// These are recoverable: the line is reported and dropped, and reading
/// carries on with the next one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LineError {
    /// Fewer than payer, amount and one beneficiary
    #[error("invalid format, ignoring line")]
    TooFewFields { found: usize },

    /// Amount token is not a decimal number
    #[error("cannot read number {token:?}, ignoring line")]
    InvalidAmount { token: String },

    /// Line bytes are not valid UTF-8
    #[error("line is not valid UTF-8, ignoring line")]
    InvalidEncoding,

    /// Amount parsed but is zero, negative, or too large
    #[error("amount {token:?} must be positive, ignoring line")]
    AmountOutOfRange { token: String },
}

/// Errors that stop a run.
#[derive(Error, Debug)]
pub enum FairsplitError {
    /// Failed to open, read or write a stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV output error
    #[error("CSV output error: {0}")]
    Csv(#[from] csv::Error),

    /// Bad command line
    #[error("{0}")]
    Usage(String),

    /// Balances handed to the planner do not sum to zero
    #[error("balances do not sum to zero (residual {residual}), refusing to settle")]
    ConservationViolated { residual: Amount },

    /// The planner ran out of counterparts while a balance was still open
    #[error("settlement left {remaining} unsettled for {name}")]
    UnsettledResidual { name: String, remaining: Amount },
}

impl FairsplitError {
    /// Returns `true` for internal-consistency failures, as opposed to
    /// problems with the environment or the command line.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            FairsplitError::ConservationViolated { .. } | FairsplitError::UnsettledResidual { .. }
        )
    }

    /// Process exit code for this error: 2 for internal failures, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.is_internal() {
            2
        } else {
            1
        }
    }

    /// The line `main` prints to stderr before exiting.
    pub fn diagnostic(&self) -> String {
        if self.is_internal() {
            format!("internal error: {}", self)
        } else {
            format!("Error: {}", self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_error_messages() {
        assert_eq!(
            LineError::TooFewFields { found: 2 }.to_string(),
            "invalid format, ignoring line"
        );
        assert_eq!(
            LineError::InvalidAmount {
                token: "abc".to_string()
            }
            .to_string(),
            "cannot read number \"abc\", ignoring line"
        );
    }

    #[test]
    fn test_internal_errors_are_flagged() {
        let err = FairsplitError::ConservationViolated {
            residual: Amount::EPSILON,
        };
        assert!(err.is_internal());
        assert!(!FairsplitError::Usage("bad".to_string()).is_internal());
    }

    #[test]
    fn test_exit_codes() {
        let internal = FairsplitError::UnsettledResidual {
            name: "A".to_string(),
            remaining: Amount::EPSILON,
        };
        assert_eq!(internal.exit_code(), 2);
        assert_eq!(FairsplitError::Usage("bad".to_string()).exit_code(), 1);
        assert_eq!(
            FairsplitError::Io(std::io::Error::from(std::io::ErrorKind::NotFound)).exit_code(),
            1
        );
    }

    #[test]
    fn test_diagnostic_prefix() {
        let internal = FairsplitError::UnsettledResidual {
            name: "A".to_string(),
            remaining: Amount::from_units(-66),
        };
        assert_eq!(
            internal.diagnostic(),
            "internal error: settlement left -0.0066 unsettled for A"
        );
        assert_eq!(
            FairsplitError::Usage("unknown option '--x'".to_string()).diagnostic(),
            "Error: unknown option '--x'"
        );
    }
}
