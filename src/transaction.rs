//! Expense transactions and the line format they are entered in.

use crate::amount::Amount;
use crate::error::LineError;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Largest amount accepted on a single line.
const MAX_AMOUNT: i64 = 1_000_000_000_000;

/// One recorded expense: `payer` advanced `amount` on behalf of `beneficiaries`.
///
/// Only constructible through [`Transaction::new`], so every instance has a
/// positive amount and at least one beneficiary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    payer: String,
    amount: Amount,
    beneficiaries: Vec<String>,
}

impl Transaction {
    /// Creates a validated transaction.
    pub fn new(
        payer: impl Into<String>,
        amount: Amount,
        beneficiaries: Vec<String>,
    ) -> Result<Self, LineError> {
        if beneficiaries.is_empty() {
            return Err(LineError::TooFewFields { found: 2 });
        }
        if !amount.is_positive() || amount.as_decimal() > Decimal::from(MAX_AMOUNT) {
            return Err(LineError::AmountOutOfRange {
                token: amount.to_string(),
            });
        }

        Ok(Transaction {
            payer: payer.into(),
            amount,
            beneficiaries,
        })
    }

    pub fn payer(&self) -> &str {
        &self.payer
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn beneficiaries(&self) -> &[String] {
        &self.beneficiaries
    }
}

/// Whether the payer takes a share of their own payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitPolicy {
    /// The amount is shared among the listed beneficiaries only. A payer who
    /// lists themself is credited a share like anyone else.
    #[default]
    Exclusive,

    /// The payer is added to the sharing parties unless already listed.
    Inclusive,
}

impl SplitPolicy {
    /// Returns the names that each receive one share of `tx`, in entry order.
    ///
    /// A name listed twice appears twice.
    pub fn sharing_parties<'a>(&self, tx: &'a Transaction) -> Vec<&'a str> {
        let mut parties: Vec<&str> = tx.beneficiaries.iter().map(String::as_str).collect();
        if *self == SplitPolicy::Inclusive && !parties.contains(&tx.payer.as_str()) {
            parties.push(tx.payer.as_str());
        }
        parties
    }
}

/// Parses one input line of the form `<Person> <Sum> <Person> [Person...]`.
///
/// Returns `Ok(None)` for blank lines and `#` comments.
pub fn parse_line(line: &str) -> Result<Option<Transaction>, LineError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let fields: Vec<&str> = trimmed.split_whitespace().collect();
    if fields.len() < 3 {
        return Err(LineError::TooFewFields {
            found: fields.len(),
        });
    }

    let token = fields[1];
    let amount = Amount::from_str(token).map_err(|_| LineError::InvalidAmount {
        token: token.to_string(),
    })?;

    let beneficiaries = fields[2..].iter().map(|s| s.to_string()).collect();
    Transaction::new(fields[0], amount, beneficiaries)
        .map(Some)
        .map_err(|e| match e {
            LineError::AmountOutOfRange { .. } => LineError::AmountOutOfRange {
                token: token.to_string(),
            },
            other => other,
        })
}
