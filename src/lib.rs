//! # Fairsplit
//!
//! Splits shared expenses among a group of people and works out the fewest
//! payments needed to settle everybody's debts.
//!
//! ## Design Principles
//!
//! - **Fixed-point arithmetic**: 4 decimal places via `rust_decimal`; uneven
//!   splits hand out leftover units so every transaction conserves value exactly
//! - **Two pure stages**: [`accumulate`] folds transactions into a [`Balance`],
//!   [`settle`] turns a balance into a [`SettlementPlan`]
//! - **Strict invariants**: balances always sum to zero; the planner refuses
//!   to run otherwise
//! - **Deterministic output**: participants are processed in name order
//!
//! ## Example
//!
//! ```
//! use fairsplit::{accumulate, parse_line, settle, SplitPolicy};
//!
//! let lines = ["Ben 45.67 Ben Reed Sonia", "Reed 78 Sonia Ben",
//!              "Sonia 33.2 Sonia Ben Reed", "Ben 19.62 Sonia"];
//! let txs: Vec<_> = lines.iter().filter_map(|l| parse_line(l).ok().flatten()).collect();
//!
//! let balance = accumulate(&txs, SplitPolicy::Exclusive);
//! let plan = settle(&balance).unwrap();
//!
//! assert_eq!(plan.len(), 1);
//! assert_eq!(plan.edges()[0].debtor, "Sonia");
//! assert_eq!(plan.edges()[0].creditor, "Reed");
//! assert_eq!(plan.edges()[0].amount.display_rounded(), "51.71");
//! ```

pub mod amount;
pub mod config;
pub mod error;
pub mod ledger;
pub mod session;
pub mod settlement;
pub mod transaction;

pub use amount::Amount;
pub use config::{Config, OutputFormat};
pub use error::{FairsplitError, LineError, Result};
pub use ledger::{accumulate, Balance};
pub use session::Session;
pub use settlement::{settle, SettlementEdge, SettlementPlan};
pub use transaction::{parse_line, SplitPolicy, Transaction};
