//! Line-oriented input and report output around the settlement core.
//!
//! A session reads transactions one line at a time, reports malformed lines
//! without stopping, and finally renders the settlement plan.

use crate::config::{eof_signal, Config, OutputFormat};
use crate::error::{LineError, Result};
use crate::ledger::{accumulate, Balance};
use crate::settlement::{settle, SettlementPlan};
use crate::transaction::{parse_line, SplitPolicy, Transaction};
use csv::WriterBuilder;
use log::{debug, warn};
use std::io::{BufRead, Write};

/// Collects transactions for one run.
///
/// Holds only what was entered in this run; nothing is shared between
/// sessions.
#[derive(Debug, Default)]
pub struct Session {
    policy: SplitPolicy,
    interactive: bool,
    transactions: Vec<Transaction>,
    rejected: usize,
}

impl Session {
    /// Creates a batch-mode session.
    pub fn new(policy: SplitPolicy) -> Self {
        Session {
            policy,
            interactive: false,
            transactions: Vec::new(),
            rejected: 0,
        }
    }

    /// Turns prompting on or off.
    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    /// Writes the greeting and the input format.
    pub fn write_intro<W: Write>(&self, mut out: W) -> Result<()> {
        writeln!(out, "Fairsplit – no one's cheating no one here ;-)")?;
        writeln!(out)?;
        writeln!(out, "Please enter your finance graph here.")?;
        writeln!(out)?;
        writeln!(out, "\t<Person> <Sum> <Person> [Person...]")?;
        writeln!(out)?;
        writeln!(out, "Lines have the above format, where those left of the sum")?;
        writeln!(out, "spend money on behalf of those to the right of the sum.")?;
        writeln!(out, "Finish with {}.", eof_signal())?;
        writeln!(out)?;
        Ok(())
    }

    /// Reads lines until EOF.
    ///
    /// Prompts and line errors go to `out`. A malformed line, including one
    /// that is not valid UTF-8, is reported and dropped. A read failure ends
    /// input but keeps what was read so far.
    pub fn read_transactions<R: BufRead, W: Write>(
        &mut self,
        mut reader: R,
        mut out: W,
    ) -> Result<()> {
        let mut buf = Vec::new();
        let mut line_num = 0;

        loop {
            if self.interactive {
                write!(out, "> ")?;
                out.flush()?;
            }

            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => line_num += 1,
                Err(e) => {
                    warn!("Line {}: read failed: {}", line_num + 1, e);
                    writeln!(out, "error: {}", e)?;
                    break;
                }
            }

            let parsed = std::str::from_utf8(&buf)
                .map_err(|_| LineError::InvalidEncoding)
                .and_then(parse_line);
            match parsed {
                Ok(Some(tx)) => {
                    debug!("Line {}: accepted {:?}", line_num, tx);
                    self.transactions.push(tx);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!("Line {}: {}", line_num, e);
                    writeln!(out, "error: {}", e)?;
                    self.rejected += 1;
                }
            }
        }

        if self.interactive {
            writeln!(out)?;
        }
        Ok(())
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Number of lines dropped as malformed.
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    /// Net balances of everything read so far.
    pub fn balance(&self) -> Balance {
        accumulate(&self.transactions, self.policy)
    }

    /// Settles the session and writes the report in the configured format.
    ///
    /// Nothing is written if settlement fails.
    pub fn write_report<W: Write>(&self, config: &Config, mut out: W) -> Result<()> {
        let balance = self.balance();
        let plan = settle(&balance)?;
        debug!(
            "{} transactions, {} participants, {} payments",
            self.transactions.len(),
            balance.len(),
            plan.len()
        );

        match config.format {
            OutputFormat::Text => {
                if config.show_balances {
                    write_balances(&balance, &mut out)?;
                }
                write_plan(&plan, &mut out)
            }
            OutputFormat::Csv => write_plan_csv(&plan, out),
        }
    }
}

/// Writes every participant's net balance in name order.
pub fn write_balances<W: Write>(balance: &Balance, mut out: W) -> Result<()> {
    writeln!(out, "NET BALANCES:")?;
    for (name, amount) in balance {
        writeln!(out, "    {}: {}", name, amount.display_rounded())?;
    }
    writeln!(out)?;
    Ok(())
}

/// Writes the plan as a human-readable report.
pub fn write_plan<W: Write>(plan: &SettlementPlan, mut out: W) -> Result<()> {
    if plan.is_empty() {
        writeln!(
            out,
            "ALL IS WELL: all balances are already settled, nothing to settle."
        )?;
        return Ok(());
    }

    writeln!(out, "OUTSTANDING TRANSACTIONS:")?;
    for (debtor, edges) in plan.by_debtor() {
        writeln!(out, "{} must pay:", debtor)?;
        for edge in edges {
            writeln!(
                out,
                "    {} to {}",
                edge.amount.display_rounded(),
                edge.creditor
            )?;
        }
        writeln!(out)?;
    }
    writeln!(out, "THANK YOU.")?;
    Ok(())
}

/// Writes the plan as `debtor,creditor,amount` CSV rows.
///
/// The header is written even when there are no payments.
pub fn write_plan_csv<W: Write>(plan: &SettlementPlan, out: W) -> Result<()> {
    let mut csv_writer = WriterBuilder::new().has_headers(false).from_writer(out);

    csv_writer.write_record(["debtor", "creditor", "amount"])?;
    for edge in plan {
        csv_writer.serialize(edge)?;
    }

    csv_writer.flush()?;
    Ok(())
}
