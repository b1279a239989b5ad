//! Command-line configuration.

use crate::error::{FairsplitError, Result};
use crate::transaction::SplitPolicy;
use std::path::PathBuf;

/// How the settlement plan is written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable report.
    #[default]
    Text,
    /// `debtor,creditor,amount` rows.
    Csv,
}

/// Options for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub policy: SplitPolicy,
    pub format: OutputFormat,
    /// Print every participant's net balance before the plan.
    pub show_balances: bool,
    /// Read transactions from this file instead of stdin.
    pub input: Option<PathBuf>,
    pub help: bool,
}

impl Config {
    /// Parses the arguments that follow the program name.
    pub fn from_args<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Config::default();

        for arg in args {
            match arg.as_str() {
                "--inclusive" => config.policy = SplitPolicy::Inclusive,
                "--csv" => config.format = OutputFormat::Csv,
                "--balances" => config.show_balances = true,
                "-h" | "--help" => config.help = true,
                flag if flag.starts_with('-') && flag != "-" => {
                    return Err(FairsplitError::Usage(format!("unknown option '{}'", flag)));
                }
                path => {
                    if config.input.is_some() {
                        return Err(FairsplitError::Usage(format!(
                            "unexpected extra argument '{}'",
                            path
                        )));
                    }
                    if path != "-" {
                        config.input = Some(PathBuf::from(path));
                    }
                }
            }
        }

        if config.show_balances && config.format == OutputFormat::Csv {
            return Err(FairsplitError::Usage(
                "--balances cannot be combined with --csv".to_string(),
            ));
        }

        Ok(config)
    }
}

/// Key sequence that ends input on this platform.
pub fn eof_signal() -> &'static str {
    if cfg!(windows) {
        "Ctrl-Z"
    } else {
        "Ctrl-D"
    }
}

/// Full help text.
pub fn usage(program: &str) -> String {
    format!(
        r#"Usage: {program} [--inclusive] [--csv] [--balances] [INPUT]

Fairsplit is a program to split expenses among a group of people.
It takes a list of transactions from INPUT, or from the standard input until
EOF is encountered (which can be inserted with {eof} on this operating system.)

Transactions are entered by showing how money has flowed from one person on
behalf of others. For example, the transaction

    Ben 40.00 Ben Lila Carlos Emil

means that Ben paid 40.00 of whatever currency on behalf of Ben, Lila, Carlos,
and Emil, so that Lila, Carlos, and Emil each owe Ben 10.00.

Fairsplit also minimizes the number of transactions, for example given the
following input, only Sonia pays Reed anything:

 > Ben 45.67 Ben Reed Sonia
 > Reed 78 Sonia Ben
 > Sonia 33.2 Sonia Ben Reed
 > Ben 19.62 Sonia
 > <{eof}>

OUTSTANDING TRANSACTIONS:
Sonia must pay:
    51.71 to Reed

THANK YOU.

Options:
    --inclusive   the payer always takes a share of their own payment
    --csv         write the payments as CSV (debtor,creditor,amount)
    --balances    also print everyone's net balance (text output only)
    -h, --help    print this message

Set RUST_LOG=debug to trace every transaction and payment.
"#,
        program = program,
        eof = eof_signal()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Config> {
        Config::from_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]).unwrap();
        assert_eq!(config.policy, SplitPolicy::Exclusive);
        assert_eq!(config.format, OutputFormat::Text);
        assert!(!config.show_balances);
        assert!(config.input.is_none());
    }

    #[test]
    fn test_flags_and_path() {
        let config = parse(&["--inclusive", "trip.txt", "--balances"]).unwrap();
        assert_eq!(config.policy, SplitPolicy::Inclusive);
        assert_eq!(config.format, OutputFormat::Text);
        assert!(config.show_balances);
        assert_eq!(parse(&["--csv"]).unwrap().format, OutputFormat::Csv);
        assert_eq!(config.input, Some(PathBuf::from("trip.txt")));
    }

    #[test]
    fn test_dash_means_stdin() {
        assert!(parse(&["-"]).unwrap().input.is_none());
    }

    #[test]
    fn test_rejects_unknown_option() {
        assert!(matches!(parse(&["--bogus"]), Err(FairsplitError::Usage(_))));
    }

    #[test]
    fn test_rejects_balances_with_csv() {
        assert!(matches!(
            parse(&["--csv", "--balances"]),
            Err(FairsplitError::Usage(_))
        ));
    }

    #[test]
    fn test_rejects_two_paths() {
        assert!(matches!(parse(&["a.txt", "b.txt"]), Err(FairsplitError::Usage(_))));
    }

    #[test]
    fn test_usage_mentions_example() {
        let text = usage("fairsplit");
        assert!(text.starts_with("Usage: fairsplit"));
        assert!(text.contains("51.71 to Reed"));
    }
}
