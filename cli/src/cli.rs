//! # CLI Interface
//!
//! Defines the command-line argument structure for `mark-cli` using
//! `clap` derive. Subcommands: `keygen`, `inspect`, `asset`, `decode`
//! and `version`.

use clap::{Parser, Subcommand, ValueEnum};

use crate::logging::LogFormat;

/// MARK Protocol developer tool.
///
/// Generates keys, inspects WIF strings, does asset arithmetic and decodes
/// wire messages. Holds no state between invocations.
#[derive(Parser, Debug)]
#[command(
    name = "mark-cli",
    about = "MARK Protocol developer tool",
    version,
    propagate_version = true
)]
pub struct MarkCli {
    /// Default log filter when `RUST_LOG` is not set.
    #[arg(long, global = true, env = "MARK_LOG", default_value = "warn")]
    pub log_level: String,

    /// Raise protocol logging: `-v` for debug, `-vv` for trace.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log output format. Logs always go to stderr.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a fresh keypair and print its WIFs and address.
    Keygen(KeygenArgs),
    /// Identify a WIF string and print everything derivable from it.
    Inspect(InspectArgs),
    /// Evaluate an asset expression, e.g. `asset mul "1.50000 MARK" "2.00000 MARK"`.
    Asset(AssetArgs),
    /// Decode a hex-encoded RPC message.
    Decode(DecodeArgs),
    /// Print version information and exit.
    Version,
}

#[derive(Parser, Debug)]
pub struct KeygenArgs {
    /// Print JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Private key, public key or script hash WIF.
    pub wif: String,

    /// Print JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct AssetArgs {
    #[arg(value_enum)]
    pub op: AssetOp,

    /// Left operand, e.g. "10.00000 MARK".
    pub lhs: String,

    /// Right operand. An asset for add/sub/mul/div/cmp, an integer exponent
    /// for pow.
    pub rhs: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AssetOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Cmp,
}

#[derive(Parser, Debug)]
pub struct DecodeArgs {
    /// Message bytes as hex. A leading `0x` is accepted.
    pub hex: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        // Ensures the derive macros produce a valid CLI definition.
        MarkCli::command().debug_assert();
    }

    #[test]
    fn parses_asset_subcommand() {
        let cli = MarkCli::try_parse_from([
            "mark-cli",
            "asset",
            "pow",
            "1.00000 MARK",
            "3",
        ])
        .unwrap();
        match cli.command {
            Commands::Asset(args) => {
                assert_eq!(args.op, AssetOp::Pow);
                assert_eq!(args.rhs, "3");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn log_format_flag_is_global() {
        let cli =
            MarkCli::try_parse_from(["mark-cli", "keygen", "--log-format", "json"]).unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
        assert_eq!(cli.log_level, "warn");
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn verbose_flag_counts() {
        let cli = MarkCli::try_parse_from(["mark-cli", "-vv", "version"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.log_format, LogFormat::Compact);
    }
}
