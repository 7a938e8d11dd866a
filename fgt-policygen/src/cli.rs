use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, ValueEnum};
use fgt_policygen::compiler::{AddressConflictMode, InvalidCidrMode};

#[derive(Parser, Debug)]
#[command(name = "fgt-policygen")]
#[command(about = "Generate FortiGate address, service, and policy CLI from a policy sheet")]
pub struct Cli {
    /// Increase log detail on stderr (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Compile a policy sheet and write addresses.txt, services.txt, policies.txt.
    Compile(CompileArgs),
    /// Compile a policy sheet and report problems without writing anything.
    Check(CheckArgs),
}

#[derive(Args, Debug)]
pub struct SheetArgs {
    /// Policy sheet: CSV, TSV, semicolon-separated, or a workbook (.xlsx/.xls/.ods, first sheet).
    pub input: PathBuf,
    /// Settings file (TOML). Built-in defaults are used when omitted.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Field delimiter for text sheets; sniffed from the header line when omitted.
    #[arg(long)]
    pub delimiter: Option<char>,
    /// How to treat a subnet cell that is not a valid IPv4 network.
    #[arg(long, value_enum)]
    pub on_invalid_cidr: Option<CidrFailure>,
    /// How to treat a named address given a second, different subnet.
    #[arg(long, value_enum)]
    pub on_address_conflict: Option<ConflictPolicy>,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Treat warnings as failures.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Parser, Debug)]
pub struct CompileArgs {
    #[command(flatten)]
    pub sheet: SheetArgs,
    /// Directory that receives the three artifacts (created if missing).
    #[arg(short, long, default_value = "output")]
    pub out_dir: PathBuf,
    /// Also print all generated CLI to stdout, addresses first.
    #[arg(long)]
    pub print: bool,
}

#[derive(Parser, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub sheet: SheetArgs,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum CidrFailure {
    Skip,
    Abort,
}

impl From<CidrFailure> for InvalidCidrMode {
    fn from(value: CidrFailure) -> Self {
        match value {
            CidrFailure::Skip => InvalidCidrMode::Skip,
            CidrFailure::Abort => InvalidCidrMode::Abort,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum ConflictPolicy {
    FirstWins,
    Error,
}

impl From<ConflictPolicy> for AddressConflictMode {
    fn from(value: ConflictPolicy) -> Self {
        match value {
            ConflictPolicy::FirstWins => AddressConflictMode::FirstWins,
            ConflictPolicy::Error => AddressConflictMode::Error,
        }
    }
}
