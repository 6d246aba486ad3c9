//! Divvy CLI
//!
//! Splits expenses, records them in a JSON ledger and reports balances and
//! settlement plans.

mod store;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use divvy_core::ledger::{LedgerError, LedgerSnapshot, NewExpense};
use divvy_core::split::{ExpenseCalculator, ParticipantInput, SplitMethod};
use divvy_shared::{AppConfig, AppError};
use divvy_shared::types::UserId;

#[derive(Parser, Debug)]
#[command(name = "divvy")]
#[command(about = "Split shared expenses and settle up")]
struct Cli {
    /// Ledger file (overrides `ledger.path` from configuration).
    #[arg(long, global = true)]
    ledger: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute shares without touching the ledger.
    Split(SplitArgs),
    /// Manage group members.
    User(User),
    /// Record and list expenses.
    Expense(Expense),
    /// Show paid/owed balances.
    Balance(BalanceArgs),
    /// Show the transfers that settle the group.
    Settle(SettleArgs),
}

/// A participant as given on the command line: `ID` or `ID=VALUE`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ParticipantArg {
    user_id: UserId,
    value: Option<String>,
}

fn parse_participant(raw: &str) -> Result<ParticipantArg, String> {
    let (id, value) = match raw.split_once('=') {
        Some((id, value)) => (id, Some(value.trim().to_string())),
        None => (raw, None),
    };
    let user_id = id
        .trim()
        .parse::<UserId>()
        .map_err(|_| format!("invalid user id in participant {raw:?}"))?;
    Ok(ParticipantArg { user_id, value })
}

#[derive(Args, Debug)]
struct SplitOptions {
    /// Split method: equal, exact or percentage.
    #[arg(long)]
    method: String,
    /// Total amount, at most two decimal places.
    #[arg(long)]
    total: String,
    /// Participant as `ID`, or `ID=SHARE` / `ID=PERCENT` for exact and percentage.
    #[arg(long = "participant", required = true, value_parser = parse_participant)]
    participants: Vec<ParticipantArg>,
}

#[derive(Args, Debug)]
struct SplitArgs {
    #[command(flatten)]
    split: SplitOptions,
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    Add(UserAddArgs),
}

#[derive(Args, Debug)]
struct UserAddArgs {
    #[arg(long)]
    name: String,
}

#[derive(Args, Debug)]
struct Expense {
    #[command(subcommand)]
    command: ExpenseCommand,
}

#[derive(Subcommand, Debug)]
enum ExpenseCommand {
    Add(ExpenseAddArgs),
    List(ExpenseListArgs),
}

#[derive(Args, Debug)]
struct ExpenseAddArgs {
    /// The user who paid.
    #[arg(long)]
    creator: UserId,
    #[arg(long)]
    description: String,
    /// When the expense happened, `YYYY-MM-DDTHH:MM:SS`. Defaults to now.
    #[arg(long)]
    date: Option<NaiveDateTime>,
    #[command(flatten)]
    split: SplitOptions,
}

#[derive(Args, Debug)]
struct ExpenseListArgs {
    #[arg(long)]
    user: UserId,
}

#[derive(Args, Debug)]
struct BalanceArgs {
    /// Only this user.
    #[arg(long)]
    user: Option<UserId>,
}

#[derive(Args, Debug)]
struct SettleArgs {
    /// Print the plan as JSON.
    #[arg(long)]
    json: bool,
}

impl SplitOptions {
    fn method(&self) -> Result<SplitMethod, LedgerError> {
        Ok(self.method.parse()?)
    }

    fn participants(&self, method: SplitMethod) -> Result<Vec<ParticipantInput>, LedgerError> {
        self.participants
            .iter()
            .map(|p| {
                ParticipantInput::parse(p.user_id, method, p.value.as_deref())
                    .map_err(LedgerError::from)
            })
            .collect()
    }
}

/// Attaches the domain error code so it shows up in the rendered message.
fn domain(err: impl Into<LedgerError>) -> anyhow::Error {
    let err = err.into();
    let code = err.error_code();
    anyhow::Error::new(err).context(code)
}

fn init_tracing(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log.filter));
    let json = config.log.json;

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json().with_writer(io::stderr)))
        .with((!json).then(|| fmt::layer().with_writer(io::stderr)))
        .init();
}

fn run(cli: Cli, config: &AppConfig, out: &mut impl Write) -> anyhow::Result<()> {
    let path = cli.ledger.unwrap_or_else(|| config.ledger.path.clone());

    match cli.command {
        Command::Split(args) => {
            let method = args.split.method().map_err(domain)?;
            let total = ExpenseCalculator::parse_total(&args.split.total).map_err(domain)?;
            let participants = args.split.participants(method).map_err(domain)?;
            let result = method.split(total, &participants).map_err(domain)?;
            writeln!(out, "{}", serde_json::to_string_pretty(&result)?)?;
        }
        Command::User(User {
            command: UserCommand::Add(args),
        }) => {
            let mut ledger = store::load(&path)?;
            let id = ledger.add_user(args.name.trim());
            store::save(&path, &ledger)?;
            writeln!(out, "Added user {id} ({})", args.name.trim())?;
        }
        Command::Expense(Expense {
            command: ExpenseCommand::Add(args),
        }) => {
            let method = args.split.method().map_err(domain)?;
            let total = ExpenseCalculator::parse_total(&args.split.total).map_err(domain)?;
            let participants = args.split.participants(method).map_err(domain)?;

            let mut ledger = store::load(&path)?;
            let id = ledger
                .record_expense(NewExpense {
                    creator_id: args.creator,
                    description: args.description,
                    amount: total.to_decimal(),
                    split_method: method.to_string(),
                    date: args
                        .date
                        .unwrap_or_else(|| chrono::Local::now().naive_local()),
                    participants,
                })
                .map_err(domain)?;
            store::save(&path, &ledger)?;
            writeln!(out, "Recorded expense {id} ({total})")?;
        }
        Command::Expense(Expense {
            command: ExpenseCommand::List(args),
        }) => {
            let ledger = store::load(&path)?;
            if ledger.user(args.user).is_none() {
                return Err(domain(LedgerError::UserNotFound(args.user)));
            }
            for expense in ledger.expenses_for(args.user) {
                writeln!(
                    out,
                    "#{} {} {} {} ({}, paid by {})",
                    expense.id,
                    expense.date.format("%Y-%m-%d"),
                    expense.description,
                    expense.amount,
                    expense.split_method,
                    display_name(&ledger, expense.creator_id),
                )?;
            }
        }
        Command::Balance(args) => {
            let ledger = store::load(&path)?;
            let json = match args.user {
                Some(user) => {
                    serde_json::to_string_pretty(&ledger.user_balance(user).map_err(domain)?)?
                }
                None => serde_json::to_string_pretty(&ledger.group_balances().map_err(domain)?)?,
            };
            writeln!(out, "{json}")?;
        }
        Command::Settle(args) => {
            let ledger = store::load(&path)?;
            let transfers = ledger.settlement_plan().map_err(domain)?;

            if args.json {
                writeln!(out, "{}", serde_json::to_string_pretty(&transfers)?)?;
            } else if transfers.is_empty() {
                writeln!(out, "All settled.")?;
            } else {
                for transfer in &transfers {
                    writeln!(
                        out,
                        "{} -> {}: {}",
                        display_name(&ledger, transfer.from),
                        display_name(&ledger, transfer.to),
                        transfer.amount,
                    )?;
                }
            }
        }
    }

    Ok(())
}

fn display_name(ledger: &LedgerSnapshot, user_id: UserId) -> String {
    ledger
        .user(user_id)
        .map_or_else(|| format!("user {user_id}"), |u| u.name.clone())
}

fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match AppConfig::load().context("loading configuration") {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err:#}");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config);

    let stdout = io::stdout();
    match run(cli, &config, &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(failure_status(err))
        }
    }
}

/// Exit status for a failed command: 2 for rejected input, 3 for unknown
/// users, 1 for everything else.
fn failure_status(err: anyhow::Error) -> u8 {
    let err = match err.downcast::<LedgerError>() {
        Ok(ledger_err) => AppError::from(ledger_err),
        Err(other) => {
            tracing::debug!(error = ?other, "command failed");
            return 1;
        }
    };
    tracing::debug!(
        status = err.status_code(),
        code = err.error_code(),
        error = %err,
        "command failed"
    );

    match err {
        AppError::Validation(_) => 2,
        AppError::NotFound(_) => 3,
        AppError::Internal(_) => 1,
    }
}
