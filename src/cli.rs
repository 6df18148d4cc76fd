use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::categories::Domain;
use crate::config::Config;
use crate::conversation::{ConversationEngine, Reply};
use crate::format;
use crate::shell;
use crate::store::RecordStore;

#[derive(Parser)]
#[command(name = "baon", version, about = "Conversational allowance and budget tracker")]
pub struct Args {
    /// Override the data directory
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// User the command acts on
    #[arg(long, global = true, default_value = "default")]
    pub user: String,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive chat shell (the logging conversations live here)
    Shell,
    /// Latest school allowance summary
    SchoolSummary,
    /// Latest life expenses summary
    LifeSummary,
    /// Combined school + life + wallet overview
    OverallBalance,
    /// Wallet balance
    Balance,
    /// Add money to the wallet
    AddMoney { amount: String },
    /// Savings pattern analysis over school history
    Insights,
}

pub fn run(args: Args) -> Result<()> {
    let config = Config::new(args.data_dir.clone()).context("failed to load configuration")?;
    let store = Arc::new(
        RecordStore::open(config.ledger_file()).context("failed to open the ledger")?,
    );
    let mut engine = ConversationEngine::new(store, config.clone());
    let user = args.user.as_str();

    let replies = match args.command {
        Commands::Shell => return shell::run(engine, &config, args.user.clone()),
        Commands::SchoolSummary => engine.summary(user, Domain::School)?,
        Commands::LifeSummary => engine.summary(user, Domain::Life)?,
        Commands::OverallBalance => engine.overall_balance(user)?,
        Commands::Balance => engine.balance(user)?,
        Commands::AddMoney { ref amount } => engine.add_money(user, amount)?,
        Commands::Insights => engine.insights(user)?,
    };

    emit(&replies);
    Ok(())
}

fn emit(replies: &[Reply]) {
    for reply in replies {
        println!("{}", format::render(reply));
    }
}
