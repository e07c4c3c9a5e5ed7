// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # leave-ledger
//!
//! Scheduled worker and HR administration commands for the leave ledger.
//!
//! Typical schedule:
//!
//! - `leave-ledger -d ledger.db accrue` daily
//! - `leave-ledger -d ledger.db advance` daily
//! - `leave-ledger -d ledger.db notifications` daily
//! - `leave-ledger -d ledger.db carry-over 2024` once, after the year closes
//!
//! Results are printed to stdout as JSON. Logs go to stderr and honor
//! `RUST_LOG` on top of the `-v`/`-q` flags.

#![deny(
    clippy::pedantic,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{Result, eyre::Context};
use leave_ledger_api::{EngineConfig, InMemoryDirectory, LeaveEngine, SystemClock};
use leave_ledger_domain::{
    BalanceKey, Days, DepartmentId, LeaveTypeId, LeaveTypeRegistry, LeaveTypeRules, PersonId,
    parse_date,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use time::Date;
use tracing::level_filters::LevelFilter;
use tracing::{info, warn};
use tracing_log::AsTrace;
use tracing_subscriber::EnvFilter;

type Engine = LeaveEngine<InMemoryDirectory, SystemClock>;

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(args.log_level().to_string())),
        )
        .init();

    args.run()
}

/// Leave ledger worker and administration commands
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. Created and migrated if missing.
    #[arg(short, long)]
    database: PathBuf,

    /// Engine configuration file (JSON). Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// People file (JSON list of `person_id` / `department_id` records).
    #[arg(short, long)]
    people: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Register leave types from a JSON file, skipping names already present
    SeedTypes {
        /// JSON list of `{ name, rules, is_active }` records
        file: PathBuf,
    },

    /// Set the annual grant and accrual rate of a balance
    Allocate {
        person: i64,
        leave_type: i64,
        year: i32,
        days: Days,
        /// Days credited per accrual period
        #[arg(long, default_value = "0")]
        monthly: Days,
    },

    /// Credit accrual to every due balance of the cutoff's year
    Accrue {
        /// Accrual cutoff (YYYY-MM-DD); today when omitted
        #[arg(long, value_parser = parse_date)]
        cutoff: Option<Date>,
    },

    /// Carry unused days of a year into the next one
    CarryOver { from_year: i32 },

    /// Start and complete approved requests according to today's date
    Advance,

    /// List manager alerts due today
    Notifications,

    /// Show a balance
    Balance {
        person: i64,
        leave_type: i64,
        year: i32,
    },

    /// List balances of a year with negative available days
    Overused { year: i32 },
}

/// One leave type in a seed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct LeaveTypeSeed {
    name: String,
    rules: LeaveTypeRules,
    #[serde(default = "default_active")]
    is_active: bool,
}

const fn default_active() -> bool {
    true
}

/// One person in a people file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct PersonRecord {
    person_id: PersonId,
    #[serde(default)]
    department_id: Option<DepartmentId>,
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).wrap_err_with(|| format!("Failed to parse {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

impl Args {
    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }

    fn load_config(&self) -> Result<EngineConfig> {
        match &self.config {
            Some(path) => EngineConfig::from_file(path)
                .wrap_err_with(|| format!("Invalid configuration in {}", path.display())),
            None => Ok(EngineConfig::default()),
        }
    }

    fn load_directory(&self) -> Result<InMemoryDirectory> {
        let Some(path) = &self.people else {
            return Ok(InMemoryDirectory::new());
        };
        let records: Vec<PersonRecord> = read_json(path)?;
        info!(count = records.len(), "Loaded people");
        Ok(records
            .into_iter()
            .map(|r| (r.person_id, r.department_id))
            .collect())
    }

    fn open_engine(&self) -> Result<Engine> {
        let config = self.load_config()?;
        let directory = self.load_directory()?;
        info!(database = %self.database.display(), "Opening database");
        LeaveEngine::open_sqlite(&self.database, directory, SystemClock, config)
            .wrap_err("Failed to open the leave ledger database")
    }

    fn run(self) -> Result<()> {
        let mut engine = self.open_engine()?;
        match self.command {
            Command::SeedTypes { file } => seed_types(&mut engine, &file),
            Command::Allocate {
                person,
                leave_type,
                year,
                days,
                monthly,
            } => {
                let key = balance_key(person, leave_type, year);
                print_json(&engine.allocate_balance(key, days, monthly)?)
            }
            Command::Accrue { cutoff } => {
                let cutoff = cutoff.unwrap_or_else(|| engine.today());
                print_json(&engine.run_accrual(cutoff)?)
            }
            Command::CarryOver { from_year } => print_json(&engine.run_carry_over(from_year)?),
            Command::Advance => print_json(&engine.advance_statuses()?),
            Command::Notifications => print_json(&engine.notifications_due()?),
            Command::Balance {
                person,
                leave_type,
                year,
            } => print_json(&engine.get_balance(balance_key(person, leave_type, year))?),
            Command::Overused { year } => print_json(&engine.overused_balances(year)?),
        }
    }
}

const fn balance_key(person: i64, leave_type: i64, year: i32) -> BalanceKey {
    BalanceKey::new(PersonId::new(person), LeaveTypeId::new(leave_type), year)
}

fn seed_types(engine: &mut Engine, file: &Path) -> Result<()> {
    let seeds: Vec<LeaveTypeSeed> = read_json(file)?;
    let existing = LeaveTypeRegistry::new(engine.list_leave_types()?);

    let mut registered = Vec::new();
    for seed in seeds {
        if existing.by_name(&seed.name).is_some() {
            warn!(name = %seed.name, "Leave type already exists, skipping");
            continue;
        }
        registered.push(engine.register_leave_type(&seed.name, &seed.rules, seed.is_active)?);
    }
    info!(count = registered.len(), "Leave types seeded");
    print_json(&registered)
}
