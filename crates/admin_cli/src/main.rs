use std::{
    error::Error,
    fs::File,
    io,
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use engine::{CsvEncoder, CsvRecord, DateRange, Engine, Expense, Item, Money, Other};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

type BoxError = Box<dyn Error + Send + Sync>;

#[derive(Parser, Debug)]
#[command(name = "flipbook_admin")]
#[command(about = "Admin utilities for Flipbook (seed records, export CSV files)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./flipbook.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Item(ItemCmd),
    Expense(ExpenseCmd),
    Other(OtherCmd),
    /// Write a CSV export, same format as the HTTP endpoints.
    Export(ExportArgs),
}

#[derive(Args, Debug)]
struct ItemCmd {
    #[command(subcommand)]
    command: ItemCommand,
}

#[derive(Subcommand, Debug)]
enum ItemCommand {
    Add(ItemAddArgs),
    Sell(ItemSellArgs),
}

#[derive(Args, Debug)]
struct ItemAddArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    price: Money,
    /// `YYYY-MM-DD` or RFC 3339.
    #[arg(long, value_parser = parse_date)]
    date: DateTime<Utc>,
    #[arg(long)]
    owner: Option<String>,
    #[arg(long)]
    notes: Option<String>,
    #[arg(long)]
    item_type: Option<String>,
}

#[derive(Args, Debug)]
struct ItemSellArgs {
    #[arg(long)]
    id: Uuid,
    #[arg(long)]
    price: Money,
    #[arg(long, value_parser = parse_date)]
    date: DateTime<Utc>,
}

#[derive(Args, Debug)]
struct ExpenseCmd {
    #[command(subcommand)]
    command: ExpenseCommand,
}

#[derive(Subcommand, Debug)]
enum ExpenseCommand {
    Add(ExpenseAddArgs),
}

#[derive(Args, Debug)]
struct ExpenseAddArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    amount: Money,
    #[arg(long, value_parser = parse_date)]
    date: DateTime<Utc>,
    #[arg(long)]
    notes: Option<String>,
}

#[derive(Args, Debug)]
struct OtherCmd {
    #[command(subcommand)]
    command: OtherCommand,
}

#[derive(Subcommand, Debug)]
enum OtherCommand {
    Add(OtherAddArgs),
}

#[derive(Args, Debug)]
struct OtherAddArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    amount: Money,
    #[arg(long, value_parser = parse_date)]
    date: DateTime<Utc>,
    #[arg(long)]
    notes: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ExportTarget {
    Transactions,
    Expenses,
    Other,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[arg(value_enum)]
    kind: ExportTarget,
    #[arg(long)]
    start: String,
    #[arg(long)]
    end: String,
    /// Output file, stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn parse_date(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(day.and_time(NaiveTime::MIN).and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|_| format!("invalid date: {raw} (expected YYYY-MM-DD or RFC 3339)"))
}

async fn connect_db(database_url: &str) -> Result<DatabaseConnection, BoxError> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

fn write_csv<R: CsvRecord>(rows: Vec<R>, out: Option<&Path>) -> Result<usize, BoxError> {
    let encoder = CsvEncoder::new(rows);
    let rows = match out {
        Some(path) => encoder.write_to(io::BufWriter::new(File::create(path)?))?,
        None => encoder.write_to(io::stdout().lock())?,
    };
    Ok(rows)
}

async fn export(engine: &Engine, args: ExportArgs) -> Result<usize, BoxError> {
    let range = DateRange::parse(Some(args.start.as_str()), Some(args.end.as_str()))?;
    let out = args.out.as_deref();

    match args.kind {
        ExportTarget::Transactions => write_csv(engine.transactions_between(&range).await?, out),
        ExportTarget::Expenses => write_csv(engine.expenses_between(&range).await?, out),
        ExportTarget::Other => write_csv(engine.other_between(&range).await?, out),
    }
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build()?;

    match cli.command {
        Command::Item(ItemCmd {
            command: ItemCommand::Add(args),
        }) => {
            let mut item = Item::new(&args.name, args.price, args.date)?;
            item.owner = args.owner;
            item.notes = args.notes;
            item.item_type = args.item_type;
            let id = engine.add_item(item).await?;
            println!("created item: {} ({id})", args.name);
        }
        Command::Item(ItemCmd {
            command: ItemCommand::Sell(args),
        }) => {
            engine.sell_item(args.id, args.price, args.date).await?;
            println!("sold item: {} for {}", args.id, args.price);
        }
        Command::Expense(ExpenseCmd {
            command: ExpenseCommand::Add(args),
        }) => {
            let expense = Expense::new(
                &args.name,
                args.category.as_deref(),
                args.amount,
                args.date,
                args.notes.as_deref(),
            )?;
            let id = engine.add_expense(expense).await?;
            println!("created expense: {} ({id})", args.name);
        }
        Command::Other(OtherCmd {
            command: OtherCommand::Add(args),
        }) => {
            let other = Other::new(&args.name, args.amount, args.date, args.notes.as_deref())?;
            let id = engine.add_other(other).await?;
            println!("created entry: {} ({id})", args.name);
        }
        Command::Export(args) => {
            let rows = export(&engine, args).await?;
            eprintln!("exported {rows} rows");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_date_accepts_day_or_rfc3339() {
        assert_eq!(
            parse_date("2024-01-05").unwrap().to_rfc3339(),
            "2024-01-05T00:00:00+00:00"
        );
        assert_eq!(
            parse_date("2024-01-05T10:30:00+02:00").unwrap().to_rfc3339(),
            "2024-01-05T08:30:00+00:00"
        );
        assert!(parse_date("05/01/2024").is_err());
    }

    #[test]
    fn export_arguments_parse() {
        let cli = Cli::try_parse_from([
            "flipbook_admin",
            "--database-url",
            "sqlite::memory:",
            "export",
            "transactions",
            "--start",
            "2024-01-01",
            "--end",
            "2024-01-31",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Command::Export(ExportArgs {
                kind: ExportTarget::Transactions,
                out: None,
                ..
            })
        ));
    }
}
