use clap::Parser;
use miette::{IntoDiagnostic, Result};
use paytrail::application::service::PaymentApplicationService;
use paytrail::domain::audit_service::AuditService;
use paytrail::domain::payment_service::PaymentService;
use paytrail::domain::ports::{AuditStoreBox, PaymentStoreBox};
use paytrail::error::PaymentError;
use paytrail::infrastructure::in_memory::{InMemoryAuditStore, InMemoryPaymentStore};
use paytrail::interfaces::csv::audit_writer::AuditWriter;
use paytrail::interfaces::csv::command_reader::{Command, CommandReader, CommandType};
use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input payment commands CSV file
    input: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, env = "PAYTRAIL_DB_PATH")]
    db_path: Option<PathBuf>,

    /// Tracing filter directive
    #[arg(long, env = "PAYTRAIL_LOG", default_value = "paytrail=info")]
    log_level: String,
}

fn init_tracing(directive: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directive))
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

fn build_stores(db_path: Option<PathBuf>) -> Result<(PaymentStoreBox, AuditStoreBox)> {
    match db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(path) => {
            let store = paytrail::infrastructure::rocksdb::RocksDBStore::open(path)
                .into_diagnostic()?;
            Ok((Box::new(store.clone()), Box::new(store)))
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            tracing::warn!(
                "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to in-memory storage."
            );
            Ok(in_memory_stores())
        }
        None => Ok(in_memory_stores()),
    }
}

fn in_memory_stores() -> (PaymentStoreBox, AuditStoreBox) {
    (
        Box::new(InMemoryPaymentStore::new()),
        Box::new(InMemoryAuditStore::new()),
    )
}

/// Applies one command, binding `create` aliases to the generated payment ids.
async fn run_command(
    app: &PaymentApplicationService,
    aliases: &mut HashMap<String, String>,
    command: Command,
) -> paytrail::error::Result<()> {
    if command.op == CommandType::Create {
        let amount = command.amount.ok_or_else(|| {
            PaymentError::ValidationError(format!("create {} is missing an amount", command.payment))
        })?;
        let payment = app
            .create_payment(
                amount,
                command.currency.as_deref().unwrap_or_default(),
                command.description.as_deref().unwrap_or_default(),
                &command.user,
            )
            .await?;
        aliases.insert(command.payment, payment.id().to_string());
        return Ok(());
    }

    // Unknown aliases are passed through as raw payment ids.
    let id = aliases
        .get(&command.payment)
        .cloned()
        .unwrap_or(command.payment);
    match command.op {
        CommandType::Process => app.process_payment(&id, &command.user).await?,
        CommandType::Complete => app.complete_payment(&id, &command.user).await?,
        CommandType::Fail => app.fail_payment(&id, &command.user).await?,
        CommandType::Cancel => app.cancel_payment(&id, &command.user).await?,
        CommandType::Create => unreachable!("handled above"),
    };
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let (payment_store, audit_store) = build_stores(cli.db_path)?;
    let app = PaymentApplicationService::new(
        PaymentService::new(payment_store),
        AuditService::new(audit_store),
    );

    let file = File::open(cli.input).into_diagnostic()?;
    let reader = CommandReader::new(file);
    let mut aliases = HashMap::new();
    for command in reader.commands() {
        match command {
            Ok(command) => {
                if let Err(e) = run_command(&app, &mut aliases, command).await {
                    tracing::error!("Error processing command: {}", e);
                }
            }
            Err(e) => {
                tracing::error!("Error reading command: {}", e);
            }
        }
    }

    // Output the audit trail of every known payment
    let stdout = io::stdout();
    let mut writer = AuditWriter::new(stdout.lock());
    for payment in app.list_payments().await.into_diagnostic()? {
        let history = app
            .get_payment_audit_history(payment.id().as_str())
            .await
            .into_diagnostic()?;
        writer.write_entries(&history).into_diagnostic()?;
    }

    Ok(())
}
