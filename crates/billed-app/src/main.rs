use std::sync::Arc;

use anyhow::{bail, Context};
use billed_app::config::{Command, Config, NewBillArgs, DEFAULT_LOG_FILTER};
use billed_app::{Bills, BillsPage, FileSelection, NewBill, Route, Router};
use billed_core::receipt::mime_type_for_name;
use billed_core::ReceiptFile;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();
    let store = config.store().await.context("open bill store")?;

    match &config.command {
        Command::List => {
            let router = Arc::new(Router::new(Route::Bills));
            let mut bills = Bills::new(Some(store), router);
            match bills.load_page().await {
                BillsPage::Loaded(rows) if rows.is_empty() => println!("no bills"),
                BillsPage::Loaded(rows) => {
                    for bill in rows {
                        println!(
                            "{:<10} {:<24} {:<24} {:>8} € {}",
                            bill.date,
                            bill.expense_type.to_string(),
                            bill.name,
                            bill.amount,
                            bill.status
                        );
                    }
                }
                BillsPage::Error(msg) => bail!("Erreur: {msg}"),
                BillsPage::Loading => {}
            }
        }
        Command::New(args) => {
            let session = config.session().context("read user record")?;
            let router = Arc::new(Router::new(Route::NewBill));
            let mut new_bill = NewBill::new(Some(store), router.clone(), session);
            let file = read_receipt(args).await?;

            if new_bill.handle_file_selected(Some(file)) == FileSelection::Rejected {
                bail!(
                    "{}",
                    new_bill.file_input().error_message().unwrap_or_default()
                );
            }
            let outcome = new_bill.handle_submit(&args.form())?;
            if let Some(task) = outcome.create {
                let bill = task.outcome().await.context("create bill")?;
                println!("created bill {}", bill.id);
            }
            println!("-> {}", router.current().path());
        }
    }
    Ok(())
}

async fn read_receipt(args: &NewBillArgs) -> anyhow::Result<ReceiptFile> {
    let data = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("read {}", args.file.display()))?;
    let name = args
        .file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let mime = mime_type_for_name(&name);
    Ok(ReceiptFile::new(name, mime, data))
}
