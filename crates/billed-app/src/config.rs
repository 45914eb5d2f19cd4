use std::path::PathBuf;
use std::sync::Arc;

use billed_core::bill::DEFAULT_PCT;
use billed_service::{BillStore, HttpBillStore, LocalBillStore, ServiceError};
use billed_store::StoreConfig;
use clap::{Args, Parser, Subcommand};

use crate::error::SessionError;
use crate::new_bill::BillForm;
use crate::session::Session;

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str =
    "billed=info,billed_app=info,billed_service=info,billed_store=info";

#[derive(Debug, Parser)]
#[command(name = "billed", about = "Submit and review expense bills")]
pub struct Config {
    /// Bills API URL
    #[arg(long, env = "BILLED_SERVER_URL", default_value = "http://localhost:5678")]
    pub server_url: String,

    /// API key for authenticating with the server
    #[arg(long, env = "BILLED_API_KEY")]
    pub api_key: Option<String>,

    /// Persisted user record, e.g. {"type":"Employee","email":"a@a"}
    #[arg(long, env = "BILLED_USER")]
    pub user: Option<String>,

    /// Keep bills and receipts under BILLED_DATA_DIR instead of talking to
    /// the server.
    #[arg(long)]
    pub local: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List bills, newest first
    List,
    /// Submit a new bill with a receipt image
    New(NewBillArgs),
}

#[derive(Debug, Args)]
pub struct NewBillArgs {
    /// Receipt image (png or jpeg)
    #[arg(long)]
    pub file: PathBuf,

    /// Expense type
    #[arg(long = "type", default_value = "Transports")]
    pub expense_type: String,

    #[arg(long, default_value = "")]
    pub name: String,

    /// Amount, whole units
    #[arg(long)]
    pub amount: String,

    /// Date, YYYY-MM-DD
    #[arg(long)]
    pub date: String,

    #[arg(long, default_value = "")]
    pub vat: String,

    /// VAT percentage
    #[arg(long, default_value_t = DEFAULT_PCT.to_string())]
    pub pct: String,

    #[arg(long, default_value = "")]
    pub commentary: String,
}

impl NewBillArgs {
    pub fn form(&self) -> BillForm {
        BillForm {
            expense_type: self.expense_type.clone(),
            name: self.name.clone(),
            amount: self.amount.clone(),
            date: self.date.clone(),
            vat: self.vat.clone(),
            pct: self.pct.clone(),
            commentary: self.commentary.clone(),
        }
    }
}

impl Config {
    pub fn session(&self) -> Result<Session, SessionError> {
        match &self.user {
            Some(record) => Session::from_user_record(record),
            None => Err(SessionError::MissingEmail),
        }
    }

    pub async fn store(&self) -> Result<Arc<dyn BillStore>, ServiceError> {
        if self.local {
            let receipts = billed_store::create_store(&StoreConfig::from_env())?;
            return Ok(Arc::new(LocalBillStore::open(receipts).await?));
        }
        let store = match &self.api_key {
            Some(key) => HttpBillStore::with_api_key(&self.server_url, key.clone()),
            None => HttpBillStore::new(&self.server_url),
        };
        Ok(Arc::new(store))
    }
}
