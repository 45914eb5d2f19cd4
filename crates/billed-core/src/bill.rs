use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::format::{format_date, format_status, parse_bill_date};

pub const DEFAULT_PCT: i64 = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BillStatus {
    Pending,
    Accepted,
    Refused,
    /// A status the store sent that this client does not know about.
    Unknown(String),
}

impl BillStatus {
    pub fn as_str(&self) -> &str {
        match self {
            BillStatus::Pending => "pending",
            BillStatus::Accepted => "accepted",
            BillStatus::Refused => "refused",
            BillStatus::Unknown(raw) => raw,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            BillStatus::Pending => "En attente",
            BillStatus::Accepted => "Accepté",
            BillStatus::Refused => "Refusé",
            BillStatus::Unknown(raw) => raw,
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "pending" => BillStatus::Pending,
            "accepted" => BillStatus::Accepted,
            "refused" => BillStatus::Refused,
            other => BillStatus::Unknown(other.to_string()),
        }
    }
}

impl Default for BillStatus {
    fn default() -> Self {
        BillStatus::Pending
    }
}

impl From<String> for BillStatus {
    fn from(s: String) -> Self {
        BillStatus::from_str(&s)
    }
}

impl From<BillStatus> for String {
    fn from(status: BillStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Expense category picked in the new bill form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExpenseType {
    Transports,
    Restaurants,
    Lodging,
    OnlineServices,
    Electronics,
    Equipment,
    OfficeSupplies,
    Other(String),
}

impl ExpenseType {
    pub const ALL: &[ExpenseType] = &[
        ExpenseType::Transports,
        ExpenseType::Restaurants,
        ExpenseType::Lodging,
        ExpenseType::OnlineServices,
        ExpenseType::Electronics,
        ExpenseType::Equipment,
        ExpenseType::OfficeSupplies,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            ExpenseType::Transports => "Transports",
            ExpenseType::Restaurants => "Restaurants et bars",
            ExpenseType::Lodging => "Hôtel et logement",
            ExpenseType::OnlineServices => "Services en ligne",
            ExpenseType::Electronics => "IT et électronique",
            ExpenseType::Equipment => "Equipement et matériel",
            ExpenseType::OfficeSupplies => "Fournitures de bureau",
            ExpenseType::Other(raw) => raw,
        }
    }

    pub fn from_str(s: &str) -> Self {
        ExpenseType::ALL
            .iter()
            .find(|t| t.as_str() == s)
            .cloned()
            .unwrap_or_else(|| ExpenseType::Other(s.to_string()))
    }
}

impl Default for ExpenseType {
    fn default() -> Self {
        ExpenseType::Transports
    }
}

impl From<String> for ExpenseType {
    fn from(s: String) -> Self {
        ExpenseType::from_str(&s)
    }
}

impl From<ExpenseType> for String {
    fn from(t: ExpenseType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for ExpenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_pct() -> i64 {
    DEFAULT_PCT
}

/// Read a text field the way the list view shows it: `null` becomes empty,
/// numbers and booleans become their text. Keeps one odd record from
/// failing the whole list.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    })
}

fn lenient_status<'de, D>(deserializer: D) -> Result<BillStatus, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => BillStatus::default(),
        serde_json::Value::String(s) => BillStatus::from(s),
        other => BillStatus::Unknown(other.to_string()),
    })
}

/// A bill as stored remotely. Field names follow the store's JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(rename = "type")]
    pub expense_type: ExpenseType,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    pub amount: i64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub vat: String,
    #[serde(default = "default_pct")]
    pub pct: i64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub commentary: String,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub file_name: String,
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: BillStatus,
}

/// Display shape of a [`Bill`]: same fields, with `date` and `status`
/// replaced by their formatted labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillView {
    pub id: String,
    pub email: String,
    #[serde(rename = "type")]
    pub expense_type: ExpenseType,
    pub name: String,
    pub amount: i64,
    pub date: String,
    pub vat: String,
    pub pct: i64,
    pub commentary: String,
    pub file_url: Option<String>,
    pub file_name: String,
    pub status: String,
}

impl From<Bill> for BillView {
    fn from(bill: Bill) -> Self {
        let date = format_date(&bill.date);
        let status = format_status(&bill.status);
        BillView {
            id: bill.id,
            email: bill.email,
            expense_type: bill.expense_type,
            name: bill.name,
            amount: bill.amount,
            date,
            vat: bill.vat,
            pct: bill.pct,
            commentary: bill.commentary,
            file_url: bill.file_url,
            file_name: bill.file_name,
            status,
        }
    }
}

/// Sort bills most recent first.
///
/// The sort is stable: bills with the same date keep their fetch order.
/// Bills whose date cannot be parsed go after every dated bill.
pub fn sort_newest_first(bills: &mut [Bill]) {
    bills.sort_by(|a, b| {
        match (parse_bill_date(&a.date), parse_bill_date(&b.date)) {
            (Some(da), Some(db)) => db.cmp(&da),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
}
