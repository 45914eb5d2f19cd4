use crate::bill::{Bill, BillStatus, ExpenseType, DEFAULT_PCT};
use crate::error::BilledError;
use crate::receipt::{ReceiptFile, ReceiptKind, StagedReceipt};

/// Parse the leading integer of a form value.
///
/// Leading whitespace and a sign are accepted and parsing stops at the first
/// non-digit, so `"500.75"` reads as `500`. Returns `None` when no digit
/// comes first.
pub fn parse_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Immutable content of a new bill, ready to be sent to the store.
///
/// Always `pending`, never carries a `fileUrl`: the store assigns one
/// once the receipt is uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct BillSubmission {
    receipt: StagedReceipt,
    email: String,
    expense_type: ExpenseType,
    name: String,
    amount: i64,
    date: String,
    vat: String,
    pct: i64,
    commentary: String,
}

impl BillSubmission {
    pub fn builder(receipt: StagedReceipt) -> BillSubmissionBuilder {
        BillSubmissionBuilder::new(receipt)
    }

    pub fn file(&self) -> &ReceiptFile {
        self.receipt.file()
    }

    pub fn file_name(&self) -> &str {
        self.receipt.file_name()
    }

    /// Format checked when the receipt was staged.
    pub fn receipt_kind(&self) -> ReceiptKind {
        self.receipt.kind()
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn expense_type(&self) -> &ExpenseType {
        &self.expense_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn vat(&self) -> &str {
        &self.vat
    }

    pub fn pct(&self) -> i64 {
        self.pct
    }

    pub fn commentary(&self) -> &str {
        &self.commentary
    }

    pub fn file_url(&self) -> Option<&str> {
        None
    }

    pub fn status(&self) -> BillStatus {
        BillStatus::Pending
    }

    /// Text parts of the multipart body, in upload order. The binary
    /// `file` part is sent alongside.
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("fileName", self.file_name().to_string()),
            ("email", self.email.clone()),
            ("type", self.expense_type.to_string()),
            ("name", self.name.clone()),
            ("amount", self.amount.to_string()),
            ("date", self.date.clone()),
            ("vat", self.vat.clone()),
            ("pct", self.pct.to_string()),
            ("commentary", self.commentary.clone()),
            ("status", self.status().as_str().to_string()),
        ]
    }

    /// The record the store keeps for this submission.
    pub fn to_bill(&self, id: String, file_url: Option<String>) -> Bill {
        Bill {
            id,
            email: self.email.clone(),
            expense_type: self.expense_type.clone(),
            name: self.name.clone(),
            amount: self.amount,
            date: self.date.clone(),
            vat: self.vat.clone(),
            pct: self.pct,
            commentary: self.commentary.clone(),
            file_url,
            file_name: self.file_name().to_string(),
            status: self.status(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BillSubmissionBuilder {
    receipt: StagedReceipt,
    email: Option<String>,
    expense_type: ExpenseType,
    name: String,
    amount: Option<i64>,
    date: String,
    vat: String,
    pct: i64,
    commentary: String,
}

impl BillSubmissionBuilder {
    pub fn new(receipt: StagedReceipt) -> Self {
        Self {
            receipt,
            email: None,
            expense_type: ExpenseType::default(),
            name: String::new(),
            amount: None,
            date: String::new(),
            vat: String::new(),
            pct: DEFAULT_PCT,
            commentary: String::new(),
        }
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn expense_type(mut self, expense_type: ExpenseType) -> Self {
        self.expense_type = expense_type;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn amount(mut self, amount: i64) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    pub fn vat(mut self, vat: impl Into<String>) -> Self {
        self.vat = vat.into();
        self
    }

    pub fn pct(mut self, pct: i64) -> Self {
        self.pct = pct;
        self
    }

    pub fn commentary(mut self, commentary: impl Into<String>) -> Self {
        self.commentary = commentary.into();
        self
    }

    pub fn build(self) -> Result<BillSubmission, BilledError> {
        let email = self.email.ok_or(BilledError::MissingField("email"))?;
        let amount = self.amount.ok_or(BilledError::MissingField("amount"))?;
        Ok(BillSubmission {
            receipt: self.receipt,
            email,
            expense_type: self.expense_type,
            name: self.name,
            amount,
            date: self.date,
            vat: self.vat,
            pct: self.pct,
            commentary: self.commentary,
        })
    }
}
