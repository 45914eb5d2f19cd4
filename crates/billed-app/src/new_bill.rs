//! The new bill form: receipt selection, validation and submission.

use std::sync::Arc;

use billed_core::bill::DEFAULT_PCT;
use billed_core::submission::parse_int;
use billed_core::{Bill, BillSubmission, ExpenseType, ReceiptFile, StagedReceipt};
use billed_service::{BillStore, ServiceError};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::error::NewBillError;
use crate::file_input::FileInput;
use crate::routes::{Navigator, Route};
use crate::session::Session;

pub const BAD_FILE_TYPE_MESSAGE: &str =
    "Mauvais format de fichier, Merci de fournir un fichier jpg, jpeg ou png";

/// Raw values of the form fields, as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct BillForm {
    pub expense_type: String,
    pub name: String,
    pub amount: String,
    pub date: String,
    pub vat: String,
    pub pct: String,
    pub commentary: String,
}

/// What a file selection did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSelection {
    /// Nothing was picked.
    Empty,
    /// Unsupported type; the input shows an error.
    Rejected,
    /// Receipt staged for the next submit.
    Staged,
}

/// A create call running in the background.
pub struct CreateTask {
    handle: JoinHandle<Result<Bill, ServiceError>>,
}

impl CreateTask {
    /// Wait for the store's answer.
    pub async fn outcome(self) -> Result<Bill, ServiceError> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) => Err(ServiceError::Internal(format!("create task: {e}"))),
        }
    }
}

pub struct SubmitOutcome {
    pub submission: BillSubmission,
    /// `None` when no store is configured.
    pub create: Option<CreateTask>,
}

pub struct NewBill {
    store: Option<Arc<dyn BillStore>>,
    navigator: Arc<dyn Navigator>,
    session: Session,
    file_input: FileInput,
    staged: Option<StagedReceipt>,
    last_submission: Option<BillSubmission>,
}

impl NewBill {
    pub fn new(
        store: Option<Arc<dyn BillStore>>,
        navigator: Arc<dyn Navigator>,
        session: Session,
    ) -> Self {
        Self {
            store,
            navigator,
            session,
            file_input: FileInput::default(),
            staged: None,
            last_submission: None,
        }
    }

    pub fn file_input(&self) -> &FileInput {
        &self.file_input
    }

    pub fn file_input_mut(&mut self) -> &mut FileInput {
        &mut self.file_input
    }

    pub fn staged(&self) -> Option<&StagedReceipt> {
        self.staged.as_ref()
    }

    pub fn last_submission(&self) -> Option<&BillSubmission> {
        self.last_submission.as_ref()
    }

    /// Validate the picked file and stage it for submission.
    ///
    /// Only png and jpeg receipts are staged. Anything else clears the
    /// input, shows an error next to it and drops the staged receipt.
    pub fn handle_file_selected(&mut self, file: Option<ReceiptFile>) -> FileSelection {
        let Some(file) = file else {
            return FileSelection::Empty;
        };
        let name = file.name.clone();
        match StagedReceipt::try_from(file) {
            Ok(receipt) => {
                self.file_input.remove_error();
                self.file_input.set_value(name);
                self.staged = Some(receipt);
                FileSelection::Staged
            }
            Err(e) => {
                warn!(file_name = %name, "receipt rejected: {e}");
                self.file_input.add_error(BAD_FILE_TYPE_MESSAGE);
                self.file_input.clear();
                self.staged = None;
                FileSelection::Rejected
            }
        }
    }

    /// Build the bill from the form and the staged receipt, send it and
    /// go back to the bills list.
    ///
    /// Navigation does not wait for the store; the returned task reports
    /// how the create call ended.
    pub fn handle_submit(&mut self, form: &BillForm) -> Result<SubmitOutcome, NewBillError> {
        let receipt = self.staged.clone().ok_or(NewBillError::NoStagedReceipt)?;
        let amount =
            parse_int(&form.amount).ok_or_else(|| NewBillError::InvalidAmount(form.amount.clone()))?;
        let pct = parse_int(&form.pct).unwrap_or(DEFAULT_PCT);

        let submission = BillSubmission::builder(receipt)
            .email(self.session.email.clone())
            .expense_type(ExpenseType::from_str(&form.expense_type))
            .name(form.name.clone())
            .amount(amount)
            .date(form.date.clone())
            .vat(form.vat.clone())
            .pct(pct)
            .commentary(form.commentary.clone())
            .build()?;
        info!(file_name = submission.file_name(), amount, "submitting bill");

        let create = self.create_bill(submission.clone())?;
        self.last_submission = Some(submission.clone());
        self.navigator.navigate(Route::Bills);
        Ok(SubmitOutcome { submission, create })
    }

    /// Send the bill to the store in the background. On success the view
    /// goes to the bills list; on failure the error is logged and kept on
    /// the returned task.
    pub fn create_bill(
        &self,
        submission: BillSubmission,
    ) -> Result<Option<CreateTask>, NewBillError> {
        let Some(store) = self.store.as_ref().map(Arc::clone) else {
            return Ok(None);
        };
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| NewBillError::NoRuntime)?;
        let navigator = Arc::clone(&self.navigator);
        let handle = runtime.spawn(async move {
            match store.create(&submission).await {
                Ok(bill) => {
                    info!(bill_id = %bill.id, "bill created");
                    navigator.navigate(Route::Bills);
                    Ok(bill)
                }
                Err(e) => {
                    error!("failed to create bill: {e}");
                    Err(e)
                }
            }
        });
        Ok(Some(CreateTask { handle }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::Router;

    fn new_bill() -> (NewBill, Arc<Router>) {
        let router = Arc::new(Router::new(Route::NewBill));
        let container = NewBill::new(None, router.clone(), Session::employee("a@a"));
        (container, router)
    }

    #[test]
    fn no_file_is_a_noop() {
        let (mut container, _) = new_bill();
        assert_eq!(container.handle_file_selected(None), FileSelection::Empty);
        assert!(container.staged().is_none());
        assert!(container.file_input().error_message().is_none());
    }

    #[test]
    fn rejected_file_drops_previous_receipt() {
        let (mut container, _) = new_bill();
        container.handle_file_selected(Some(ReceiptFile::new("a.png", "image/png", &b"a"[..])));
        assert!(container.staged().is_some());

        let outcome =
            container.handle_file_selected(Some(ReceiptFile::new("b.gif", "image/gif", &b"b"[..])));
        assert_eq!(outcome, FileSelection::Rejected);
        assert!(container.staged().is_none());
        assert_eq!(
            container.file_input().error_message(),
            Some(BAD_FILE_TYPE_MESSAGE)
        );
    }

    #[test]
    fn last_selection_wins() {
        let (mut container, _) = new_bill();
        container.handle_file_selected(Some(ReceiptFile::new("a.png", "image/png", &b"a"[..])));
        container.handle_file_selected(Some(ReceiptFile::new("b.jpg", "image/jpeg", &b"b"[..])));
        assert_eq!(container.staged().unwrap().file_name(), "b.jpg");
        assert_eq!(container.file_input().value(), "b.jpg");
    }

    #[test]
    fn submit_without_receipt_fails() {
        let (mut container, router) = new_bill();
        let err = container.handle_submit(&BillForm::default()).err().unwrap();
        assert!(matches!(err, NewBillError::NoStagedReceipt));
        assert_eq!(router.current(), Route::NewBill);
    }

    #[test]
    fn submit_with_bad_amount_fails() {
        let (mut container, router) = new_bill();
        container.handle_file_selected(Some(ReceiptFile::new("a.png", "image/png", &b"a"[..])));
        let form = BillForm {
            amount: "beaucoup".into(),
            ..Default::default()
        };
        let err = container.handle_submit(&form).err().unwrap();
        assert!(matches!(err, NewBillError::InvalidAmount(ref a) if a == "beaucoup"));
        assert!(container.last_submission().is_none());
        assert_eq!(router.current(), Route::NewBill);
    }

    #[test]
    fn submit_without_store_still_navigates() {
        let (mut container, router) = new_bill();
        container.handle_file_selected(Some(ReceiptFile::new("a.png", "image/png", &b"a"[..])));
        let form = BillForm {
            amount: "12".into(),
            pct: "".into(),
            ..Default::default()
        };
        let outcome = container.handle_submit(&form).unwrap();
        assert!(outcome.create.is_none());
        assert_eq!(outcome.submission.pct(), DEFAULT_PCT);
        assert_eq!(router.current(), Route::Bills);
    }
}
