//! The bills list: fetch, shape for display, receipt preview.

use std::sync::Arc;

use billed_core::bill::sort_newest_first;
use billed_core::{Bill, BillView};
use billed_service::{BillStore, ServiceError};
use tracing::{info, warn};

use crate::routes::{Navigator, Route};

#[derive(Debug, Clone, PartialEq)]
pub enum BillsPage {
    Loading,
    Loaded(Vec<BillView>),
    /// The list call failed; the message is shown instead of the list.
    Error(String),
}

/// Receipt preview modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewModal {
    Hidden,
    Shown { image_url: String },
}

pub struct Bills {
    store: Option<Arc<dyn BillStore>>,
    navigator: Arc<dyn Navigator>,
    page: BillsPage,
    modal: PreviewModal,
}

impl Bills {
    pub fn new(store: Option<Arc<dyn BillStore>>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            store,
            navigator,
            page: BillsPage::Loading,
            modal: PreviewModal::Hidden,
        }
    }

    /// Fetch the bills with formatted dates and statuses, in store order.
    /// `None` when no store is configured.
    pub async fn get_bills(&self) -> Result<Option<Vec<BillView>>, ServiceError> {
        let Some(store) = &self.store else {
            return Ok(None);
        };
        let bills = store.list().await?;
        info!(count = bills.len(), "fetched bills");
        Ok(Some(to_views(bills)))
    }

    /// Fetch and order the bills for the list view, newest first.
    pub async fn load_page(&mut self) -> &BillsPage {
        self.page = BillsPage::Loading;
        self.page = match &self.store {
            None => BillsPage::Loaded(Vec::new()),
            Some(store) => match store.list().await {
                Ok(mut bills) => {
                    sort_newest_first(&mut bills);
                    BillsPage::Loaded(to_views(bills))
                }
                Err(e) => {
                    warn!("failed to fetch bills: {e}");
                    BillsPage::Error(e.to_string())
                }
            },
        };
        &self.page
    }

    pub fn page(&self) -> &BillsPage {
        &self.page
    }

    pub fn modal(&self) -> &PreviewModal {
        &self.modal
    }

    pub fn handle_click_new_bill(&self) {
        self.navigator.navigate(Route::NewBill);
    }

    pub fn handle_click_icon_eye(&mut self, image_url: &str) {
        self.modal = PreviewModal::Shown {
            image_url: image_url.to_string(),
        };
    }

    pub fn close_modal(&mut self) {
        self.modal = PreviewModal::Hidden;
    }
}

fn to_views(bills: Vec<Bill>) -> Vec<BillView> {
    bills.into_iter().map(BillView::from).collect()
}
