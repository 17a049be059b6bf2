//! Sends the current form to the pricing API and writes the answer back.
//!
//! A second submit while one is in flight is rejected, never queued.

use std::sync::{Arc, Mutex};

use thiserror::Error;

use super::{
    entities::PriceResult,
    form_state::{FormStore, SubmitBlocked},
};
use crate::infra::api_client::{ApiClient, RequestError};

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("fill in every shipment field before requesting a price")]
    NotSubmittable,
    #[error("a price request is already in progress")]
    AlreadyPending,
    #[error("price request failed: {0}")]
    Request(#[from] RequestError),
}

impl From<SubmitBlocked> for SubmitError {
    fn from(blocked: SubmitBlocked) -> Self {
        match blocked {
            SubmitBlocked::NotSubmittable => SubmitError::NotSubmittable,
            SubmitBlocked::AlreadyPending => SubmitError::AlreadyPending,
        }
    }
}

/// Short-lived mutable access to a [`FormStore`].
///
/// Access is never held across an await point, so the UI can keep editing
/// while a request is in flight.
pub trait FormHandle {
    fn update<R>(&mut self, f: impl FnOnce(&mut FormStore) -> R) -> R;
}

impl FormHandle for Arc<Mutex<FormStore>> {
    fn update<R>(&mut self, f: impl FnOnce(&mut FormStore) -> R) -> R {
        let mut store = self.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut store)
    }
}

pub async fn submit<H: FormHandle>(handle: &mut H, client: &ApiClient) -> Result<PriceResult, SubmitError> {
    let request = handle.update(FormStore::begin_submission)?;
    tracing::info!(
        size = %request.size,
        shipment_type = %request.shipment_type,
        "requesting price"
    );

    match client.quote_price(&request).await {
        Ok(price) => {
            tracing::info!(min = price.min, max = price.max, average = price.average, "price received");
            handle.update(|store| store.finish_submission(Some(price.clone())));
            Ok(price)
        }
        Err(error) => {
            tracing::error!(%error, "error fetching price");
            handle.update(|store| store.finish_submission(None));
            Err(error.into())
        }
    }
}
