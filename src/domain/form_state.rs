#![allow(dead_code)]

use super::entities::{FieldPath, InvalidPathError, PriceResult, ShipmentRequest, ShipmentType};

/// Whether a price request is currently in flight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Pending,
}

/// Why a submission could not be started.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitBlocked {
    NotSubmittable,
    AlreadyPending,
}

/// In-progress shipment request plus the last price the API returned.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormStore {
    request: ShipmentRequest,
    price: Option<PriceResult>,
    submission: SubmissionState,
}

impl FormStore {
    pub fn request(&self) -> &ShipmentRequest {
        &self.request
    }

    pub fn price(&self) -> Option<&PriceResult> {
        self.price.as_ref()
    }

    pub fn submission(&self) -> SubmissionState {
        self.submission
    }

    pub fn is_pending(&self) -> bool {
        self.submission == SubmissionState::Pending
    }

    /// Updates the field addressed by a form control name such as
    /// `size` or `locations.delivery`.
    pub fn set_field(&mut self, path: &str, value: impl Into<String>) -> Result<(), InvalidPathError> {
        let path = path.parse::<FieldPath>()?;
        self.set(path, value);
        Ok(())
    }

    pub fn set(&mut self, path: FieldPath, value: impl Into<String>) {
        let value = value.into();
        match path {
            FieldPath::Size => self.request.size = value,
            FieldPath::Type => self.request.shipment_type = value,
            FieldPath::Location(field) => *self.request.locations.field_mut(field) = value,
        }
    }

    /// Switches the shipment type tab. Falls back to the variant's own label
    /// when the server list does not contain it.
    pub fn select_shipment_type(&mut self, kind: ShipmentType, options: &[String]) {
        let label = kind.resolve(options).unwrap_or(kind.label()).to_string();
        self.set(FieldPath::Type, label);
    }

    pub fn is_submittable(&self) -> bool {
        self.request.is_complete()
    }

    pub fn record_result(&mut self, result: PriceResult) {
        self.price = Some(result);
    }

    /// Moves into `Pending` and hands back the request snapshot to send.
    pub(crate) fn begin_submission(&mut self) -> Result<ShipmentRequest, SubmitBlocked> {
        if self.is_pending() {
            return Err(SubmitBlocked::AlreadyPending);
        }
        if !self.is_submittable() {
            return Err(SubmitBlocked::NotSubmittable);
        }
        self.submission = SubmissionState::Pending;
        Ok(self.request.clone())
    }

    /// Always returns to `Idle`; the stored price only changes on success.
    pub(crate) fn finish_submission(&mut self, result: Option<PriceResult>) {
        if let Some(result) = result {
            self.record_result(result);
        }
        self.submission = SubmissionState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::LocationField;

    fn filled() -> FormStore {
        let mut store = FormStore::default();
        store.set_field("size", "40ft").unwrap();
        store.set_field("type", "export").unwrap();
        store.set_field("locations.start", "A").unwrap();
        store.set_field("locations.delivery", "B").unwrap();
        store.set_field("locations.end", "C").unwrap();
        store
    }

    fn price(min: f64) -> PriceResult {
        PriceResult {
            min: Some(min),
            max: Some(min * 2.0),
            average: Some(min * 1.5),
            data: vec![min, min * 2.0],
        }
    }

    #[test]
    fn submittable_only_when_every_field_is_filled() {
        assert!(filled().is_submittable());

        for path in FieldPath::ALL {
            let mut store = filled();
            store.set(path, "");
            assert!(!store.is_submittable(), "{} left empty", path.as_str());
        }
    }

    #[test]
    fn filling_the_last_field_makes_the_form_submittable() {
        let mut store = filled();
        store.set_field("size", "").unwrap();
        assert!(!store.is_submittable());

        store.set_field("size", "40ft").unwrap();
        assert!(store.is_submittable());
    }

    #[test]
    fn set_field_touches_only_the_addressed_field() {
        let mut store = filled();
        let before = store.request().clone();

        store.set_field("locations.start", "Rotterdam").unwrap();

        let after = store.request();
        assert_eq!(after.locations.start, "Rotterdam");
        assert_eq!(after.size, before.size);
        assert_eq!(after.shipment_type, before.shipment_type);
        assert_eq!(after.locations.delivery, before.locations.delivery);
        assert_eq!(after.locations.end, before.locations.end);
    }

    #[test]
    fn unknown_paths_are_rejected_without_changes() {
        let mut store = filled();
        let before = store.clone();

        assert!(store.set_field("locations.middle", "X").is_err());
        assert!(store.set_field("weight", "X").is_err());
        assert_eq!(store, before);
    }

    #[test]
    fn shipment_type_selection_uses_server_label() {
        let mut store = FormStore::default();
        let options = vec!["Import".to_string(), "Export".to_string()];

        store.select_shipment_type(ShipmentType::Import, &options);
        assert_eq!(store.request().shipment_type, "Import");

        store.select_shipment_type(ShipmentType::Export, &[]);
        assert_eq!(store.request().shipment_type, "export");
    }

    #[test]
    fn record_result_replaces_previous_price() {
        let mut store = FormStore::default();
        assert!(store.price().is_none());

        store.record_result(price(10.0));
        store.record_result(price(20.0));
        assert_eq!(store.price(), Some(&price(20.0)));
    }

    #[test]
    fn begin_submission_guards_readiness_and_pending() {
        let mut store = FormStore::default();
        assert_eq!(store.begin_submission(), Err(SubmitBlocked::NotSubmittable));
        assert_eq!(store.submission(), SubmissionState::Idle);

        let mut store = filled();
        let snapshot = store.begin_submission().unwrap();
        assert_eq!(&snapshot, store.request());
        assert!(store.is_pending());
        assert_eq!(store.begin_submission(), Err(SubmitBlocked::AlreadyPending));
    }

    #[test]
    fn finish_submission_always_returns_to_idle() {
        let mut store = filled();
        store.record_result(price(5.0));

        store.begin_submission().unwrap();
        store.finish_submission(None);
        assert_eq!(store.submission(), SubmissionState::Idle);
        assert_eq!(store.price(), Some(&price(5.0)));

        store.begin_submission().unwrap();
        store.finish_submission(Some(price(7.0)));
        assert_eq!(store.submission(), SubmissionState::Idle);
        assert_eq!(store.price(), Some(&price(7.0)));
    }

    #[test]
    fn edits_while_pending_do_not_alter_the_snapshot() {
        let mut store = filled();
        let snapshot = store.begin_submission().unwrap();
        store.set(FieldPath::Location(LocationField::End), "Munich");
        assert_eq!(snapshot.locations.end, "C");
        assert_eq!(store.request().locations.end, "Munich");
    }
}
