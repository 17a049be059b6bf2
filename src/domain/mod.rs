//! Form state and submission logic for the price calculator live here.

pub mod entities;
pub mod form_state;
pub mod submission;

#[allow(unused_imports)]
pub use entities::{
    FieldPath, InvalidPathError, LocationField, PriceResult, ShipmentRequest, ShipmentType,
    TripLocations,
};
#[allow(unused_imports)]
pub use form_state::{FormStore, SubmissionState};
#[allow(unused_imports)]
pub use submission::{submit, FormHandle, SubmitError};
