#![allow(dead_code)]

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shipment details sent to the pricing API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentRequest {
    pub size: String,
    #[serde(rename = "type")]
    pub shipment_type: String,
    pub locations: TripLocations,
}

impl Default for ShipmentRequest {
    fn default() -> Self {
        Self {
            size: String::new(),
            shipment_type: ShipmentType::default().label().to_string(),
            locations: TripLocations::default(),
        }
    }
}

impl ShipmentRequest {
    /// True when every field the pricing API needs is filled in.
    pub fn is_complete(&self) -> bool {
        !self.size.is_empty() && !self.shipment_type.is_empty() && self.locations.is_complete()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripLocations {
    pub start: String,
    pub delivery: String,
    pub end: String,
}

impl TripLocations {
    pub fn is_complete(&self) -> bool {
        !self.start.is_empty() && !self.delivery.is_empty() && !self.end.is_empty()
    }

    pub fn field(&self, field: LocationField) -> &str {
        match field {
            LocationField::Start => &self.start,
            LocationField::Delivery => &self.delivery,
            LocationField::End => &self.end,
        }
    }

    pub(crate) fn field_mut(&mut self, field: LocationField) -> &mut String {
        match field {
            LocationField::Start => &mut self.start,
            LocationField::Delivery => &mut self.delivery,
            LocationField::End => &mut self.end,
        }
    }
}

/// Price insight returned for a shipment request.
///
/// The API may leave out or null any of the figures when it has too few
/// observations for the route.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceResult {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub average: Option<f64>,
    #[serde(default)]
    pub data: Vec<f64>,
}

/// The two transport directions offered as tabs.
///
/// The API hands back shipment types as a bare list of labels; the variant is
/// resolved against that list by label so the order of the response never
/// matters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ShipmentType {
    Import,
    #[default]
    Export,
}

impl ShipmentType {
    pub const ALL: [ShipmentType; 2] = [ShipmentType::Import, ShipmentType::Export];

    pub fn label(&self) -> &'static str {
        match self {
            ShipmentType::Import => "import",
            ShipmentType::Export => "export",
        }
    }

    /// Finds the option label this variant maps to, if the server offers it.
    pub fn resolve<'a>(&self, options: &'a [String]) -> Option<&'a str> {
        options
            .iter()
            .find(|option| option.trim().eq_ignore_ascii_case(self.label()))
            .map(String::as_str)
    }

    /// Reverse lookup used to highlight the active tab.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| label.trim().eq_ignore_ascii_case(kind.label()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LocationField {
    Start,
    Delivery,
    End,
}

/// Address of a single editable field of a [`ShipmentRequest`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldPath {
    Size,
    Type,
    Location(LocationField),
}

impl FieldPath {
    pub const ALL: [FieldPath; 5] = [
        FieldPath::Size,
        FieldPath::Type,
        FieldPath::Location(LocationField::Start),
        FieldPath::Location(LocationField::Delivery),
        FieldPath::Location(LocationField::End),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldPath::Size => "size",
            FieldPath::Type => "type",
            FieldPath::Location(LocationField::Start) => "locations.start",
            FieldPath::Location(LocationField::Delivery) => "locations.delivery",
            FieldPath::Location(LocationField::End) => "locations.end",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown form field `{0}`")]
pub struct InvalidPathError(pub String);

impl FromStr for FieldPath {
    type Err = InvalidPathError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidPathError(raw.to_string());
        match raw.split_once('.') {
            None => match raw {
                "size" => Ok(FieldPath::Size),
                "type" => Ok(FieldPath::Type),
                _ => Err(invalid()),
            },
            Some(("locations", field)) => match field {
                "start" => Ok(FieldPath::Location(LocationField::Start)),
                "delivery" => Ok(FieldPath::Location(LocationField::Delivery)),
                "end" => Ok(FieldPath::Location(LocationField::End)),
                _ => Err(invalid()),
            },
            Some(_) => Err(invalid()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_serializes_to_wire_shape() {
        let request = ShipmentRequest {
            size: "40ft".into(),
            shipment_type: "import".into(),
            locations: TripLocations {
                start: "Rotterdam".into(),
                delivery: "Hamburg".into(),
                end: "Berlin".into(),
            },
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "size": "40ft",
                "type": "import",
                "locations": { "start": "Rotterdam", "delivery": "Hamburg", "end": "Berlin" }
            })
        );
    }

    #[test]
    fn price_result_tolerates_missing_samples() {
        let price: PriceResult =
            serde_json::from_value(json!({ "min": 1, "max": 3.5, "average": 2 })).unwrap();
        assert_eq!(price.min, Some(1.0));
        assert_eq!(price.max, Some(3.5));
        assert!(price.data.is_empty());
    }

    #[test]
    fn price_result_accepts_null_and_missing_figures() {
        let price: PriceResult =
            serde_json::from_value(json!({ "min": null, "max": 5, "data": [] })).unwrap();
        assert_eq!(price.min, None);
        assert_eq!(price.max, Some(5.0));
        assert_eq!(price.average, None);
    }

    #[test]
    fn shipment_type_resolves_by_label_not_position() {
        let options = vec!["Export".to_string(), "Import".to_string()];
        assert_eq!(ShipmentType::Import.resolve(&options), Some("Import"));
        assert_eq!(ShipmentType::Export.resolve(&options), Some("Export"));
        assert_eq!(ShipmentType::Import.resolve(&[]), None);
        assert_eq!(ShipmentType::from_label(" EXPORT "), Some(ShipmentType::Export));
        assert_eq!(ShipmentType::from_label("air"), None);
    }

    #[test]
    fn default_request_preselects_export() {
        let request = ShipmentRequest::default();
        assert_eq!(request.shipment_type, "export");
        assert!(!request.is_complete());
    }

    #[test]
    fn field_paths_parse_and_print() {
        for path in FieldPath::ALL {
            assert_eq!(path.as_str().parse::<FieldPath>(), Ok(path));
        }
        assert!("locations".parse::<FieldPath>().is_err());
        assert!("locations.middle".parse::<FieldPath>().is_err());
        assert!("size.start".parse::<FieldPath>().is_err());
        assert_eq!(
            "price".parse::<FieldPath>(),
            Err(InvalidPathError("price".into()))
        );
    }
}
