use dioxus::prelude::*;

use crate::domain::PriceResult;

#[component]
pub fn PriceSummary(price: PriceResult) -> Element {
    let rows = [
        ("Minimum Price:", format_price(price.min)),
        ("Maximum Price:", format_price(price.max)),
        ("Average Price:", format_price(price.average)),
    ];
    let samples = price.data.len();

    rsx! {
        section { class: "mt-6",
            h4 { class: "mb-4 text-center text-lg font-bold", "Price Summary" }
            div { class: "space-y-4",
                for (label, value) in rows {
                    div {
                        p { class: "font-bold", "{label}" }
                        p { "{value}" }
                    }
                }
            }
            if samples > 0 {
                p { class: "mt-4 text-xs text-slate-500", "Based on {samples} observed prices." }
            }
        }
    }
}

/// Whole amounts print without decimals; a missing figure prints as "N/A".
pub fn format_price(amount: Option<f64>) -> String {
    match amount {
        None => "N/A".to_string(),
        Some(amount) if amount.fract() == 0.0 => format!("{amount:.0}"),
        Some(amount) => format!("{amount:.2}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_whole_and_fractional_prices() {
        assert_eq!(format_price(Some(300.0)), "300");
        assert_eq!(format_price(Some(299.5)), "299.50");
    }

    #[test]
    fn missing_figures_render_as_not_available() {
        let price: PriceResult =
            serde_json::from_value(serde_json::json!({ "min": null, "max": 5 })).unwrap();
        assert_eq!(format_price(price.min), "N/A");
        assert_eq!(format_price(price.max), "5");
        assert_eq!(format_price(price.average), "N/A");
    }
}
