pub mod price_summary;
pub mod toast;
