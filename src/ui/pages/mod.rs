pub mod calculator;

pub use calculator::PriceCalculatorPage;
