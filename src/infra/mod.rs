pub mod api_client;
pub mod cache;
pub mod reference_data;
