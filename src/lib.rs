//! Diamond Price Prediction Service
//!
//! Serves a trained regression model over HTTP: one JSON record in, one
//! predicted price out. The feature engineering applied per request matches
//! the offline training pipeline exactly.

pub mod api;
pub mod artifact;
pub mod client;
pub mod fetch;
pub mod model;
pub mod transform;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration values
pub mod defaults {
    pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
    pub const DEFAULT_MODEL_DIR: &str = "saved_model";
    pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000/predict";
}
