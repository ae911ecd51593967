// upway-core: Unified heat pump telemetry over the MyUpway portal and the myUplink API.

pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod parse;
pub mod service;

// ── Primary re-exports ──────────────────────────────────────────────
pub use catalog::{CatalogEntry, Variable, VariableCatalog};
pub use client::UpwayClient;
pub use config::{AuthCredentials, ClientConfig, ClientConfigBuilder, TlsVerification};
pub use error::CoreError;
pub use model::{Value, VariableHistoryValue, VariableValue};
pub use service::{DEFAULT_RESOLUTION, DataServiceClient, MyUplinkService, MyUpwayService};

pub use upway_api::DataService;
