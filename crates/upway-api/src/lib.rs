// upway-api: Async Rust client for the MyUpway portal and the myUplink API

pub mod auth;
pub mod error;
pub mod myuplink;
pub mod myupway;
pub mod transport;

pub use auth::{AuthStrategy, DataService};
pub use error::Error;
pub use myuplink::MyUplinkClient;
pub use myupway::MyUpwayClient;
pub use transport::{TlsMode, TransportConfig};
