// myUplink API client
//
// OAuth2 client-credentials auth, system listing, and device data points.

pub mod client;
pub mod types;

pub use client::MyUplinkClient;
