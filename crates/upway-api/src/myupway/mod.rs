// MyUpway portal client
//
// Cookie-session access to the portal's private JSON endpoints.
// Endpoint groups live in their own files as inherent methods on
// `MyUpwayClient`.

pub mod auth;
pub mod client;
pub mod models;
pub mod values;

pub use client::{AUTH_COOKIE, MyUpwayClient};
pub use models::{HistoryPoint, HistoryQuery, HistoryResponse, RawValue, ValuesResponse};
