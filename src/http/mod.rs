//! HTTP subsystem.
//!
//! # Components
//! - `request`: URI parsing and canonical cache keys
//! - `response`: buffered, immutable response value
//! - `transport`: one network exchange per call

pub mod request;
pub mod response;
pub mod transport;

pub use response::Response;
pub use transport::{ReqwestTransport, Transport};
