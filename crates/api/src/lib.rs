//! HTTP gateway: server, routing, and request/response mapping.
//!
//! The gateway owns wire-level validation and serialization only; every
//! record-keeping rule lives behind the `LedgerStore` boundary.

pub mod app;
