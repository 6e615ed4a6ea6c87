//! Shared GitHub payload types and pure pull-request helpers for the
//! continuous-testing bot. Transport lives in the runtime crate; everything
//! here is decision logic the runtime calls with already-fetched data.

pub mod api_types;
pub mod pull_request_filter;
pub mod reconcile;
pub mod transport;
