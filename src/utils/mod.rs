//! Utilities module aggregator exposing request helpers and testing helpers.

pub mod request;
