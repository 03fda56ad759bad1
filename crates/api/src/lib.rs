//! HTTP API: router, handlers and request/response mapping for the stock ledger.

pub mod app;
