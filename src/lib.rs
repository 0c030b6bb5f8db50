//! Solar Lead Relay Library
//!
//! Receives solar lead webhooks, filters and normalizes them, and forwards
//! the accepted ones to the partner lead API.
//!
//! # Modules
//!
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers and shared state.
//! - `lead_models`: Inbound lead payload models.
//! - `lead_pipeline`: Filters, normalization, payload assembly and outcome mapping.
//! - `partner_client`: Partner lead API client.
//! - `server`: Router and server lifecycle.

pub mod config;
pub mod errors;
pub mod handlers;
pub mod lead_models;
pub mod lead_pipeline;
pub mod partner_client;
pub mod server;
