//! Beeline Summary API Library
//!
//! This library aggregates balance and usage figures for carrier accounts:
//! it logs in with stored credentials, caches bearer tokens, fetches the
//! per-account metrics from the carrier API and merges them into one summary.
//!
//! # Modules
//!
//! - `api`: HTTP-facing components.
//! - `core`: Summary retrieval logic, models and errors.
//! - `integrations`: Carrier API client and account persistence.
//! - `account_store`: Account credentials and token state.
//! - `app`: Router assembly.
//! - `authenticator`: Token refresh against the carrier API.
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `models`: Account, summary and upstream payload models.
//! - `openapi`: OpenAPI document.
//! - `summary`: Summary orchestration and unit conversions.
//! - `upstream_client`: Carrier API client.

pub mod api;
pub mod core;
pub mod integrations;

pub mod account_store;
pub mod app;
pub mod authenticator;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod openapi;
pub mod summary;
pub mod upstream_client;
