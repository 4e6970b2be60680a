//! roomledger - Shared-household expense ledger for the terminal
//!
//! This library provides the core functionality for roomledger, a CLI tool
//! for households that share expenses. Members record who paid for what and
//! how it splits, the ledger derives who owes whom, and settlement payments
//! are validated against the actual pairwise debt before they are accepted.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (members, expenses, settlements, money)
//! - `ledger`: Pure balance computation, debt simplification, validation
//! - `storage`: JSON file storage layer
//! - `services`: Business logic layer
//! - `audit`: Audit logging system
//! - `display`: Terminal table formatting
//! - `cli`: Command handlers

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod ledger;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{LedgerError, LedgerResult};
