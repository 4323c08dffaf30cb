//! Jita (Jira Issue and Time Assistant) - a command-line companion for
//! working with tracker issues without leaving the terminal.
//!
//! This library provides the core functionality for jita, including:
//! - TOML configuration loading and validation
//! - The single-active-issue session state machine and its marker store
//! - Elapsed-time accounting and lifecycle hook execution
//! - A blocking client for the tracker's REST API
//! - Workflow-stage ordering plus plain-list and kanban rendering
//! - CLI command parsing and execution
//!
//! # Example
//!
//! ```no_run
//! use jita::cli::run;
//!
//! fn main() {
//!     if let Err(e) = run() {
//!         eprintln!("Error: {}", e);
//!         std::process::exit(1);
//!     }
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod session;
pub mod tracker;
pub mod workflow;
