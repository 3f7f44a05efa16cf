#![warn(clippy::all, missing_docs)]

//! Core logic for the spending tracker.
//!
//! This crate hosts the dynamic menu engine, the console it drives,
//! configuration handling, the session object, and the record layer
//! (models, JSON store, validators and report arithmetic) used by the
//! interactive front end.

pub mod config;
pub mod console;
pub mod error;
pub mod menu;
pub mod models;
pub mod report;
pub mod session;
pub mod store;
pub mod validate;

pub use config::AppConfig;
pub use console::Console;
pub use error::{TrackerError, ValidationError};
pub use menu::{Menu, MenuHost};
pub use models::{Purchase, User};
pub use session::Session;
pub use store::UserStore;
