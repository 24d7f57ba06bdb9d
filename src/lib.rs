//! talentsift: resume screening backend.
//!
//! Ingests PDF resumes and free-text job descriptions, recovers structured
//! candidate fields from the documents, and produces bounded, always-valid
//! AI evaluations.

pub mod config;
pub mod database;
pub mod evaluation;
pub mod extraction;
pub mod types;
pub mod utils;
pub mod web;

pub use config::ConfigManager;
pub use web::start_web_server;
