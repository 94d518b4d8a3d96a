//! Core domain: configuration, data model, completion client, logging.

pub mod completion;
pub mod config;
pub mod http;
pub mod logging;
pub mod models;
