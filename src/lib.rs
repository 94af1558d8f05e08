// src/lib.rs

pub mod config;
pub mod engine;
pub mod error;
pub mod mapper;
pub mod query;
pub mod record;
pub mod service;
pub mod stats;
pub mod store;

pub use config::Config;
pub use engine::DeliveryEngine;
pub use error::{EngineError, LoadError, QueryError};
pub use query::Selection;
pub use record::{DeliveryRecord, Field, RecordSet, Statistics};
