//! Collections Desk Client Library
//!
//! Client-side engine for the loan-collections back-office dashboard: month
//! resolution against a loan's repayment schedule, merged per-month
//! application views, optimistic field mutations with rollback, and the REST
//! client for the collections backend.

pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod merge;
pub mod models;
pub mod month;
pub mod mutation;
pub mod resolver;
pub mod session;

pub use config::Config;
pub use dashboard::Dashboard;
pub use error::{Error, Result};
pub use merge::{ApplicationView, ViewKey};
pub use month::EmiMonth;
pub use mutation::{Field, FieldChange, MutationPhase};
pub use resolver::{MonthResolver, Resolution, ResolutionSource, ResolveRequest};
pub use session::{MonthSelection, Session};
