//! Careers catalog, application intake, and department dashboard client.
//!
//! Every piece of business state lives behind two remote HTTP endpoints; this crate keeps the
//! client-side view of that state and the flows that submit forms against it.

pub mod careers;
pub mod config;
pub mod department;
pub mod error;
pub mod forms;
mod http;
pub mod notify;
pub mod sandbox;
pub mod telemetry;
