//! AQI CLI - command line tools for the AQI route server.
//!
//! - route_query: plan routes between two cities and print an exposure summary

pub mod report;

pub use report::{parse_envelope, render_summary};
