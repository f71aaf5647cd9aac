//! Shared library surface for the route exposure server and its tests.

pub mod aggregator;
pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod loops;
pub mod resolvers;
pub mod route_service;
pub mod state;
