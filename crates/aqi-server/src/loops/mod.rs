//! Background loops for continuous processing.

pub mod cache_sweep_loop;
