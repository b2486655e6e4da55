//! Startup and shutdown of the server

pub mod shutdown;
pub mod startup;
