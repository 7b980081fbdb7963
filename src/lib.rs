//! Scottish income tax calculation.
//!
//! [`core`] holds the pure calculation over a validated [`core::RateTable`]; [`cmd`] is the
//! command line front end built on top of it.

pub mod cmd;
pub mod core;
