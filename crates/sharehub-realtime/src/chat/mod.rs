//! Chat operations exposed to transports.

pub mod service;
