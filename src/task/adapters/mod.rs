//! Adapter implementations for the document store port.

pub mod memory;
pub mod postgres;
