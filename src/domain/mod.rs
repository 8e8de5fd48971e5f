//! Domain types and ports shared by every probe.

pub mod config;
pub mod envelope;
pub mod log;
pub mod payment;
pub mod ports;
pub mod widget;
