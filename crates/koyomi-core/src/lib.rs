//! Core state for service-timezone-aware date creation.
//!
//! Holds the pieces that live for the whole process: the timezone binding
//! registry, the service settings (default localization, system timezone,
//! service-timezone-by-default flag), and the configuration loader that
//! seeds them at startup.

pub mod config;
pub mod error;
pub mod registry;
pub mod settings;
