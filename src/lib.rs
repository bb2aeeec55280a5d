//! wpctl — an interactive terminal client for WordPress accounts, sites,
//! and installs.
//!
//! This library exposes the core modules for use by the binary and by tests.

pub mod app;
pub mod config;
pub mod error;
pub mod gateway;
pub mod input;
pub mod model;
pub mod view;
