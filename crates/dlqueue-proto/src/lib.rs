//! Wire types, configuration and platform paths shared by the dlqueue crates.

pub mod config;
pub mod platform;
pub mod protocol;
