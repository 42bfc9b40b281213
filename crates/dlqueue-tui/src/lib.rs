//! Terminal client for a download queue server.
//!
//! The reconciliation engine (`poller`, `render`, `filter`, `dashboard` and
//! the two controllers) has no terminal dependency and is driven headlessly
//! in tests; `app` and `ui` put it on screen.

pub mod action;
pub mod api;
pub mod app;
pub mod dashboard;
pub mod error;
pub mod file_actions;
pub mod filter;
pub mod poller;
pub mod render;
pub mod submit;
pub mod theme;
pub mod ui;
pub mod view;
pub mod widgets;

#[cfg(test)]
pub(crate) mod testing;
