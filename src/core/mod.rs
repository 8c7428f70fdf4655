//! # Core Application Logic
//!
//! This module contains SortIt's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • Session + Repository │
//!                    └───────────┬─────────────┘
//!                                │
//!                    ┌───────────┴───────────┐
//!                    ▼                       ▼
//!             ┌────────────┐          ┌────────────┐
//!             │    TUI     │          │    CLI     │
//!             │  Adapter   │          │ (main.rs)  │
//!             │ (ratatui)  │          │            │
//!             └────────────┘          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`session`]: One sorting pass, built from [`sequencer`], [`router`] and [`ledger`]
//! - [`repository`]: Durable photos, albums and settings over a [`store`]
//! - [`import`], [`capture`], [`export`], [`gallery`]: collection management

pub mod action;
pub mod capture;
pub mod config;
pub mod error;
pub mod export;
pub mod gallery;
pub mod import;
pub mod ledger;
pub mod model;
pub mod repository;
pub mod router;
pub mod sequencer;
pub mod session;
pub mod state;
pub mod store;
