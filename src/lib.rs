//! # computer-catalog
//!
//! REST catalog of PC build records backed by PostgreSQL, with writes on a
//! primary and reads on a replica, plus a periodic sampler of request and
//! connection-pool metrics feeding a live dashboard.
//!
//! Each record carries a name, a price and a nested description document
//! (power supply, motherboard, video card, RAM, storage, case) stored as
//! `jsonb` and queried by JSON path.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST handlers (api/) ── request counter middleware
//!     │
//!     ├── ComputerReadService ──► replica DataSource ("leitura")
//!     ├── ComputerWriteService ─► primary DataSource ("<default>")
//!     │                               │
//!     │                               └── pool gauges
//!     │                                       │
//!     ├── MetricsRegistry ◄───────────────────┘
//!     │       ▲
//!     │       └── MetricsCollector (every 30 s) ──► MetricsStore (last 20)
//!     │                                                   │
//!     └── /ssr dashboard ◄────────────────────────────────┘
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod monitoring;
pub mod persistence;
pub mod service;
