//! # DocuChat
//!
//! A minimal backend for a document chat client. Users upload plaintext
//! documents and ask questions; the answers are placeholders until
//! retrieval-augmented generation lands.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │  HTTP (axum) │──▶│   Agents     │   │ Static files │
//! │  /api/*      │   │ search/create│   │  /*          │
//! └──────┬───────┘   └──────┬───────┘   └──────────────┘
//!        │                  │
//!        ▼                  ▼
//!   ┌──────────────────────────┐
//!   │  Store (in memory)       │
//!   │  documents · chat history│
//!   └──────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! docuchat serve                          # defaults, port 5000
//! PORT=8080 docuchat serve                # port from the environment
//! docuchat --config docuchat.toml serve   # settings from a file
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Documents and chat messages |
//! | [`store`] | Storage trait and in-memory backend |
//! | [`agents`] | Chat agents, one per agent kind |
//! | [`upload`] | Upload validation |
//! | [`server`] | HTTP server |

pub mod agents;
pub mod config;
pub mod models;
pub mod server;
pub mod store;
pub mod upload;
