//! Serial command protocol.
//!
//! Fixed 8-byte request/response frames; one request answered per tick.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      Protocol stack                      │
//! │                                                          │
//! │  ┌───────────┐   ┌──────────┐   ┌──────────────────────┐ │
//! │  │ Transport │──▶│  Codec   │──▶│ Engine (dispatcher)  │ │
//! │  │  (trait)  │   │ (fields) │   │  → scheduler state   │ │
//! │  └───────────┘   └──────────┘   └──────────────────────┘ │
//! │       ▲                                   │              │
//! │       └───────────── response ────────────┘              │
//! │                                                          │
//! │  Client: the host end of the same frames                 │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod client;
pub mod codec;
pub mod engine;
pub mod transport;
