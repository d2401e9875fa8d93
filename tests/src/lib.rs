//! # Data API Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── mod.rs            # Seeded collaborators and server fixtures
//!     ├── http_contract.rs  # Router-level contract (status, body, cache headers)
//!     └── live_server.rs    # Real socket via reqwest (CORS, shutdown)
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p dataapi-tests
//!
//! # By category
//! cargo test -p dataapi-tests integration::http_contract::
//! cargo test -p dataapi-tests integration::live_server::
//! ```

#![allow(dead_code)]

pub mod integration;
