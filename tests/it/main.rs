//! Single test binary entry point.
//!
//! All integration tests compile into one binary to keep link times down.
//!
//! Structure:
//! - helpers: Board builder and fixtures
//! - unit: Single-component tests against the public API
//! - integration: Multi-component workflows through `Board`

mod helpers;
