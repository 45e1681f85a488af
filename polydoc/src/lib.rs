//! Command line front-end for `polydoc-commonmark`. The modules are public so
//! the integration tests can drive the same code paths as the binary.
pub mod cli;
pub mod config;
pub mod error;
pub mod render;
