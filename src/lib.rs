//! Client library for the IRIS ML-guided LLVM optimization service.
//!
//! Talks to the service's REST endpoints, derives the client-side
//! comparison between an ML-predicted pass sequence and the standard
//! -O0..-O3 builds, and formats the numbers for display.

pub mod analysis;
pub mod cli;
pub mod error;
pub mod file_manager;
pub mod format;
pub mod models;
pub mod samples;
pub mod service;
pub mod utils;
pub mod workflow;
