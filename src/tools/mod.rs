//! The tools module provides helper functions for huff.
//!
//! The tools are:
//! - cli: Command line interface and the options it produces.
//! - freq_count: Frequency count of the input bytes.
//!
pub mod cli;
pub mod freq_count;
