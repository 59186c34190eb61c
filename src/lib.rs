//! Episodist - batch renamer and tagger for TV episode files
//!
//! This library crate exposes the engine for the binary and for integration testing.

pub mod config;
pub mod reconciler;
pub mod renamer;
pub mod report;
pub mod scanner;
pub mod sequencer;
