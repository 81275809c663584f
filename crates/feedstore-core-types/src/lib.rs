//! Core types shared across the feedstore facilities
//!
//! Holds the canonical field keys and event names used by the logging
//! facility and by anything that asserts on captured log events.

pub mod schema;
