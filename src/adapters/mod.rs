//! Adapter implementations of the port traits.
//!
//! `live` talks to the real disk and native tools, `recording` wraps live
//! adapters and captures a cassette, `replaying` serves a cassette back.

pub mod live;
pub mod recording;
pub mod replaying;
