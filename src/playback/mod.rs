//! Host-signal driven playback of a sequence.

pub(crate) mod config;
pub(crate) mod controller;
