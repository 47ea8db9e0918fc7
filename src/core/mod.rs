//! Core processing building blocks: background keying, sketch extraction,
//! resize and tensor codec, and the orchestrating pipeline. These are internal
//! primitives consumed by the high-level `api` module.
pub mod params;
pub mod processing;
