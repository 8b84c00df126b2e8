//! Delivery of transformed events to Telex.
//!
//! Messages are posted to a Telex channel webhook URL from a detached task,
//! so the GitHub request never waits on Telex.

pub mod client;

pub use client::{DeliveryError, TelexClient};
