//! # Lyrion Genius Client
//!
//! Typed access to the Genius REST API: annotation (referent) lookups,
//! song search, song details and artist details. Every call is a single
//! request with a bounded timeout; failures come back as API-category
//! [`LyrionError`](lyrion_core::LyrionError)s naming the id or query involved.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod client;
mod dto;

pub use client::{GeniusClient, GeniusConfig};
