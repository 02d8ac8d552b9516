//! Keto recipes outbound adapter.
//!
//! A thin HTTP implementation of the `KetoRecipeSource` port against the
//! RapidAPI-hosted keto diet API.

mod http_source;

pub use http_source::{KetoHttpIdentity, KetoHttpSource};
