//! Port for the third-party keto recipes API.
//!
//! Payloads are passed through untouched, so the port speaks
//! `serde_json::Value`.
use async_trait::async_trait;
use serde_json::Value;

use super::define_port_error;

define_port_error! {
    /// Failures raised by keto upstream adapters.
    pub enum KetoSourceError {
        /// The request could not be sent or the connection broke.
        Transport { message: String } => "keto transport failed: {message}",
        /// The request exceeded the configured timeout.
        Timeout { message: String } => "keto request timed out: {message}",
        /// The upstream answered with a non-success status.
        Status { status: u16, body: String } => "keto responded with status {status}: {body}",
        /// The upstream body was not valid JSON.
        Decode { message: String } => "keto response could not be decoded: {message}",
    }
}

/// Upstream category identifier; always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KetoCategoryId(u32);

impl KetoCategoryId {
    /// Accept identifiers of 1 or more.
    pub fn new(raw: u32) -> Option<Self> {
        (raw >= 1).then_some(Self(raw))
    }

    /// The raw identifier.
    pub fn get(self) -> u32 {
        self.0
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KetoRecipeSource: Send + Sync {
    /// List upstream recipe categories.
    async fn list_categories(&self) -> Result<Value, KetoSourceError>;

    /// List upstream recipes within a category.
    async fn list_recipes(&self, category: KetoCategoryId) -> Result<Value, KetoSourceError>;
}
