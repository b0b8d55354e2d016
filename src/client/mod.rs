//! Clients for the two service contracts
//!
//! The JSON `/infer` endpoint and the legacy multipart photo endpoint return
//! unrelated shapes, so each gets its own client rather than a shared schema.

pub mod infer;
pub mod legacy;

pub use infer::InferClient;
pub use legacy::LegacyClient;

use std::future::Future;

use crate::error::OverlayError;
use crate::model::{InferRequest, InferResult};

/// Anything that can answer an inference request
pub trait InferenceService {
    /// Send one request and return the parsed response, including
    /// `success: false` answers
    fn infer(
        &self,
        request: &InferRequest,
    ) -> impl Future<Output = Result<InferResult, OverlayError>> + Send;
}

/// Cap on how much of an error body ends up in messages
const MAX_ERROR_BODY: usize = 512;

fn truncate_body(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    match text.char_indices().nth(MAX_ERROR_BODY) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.into_owned(),
    }
}
