//! Client for an OCR + translation service.
//!
//! An image is sent base64-encoded to the service's `/infer` endpoint and the
//! detected lines come back with bounding boxes plus original and translated
//! text. [`render`] composes those lines over the image; [`session`] holds the
//! control state that drives submissions and redraws.

pub mod client;
pub mod config;
pub mod error;
pub mod languages;
pub mod model;
pub mod output;
pub mod render;
pub mod session;
pub mod source;

pub use client::{InferClient, InferenceService, LegacyClient};
pub use config::ClientConfig;
pub use error::OverlayError;
pub use model::{BBox, InferRequest, InferResult, LegacyTranslation, Page, TextLine};
pub use render::{CanvasSize, OverlayProps, OverlayView, TextMode};
pub use session::{ControlState, Notifier, Summary};
pub use source::SourceImage;
