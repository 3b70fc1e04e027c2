//! # dermalens-analysis
//!
//! Vision-model invocation and reply normalization for the Dermalens
//! service.
//!
//! The upstream model is an opaque external capability: it takes an image
//! plus prompt and returns raw text. This crate owns the seam to that
//! capability and the normalization that turns its unguaranteed reply
//! format into a fixed four-field record shape.
//!
//! ## Modules
//!
//! - [`report`] - Structured result types
//! - [`normalize`] - Layered-fallback reply parsing
//! - [`vision`] - Model collaborator trait and the OpenAI-compatible client
//! - [`analyzer`] - The invoke-then-normalize pipeline

pub mod analyzer;
pub mod error;
pub mod normalize;
pub mod report;
pub mod vision;

pub use analyzer::Analyzer;
pub use error::AnalysisError;
pub use normalize::normalize;
pub use report::{AnalysisReport, Severity};
pub use vision::{ImageData, OpenAiVision, PatientContext, VisionConfig, VisionModel};
