//! Service modules for the analysis pipeline
//!
//! - `image_validator`: local type/size checks before preview and submit
//! - `preview`: temporary preview copy of the selected file
//! - `upload_client`: HTTP contract with the inference service

pub mod image_validator;
pub mod preview;
pub mod upload_client;

pub use image_validator::{ImageValidator, Rejection, RejectionReason, MAX_IMAGE_BYTES};
pub use preview::PreviewHandle;
pub use upload_client::{HealthStatus, UploadClient};
