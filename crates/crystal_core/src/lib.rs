pub mod catalog;
pub mod checksum;
pub mod codec;
pub mod core_api;
pub mod dvs;
pub mod edit;
pub mod image;
pub mod layout;
pub mod reader;
pub mod text;
pub mod transaction;

use core_api::CoreError;
use image::SaveImage;

/// Checks the length invariant and wraps `bytes` as a save image.
pub fn load_image(bytes: &[u8]) -> Result<SaveImage, CoreError> {
    SaveImage::from_bytes(bytes)
}

pub fn serialize(image: &SaveImage) -> Vec<u8> {
    image.to_bytes()
}
