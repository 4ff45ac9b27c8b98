use std::path::Path;

use image::io::Reader as ImageReader;

use crate::engine::error::{ViewerError, ViewerResult};

/// Decoded image as tightly packed RGBA8 rows, top row first.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Decodes any supported format, sniffing the content so extensionless
/// cube-map faces load too.
pub fn decode_image(path: &Path) -> ViewerResult<DecodedImage> {
    let reader = ImageReader::open(path)
        .map_err(|source| ViewerError::Io { path: path.to_path_buf(), source })?
        .with_guessed_format()
        .map_err(|source| ViewerError::Io { path: path.to_path_buf(), source })?;
    let img = reader
        .decode()
        .map_err(|source| ViewerError::ImageDecode { path: path.to_path_buf(), source })?;

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    log::debug!("decoded {} ({}x{}, {:?})", path.display(), width, height, img.color());

    Ok(DecodedImage { width, height, pixels: rgba.into_raw() })
}
