use anyhow::Context;

use crate::{assets::store::PreparedImage, foundation::error::ChoreoResult};

/// Decode encoded image bytes into straight-alpha RGBA8.
///
/// Pixels stay unpremultiplied so the noise compositor can operate on true
/// channel values; raster backends premultiply when uploading.
pub fn decode_image(bytes: &[u8]) -> ChoreoResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    Ok(PreparedImage::from_rgba(dyn_img.to_rgba8()))
}

/// Premultiply straight RGBA8 in place.
pub fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
