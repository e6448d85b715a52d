//! Pixel effects applied to image sources before they are drawn.

pub(crate) mod noise;
