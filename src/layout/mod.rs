//! Breakpoint-resolved anchors and the layout calculator seam.

pub(crate) mod anchors;
