//! Easing curves and progress sub-windows.

pub(crate) mod ease;
pub(crate) mod window;
