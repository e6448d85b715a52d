//! Image assets and tabular data consumed by sequences.

pub(crate) mod decode;
pub(crate) mod rewards;
pub(crate) mod store;
