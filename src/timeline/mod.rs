//! Stage timelines, sampling and the playback clock.

pub(crate) mod clock;
pub(crate) mod dispatch;
pub(crate) mod stage;
