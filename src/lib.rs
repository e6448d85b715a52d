//! Choreo plays looping, stage-based procedural animations.
//!
//! A sequence is a fixed [`Timeline`] of stages, a breakpoint-aware
//! [`LayoutCalculator`] and a set of render handlers. Every frame is a pure
//! function of the sampled stage, its eased progress and the anchor set:
//!
//! - Build a sequence ([`GuidanceSequence`], [`TrainingSequence`] or
//!   [`TradeoffSequence`]) from its serde config
//! - Drive it with a [`PlaybackController`] fed by host visibility, click,
//!   resize and tick signals
//! - Execute the resulting [`FramePlan`] on a [`DrawSurface`] such as
//!   [`CpuSurface`], and position overlay labels through an
//!   [`OverlayPositioner`]
#![forbid(unsafe_code)]

pub(crate) mod animation;
pub(crate) mod assets;
pub(crate) mod effects;
pub(crate) mod foundation;
pub(crate) mod layout;
pub(crate) mod playback;
/// Frame plans, overlays and raster surfaces.
pub mod render;
/// Concrete sequences and the trait they implement.
pub mod sequences;
pub(crate) mod timeline;

pub use crate::animation::ease::Ease;
pub use crate::animation::window::{Window, fade_in, fade_in_out, fade_out_after};
pub use crate::assets::rewards::{RewardTable, frame_file_name, frame_window};
pub use crate::assets::store::{AssetProvider, NoAssets, PreparedAssetStore, PreparedImage};
pub use crate::effects::noise::{NoiseCompositor, NoiseParams};
pub use crate::foundation::core::{Breakpoint, Palette, Point, Rect, Rgba8, Surface, Vec2};
pub use crate::foundation::error::{ChoreoError, ChoreoResult};
pub use crate::foundation::math::{Rng64, clamp01, lerp, lerp_point, lerp_rect, value_noise};
pub use crate::layout::anchors::{Anchor, AnchorKey, AnchorSet, LayoutCalculator};
pub use crate::playback::config::PlaybackConfig;
pub use crate::playback::controller::PlaybackController;
pub use crate::render::cpu::CpuSurface;
pub use crate::render::overlay::{OverlayPositioner, RecordingOverlay};
pub use crate::render::plan::{DrawCommand, FrameBuilder, FramePlan};
pub use crate::render::surface::{DrawSurface, FrameRgba, render_plan};
pub use crate::sequences::guidance::{GuidanceConfig, GuidanceSequence};
pub use crate::sequences::tradeoff::{TradeoffConfig, TradeoffSequence};
pub use crate::sequences::training::{TrainingConfig, TrainingSequence};
pub use crate::sequences::{PhaseLabel, Sequence, StageInput};
pub use crate::timeline::clock::PlaybackClock;
pub use crate::timeline::dispatch::DispatchTable;
pub use crate::timeline::stage::{Stage, StageId, StageSample, Timeline};
