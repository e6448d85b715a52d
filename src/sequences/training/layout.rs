use crate::{
    foundation::{
        core::{Breakpoint, Rect, Surface},
        math::rect_xywh,
    },
    layout::anchors::{AnchorSet, LayoutCalculator},
    sequences::training::config::{NarrowLayout, WideLayout},
};

const PANEL_PAD: f64 = 8.0;
const PANEL_HEADER: f64 = 16.0;
const ROW_GAP: f64 = 6.0;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TrainingAnchor {
    Image,
    Caption,
    Rewards,
    /// One reward model inside the panel: a column when narrow, a row when wide.
    RewardRow(usize),
    Vector,
    Model,
    Output,
    /// Where the score vector rests next to the input.
    LeftVector,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrainingLayout {
    pub narrow: NarrowLayout,
    pub wide: WideLayout,
    pub reward_count: usize,
}

impl TrainingLayout {
    /// Canvas size for a container of `width`. The wide canvas shrinks to the
    /// content when the container is roomier than needed.
    pub fn canvas(&self, width: f64, breakpoint: Breakpoint) -> (f64, f64) {
        match breakpoint {
            Breakpoint::Narrow => (
                width,
                self.narrow.min_height.max(width * self.narrow.height_multiplier),
            ),
            Breakpoint::Wide => {
                let c = &self.wide;
                let img = (width * c.img_scale).min(c.max_img_width);
                let model = c.model_min_width.max(width * c.model_scale);
                let content = c.margin * 2.0
                    + img * 2.0
                    + model
                    + c.model_offset_x
                    + c.output_offset_x;
                let w = content.min(width);
                (w, c.min_height.max((w * c.height_multiplier).round()))
            }
        }
    }

    fn rows(&self, set: &mut AnchorSet<TrainingAnchor>, panel: Rect, narrow: bool) {
        let n = self.reward_count.max(1);
        let n_f = n as f64;
        let x = panel.x0 + PANEL_PAD;
        let y = panel.y0 + PANEL_PAD + PANEL_HEADER;
        let w = panel.width() - PANEL_PAD * 2.0;
        let h = panel.height() - (PANEL_PAD * 2.0 + PANEL_HEADER);
        for i in 0..n {
            let r = if narrow {
                let col = (w - ROW_GAP * (n_f - 1.0)) / n_f;
                rect_xywh(x + i as f64 * (col + ROW_GAP), y, col, h)
            } else {
                let row = (h - ROW_GAP * (n_f - 1.0)) / n_f;
                rect_xywh(x, y + i as f64 * (row + ROW_GAP), w, row)
            };
            set.put_rect(TrainingAnchor::RewardRow(i), r);
        }
    }

    fn narrow(&self, set: &mut AnchorSet<TrainingAnchor>) {
        use TrainingAnchor as A;
        let c = &self.narrow;
        let w = set.surface().width;
        let centered = |width: f64, y: f64, height: f64| rect_xywh(w / 2.0 - width / 2.0, y, width, height);

        let img_w = (w * c.img_scale).min(c.img_max);
        let img = set.put_rect(A::Image, centered(img_w, c.start_y, img_w * c.aspect));
        let cap = set.put_rect(
            A::Caption,
            rect_xywh(img.x0, img.y1 + c.img_to_caption, img_w, c.caption_height),
        );
        let rewards = set.put_rect(
            A::Rewards,
            centered(
                (w * c.rewards_scale).min(c.rewards_max),
                cap.y1 + c.caption_to_rewards,
                c.rewards_height,
            ),
        );
        self.rows(set, rewards, true);
        let vector = set.put_rect(
            A::Vector,
            centered(
                (w * c.vector_scale).min(c.vector_max),
                rewards.y1 + c.rewards_to_vector,
                c.vector_height,
            ),
        );
        let model = set.put_rect(
            A::Model,
            centered(
                (w * c.model_scale).min(c.model_max),
                vector.y1 + c.vector_to_model,
                c.model_height,
            ),
        );
        set.put_rect(A::Output, centered(img_w, model.y1 + c.model_to_output, img.height()));
        set.put_rect(A::LeftVector, vector);
    }

    fn wide(&self, set: &mut AnchorSet<TrainingAnchor>) {
        use TrainingAnchor as A;
        let c = &self.wide;
        let (w, h) = (set.surface().width, set.surface().height);

        let img_w = (w * c.img_scale).min(c.max_img_width);
        let img_h = img_w * c.aspect;
        let img = set.put_rect(A::Image, rect_xywh(c.margin, h * c.img_y, img_w, img_h));
        let cap = set.put_rect(
            A::Caption,
            rect_xywh(c.margin, img.y1 + c.caption_spacing, img_w, c.caption_height),
        );
        let panel_h = img_h + cap.height() + 35.0;
        let rewards = set.put_rect(
            A::Rewards,
            rect_xywh(
                img.x1 + c.rewards_offset_x,
                img.y0 + c.rewards_offset_y,
                c.rewards_min_width.max(w * c.rewards_scale),
                panel_h,
            ),
        );
        self.rows(set, rewards, false);
        set.put_rect(
            A::Vector,
            rect_xywh(
                rewards.x1 + c.vector_offset_x,
                rewards.y0,
                c.vector_min_width.max(w * c.vector_scale),
                panel_h,
            ),
        );
        let model = set.put_rect(
            A::Model,
            rect_xywh(
                img.x1 + c.model_offset_x,
                rewards.y0,
                c.model_min_width.max(w * c.model_scale),
                panel_h,
            ),
        );
        set.put_rect(
            A::Output,
            rect_xywh(
                model.x1 + c.output_offset_x,
                model.center().y - img_h / 2.0,
                img_w,
                img_h,
            ),
        );
        let lv_h = c.left_vector_height;
        set.put_rect(
            A::LeftVector,
            rect_xywh(
                img.x0,
                (c.margin + 10.0).max(img.y0 - lv_h - c.left_vector_gap),
                img_w * c.left_vector_scale,
                lv_h,
            ),
        );
    }
}

impl LayoutCalculator for TrainingLayout {
    type Key = TrainingAnchor;

    fn compute_anchors(&self, surface: Surface, breakpoint: Breakpoint) -> AnchorSet<TrainingAnchor> {
        let mut set = AnchorSet::new(surface, breakpoint);
        match breakpoint {
            Breakpoint::Narrow => self.narrow(&mut set),
            Breakpoint::Wide => self.wide(&mut set),
        }
        set
    }
}
