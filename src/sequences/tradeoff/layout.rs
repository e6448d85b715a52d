use crate::{
    foundation::{
        core::{Breakpoint, Point, Surface},
        math::rect_xywh,
    },
    layout::anchors::{AnchorSet, LayoutCalculator},
    sequences::tradeoff::config::{NarrowLayout, WideLayout},
};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TradeoffAnchor {
    /// Top center of the prompt text; a point.
    Prompt,
    Vector,
    Model,
    Output,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TradeoffLayout {
    pub narrow: NarrowLayout,
    pub wide: WideLayout,
}

impl TradeoffLayout {
    pub fn canvas(&self, width: f64, breakpoint: Breakpoint) -> (f64, f64) {
        match breakpoint {
            Breakpoint::Narrow => (
                width,
                self.narrow.min_height.max(width * self.narrow.height_multiplier),
            ),
            Breakpoint::Wide => {
                let w = self.wide.max_width.min(width);
                (w, self.wide.min_height.max((w * self.wide.height_ratio).round()))
            }
        }
    }

    fn narrow(&self, set: &mut AnchorSet<TradeoffAnchor>) {
        use TradeoffAnchor as A;
        let c = &self.narrow;
        let cx = set.surface().width / 2.0;

        let prompt = set.put_point(A::Prompt, Point::new(cx, c.margin + 20.0));
        let vector = set.put_rect(
            A::Vector,
            rect_xywh(
                cx - c.vector_width / 2.0,
                prompt.y + c.prompt_height + c.prompt_to_vector,
                c.vector_width,
                c.vector_height,
            ),
        );
        let model = set.put_rect(
            A::Model,
            rect_xywh(
                cx - c.model_width / 2.0,
                vector.y1 + c.vector_to_model,
                c.model_width,
                c.model_height,
            ),
        );
        set.put_rect(
            A::Output,
            rect_xywh(
                cx - c.output_size / 2.0,
                model.y1 + c.model_to_output,
                c.output_size,
                c.output_size,
            ),
        );
    }

    fn wide(&self, set: &mut AnchorSet<TradeoffAnchor>) {
        use TradeoffAnchor as A;
        let c = &self.wide;
        let (cx, cy) = (set.surface().width / 2.0, set.surface().height / 2.0);

        set.put_point(A::Prompt, Point::new(cx, c.margin + 10.0));
        let model = set.put_rect(
            A::Model,
            rect_xywh(
                cx - c.model_width / 2.0,
                cy - c.model_height / 2.0,
                c.model_width,
                c.model_height,
            ),
        );
        set.put_rect(
            A::Vector,
            rect_xywh(
                model.x0 - c.vector_width - c.spacing,
                cy - c.vector_height / 2.0,
                c.vector_width,
                c.vector_height,
            ),
        );
        set.put_rect(
            A::Output,
            rect_xywh(
                model.x1 + c.spacing,
                cy - c.output_size / 2.0,
                c.output_size,
                c.output_size,
            ),
        );
    }
}

impl LayoutCalculator for TradeoffLayout {
    type Key = TradeoffAnchor;

    fn compute_anchors(&self, surface: Surface, breakpoint: Breakpoint) -> AnchorSet<TradeoffAnchor> {
        let mut set = AnchorSet::new(surface, breakpoint);
        match breakpoint {
            Breakpoint::Narrow => self.narrow(&mut set),
            Breakpoint::Wide => self.wide(&mut set),
        }
        set
    }
}
