use crate::{
    foundation::{
        core::{Breakpoint, Surface},
        math::rect_xywh,
    },
    layout::anchors::{AnchorSet, LayoutCalculator},
    sequences::guidance::config::{NarrowLayout, WideLayout},
};

/// Elements placed by the guidance layout. Every anchor is a rect.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum GuidanceAnchor {
    Input,
    Caption,
    /// Score vectors; both start at the same slot.
    SPlus,
    SMinus,
    Model,
    HighOut,
    LowOut,
    RegroupPlus,
    RegroupMinus,
    SubtractPlus,
    SubtractMinus,
    SubtractVector,
    ApplyPlus,
    ApplyVector,
    ApplyOutput,
    FinalOutput,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GuidanceLayout {
    pub narrow: NarrowLayout,
    pub wide: WideLayout,
}

impl GuidanceLayout {
    /// Canvas size for a container of `width` at `breakpoint`.
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

    fn narrow(&self, set: &mut AnchorSet<GuidanceAnchor>) {
        use GuidanceAnchor as A;
        let c = &self.narrow;
        let (w, h) = (set.surface().width, set.surface().height);

        let img = w * c.img_scale;
        let input_cx = w / 2.0;
        let input = set.put_rect(A::Input, rect_xywh(input_cx - img / 2.0, c.start_y, img, img));

        let cap_w = w * c.caption_scale;
        let caption = set.put_rect(
            A::Caption,
            rect_xywh(input_cx - cap_w / 2.0, input.y1 + c.img_to_caption, cap_w, c.caption_height),
        );

        let s_w = w * c.s_vector_scale;
        let s = rect_xywh(input_cx - s_w / 2.0, caption.y1 + c.caption_to_vector, s_w, c.s_vector_height);
        set.put_rect(A::SPlus, s);
        set.put_rect(A::SMinus, s);

        let model_w = w * c.model_scale;
        let model = set.put_rect(
            A::Model,
            rect_xywh(w / 2.0 - model_w / 2.0, s.y1 + c.vector_to_model, model_w, c.model_height),
        );

        let col_x = w / 2.0 - img / 2.0;
        let high = set.put_rect(A::HighOut, rect_xywh(col_x, model.y1 + c.model_to_output, img, img));
        let low = set.put_rect(A::LowOut, rect_xywh(col_x, high.y1 + c.between_outputs, img, img));

        set.put_rect(A::RegroupPlus, high);
        set.put_rect(A::RegroupMinus, low);

        let g = img * c.guidance_scale;
        let g_x = col_x + img / 2.0 - g / 2.0;
        let step = img + c.label_space + c.subtraction_spacing;
        let sub_plus = set.put_rect(A::SubtractPlus, rect_xywh(col_x, c.guidance_start_y, img, img));
        let sub_minus = set.put_rect(A::SubtractMinus, rect_xywh(col_x, sub_plus.y0 + step, img, img));
        set.put_rect(A::SubtractVector, rect_xywh(g_x, sub_minus.y0 + step + 30.0, g, g));

        let apply_plus = set.put_rect(A::ApplyPlus, rect_xywh(col_x, c.guidance_start_y, img, img));
        let apply_vec = set.put_rect(
            A::ApplyVector,
            rect_xywh(g_x, apply_plus.y0 + img + c.label_space + c.apply_spacing_top, g, g),
        );
        set.put_rect(
            A::ApplyOutput,
            rect_xywh(col_x, apply_vec.y1 + c.apply_spacing_bottom, img, img),
        );
        set.put_rect(
            A::FinalOutput,
            rect_xywh(col_x, h / 2.0 - img + c.final_center_offset, img, img),
        );
    }

    fn wide(&self, set: &mut AnchorSet<GuidanceAnchor>) {
        use GuidanceAnchor as A;
        let c = &self.wide;
        let (w, h) = (set.surface().width, set.surface().height);

        let img = c.img_size;
        let input_cx = w * c.input_x;
        let input = set.put_rect(A::Input, rect_xywh(input_cx - img / 2.0, h * c.start_y, img, img));
        let caption = set.put_rect(
            A::Caption,
            rect_xywh(input.x0, input.y1 + c.caption_spacing, img, c.caption_height),
        );

        let s = rect_xywh(
            input_cx - c.s_vector_width / 2.0,
            caption.y1 + c.s_vector_spacing,
            c.s_vector_width,
            c.s_vector_height,
        );
        set.put_rect(A::SPlus, s);
        set.put_rect(A::SMinus, s);

        let model = set.put_rect(
            A::Model,
            rect_xywh(
                w / 2.0 - c.model_width / 2.0,
                h / 2.0 - c.model_height / 2.0,
                c.model_width,
                c.model_height,
            ),
        );

        let out_x = model.x1 + c.output_offset_x;
        set.put_rect(A::HighOut, rect_xywh(out_x, h / 2.0 - img - c.output_offset_y, img, img));
        set.put_rect(A::LowOut, rect_xywh(out_x, h / 2.0 + c.output_offset_y, img, img));

        let row_y = h / 2.0 - img / 2.0;
        let regroup = w * c.regroup_spacing;
        set.put_rect(A::RegroupPlus, rect_xywh(w / 2.0 - regroup / 2.0 - img / 2.0, row_y, img, img));
        set.put_rect(A::RegroupMinus, rect_xywh(w / 2.0 + regroup / 2.0 - img / 2.0, row_y, img, img));

        let g = img * c.guidance_scale;
        let g_y = row_y + (img - g) / 2.0;
        let sub = w * c.subtraction_spacing;
        let sub_plus = set.put_rect(A::SubtractPlus, rect_xywh(c.margin, row_y, img, img));
        let sub_minus = set.put_rect(A::SubtractMinus, rect_xywh(sub_plus.x1 + sub, row_y, img, img));
        let arrow_x = sub_minus.x1 + sub * 0.8;
        set.put_rect(A::SubtractVector, rect_xywh(arrow_x + sub * 1.2, g_y, g, g));

        let apply = (w - c.margin * 2.0 - img * 2.0) / 4.0;
        let apply_plus = set.put_rect(A::ApplyPlus, rect_xywh(c.margin, row_y, img, img));
        set.put_rect(A::ApplyVector, rect_xywh(apply_plus.x1 + apply, g_y, g, g));
        set.put_rect(A::ApplyOutput, rect_xywh(w - c.margin - img, row_y, img, img));
        set.put_rect(A::FinalOutput, rect_xywh(w / 2.0 - img / 2.0, row_y, img, img));
    }
}

impl LayoutCalculator for GuidanceLayout {
    type Key = GuidanceAnchor;

    fn compute_anchors(&self, surface: Surface, breakpoint: Breakpoint) -> AnchorSet<GuidanceAnchor> {
        let mut set = AnchorSet::new(surface, breakpoint);
        match breakpoint {
            Breakpoint::Narrow => self.narrow(&mut set),
            Breakpoint::Wide => self.wide(&mut set),
        }
        set
    }
}
