//! Minimal Picture Parameter Set parsing: just enough to feed
//! [`crate::poc::PocTracker`].

use crate::nal::{NalUnit, NalUnitType};

/// The handful of PPS fields this crate needs. Everything past
/// `bottom_field_pic_order_in_frame_present_flag` is out of scope: no
/// slice-group, no rate-control, no deblocking-filter syntax.
#[derive(Debug, Clone, Copy)]
pub struct PicParamSet {
    bottom_field_pic_order_in_frame_present_flag: bool,
}

impl PicParamSet {
    pub fn parse(nal: &NalUnit) -> Option<PicParamSet> {
        if nal.nal_unit_type() != NalUnitType::Pps {
            return None;
        }
        let mut r = nal.reader();
        r.skip(8); // NAL header byte.
        let _pic_parameter_set_id = r.get_ue();
        let _seq_parameter_set_id = r.get_ue();
        r.skip(1); // entropy_coding_mode_flag
        let bottom_field_pic_order_in_frame_present_flag = r.get_bit() != 0;
        Some(PicParamSet {
            bottom_field_pic_order_in_frame_present_flag,
        })
    }

    pub fn bottom_field_pic_order_in_frame_present_flag(&self) -> bool {
        self.bottom_field_pic_order_in_frame_present_flag
    }
}
