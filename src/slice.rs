//! Slice header parsing: just the fields [`crate::poc::PocTracker`] needs.

use crate::nal::{NalUnit, NalUnitType};
use crate::sps::SeqParamSet;

/// Decoded slice-header fields. Created per slice, consumed by
/// [`crate::poc::PocTracker`]; not retained.
#[derive(Debug, Clone, Copy)]
pub struct SliceHeader {
    frame_num: u32,
    field_pic_flag: bool,
    bottom_field_flag: bool,
    pic_order_cnt_lsb: u32,
    delta_pic_order_cnt_bottom: i32,
}

impl SliceHeader {
    /// Parses `nal` as a slice header. Only NAL types 1 (non-IDR slice), 2
    /// (partition A) and 5 (IDR slice) begin with a slice header; anything
    /// else returns `None`. `sps` must be the SPS this slice refers to;
    /// `delta_present` is the PPS's
    /// `bottom_field_pic_order_in_frame_present_flag`.
    pub fn parse(nal: &NalUnit, sps: &SeqParamSet, delta_present: bool) -> Option<SliceHeader> {
        let nal_unit_type = nal.nal_unit_type();
        if !matches!(
            nal_unit_type,
            NalUnitType::Slice | NalUnitType::PartitionA | NalUnitType::IdrSlice
        ) {
            return None;
        }

        let mut r = nal.reader();
        r.skip(8); // NAL header byte.
        let _first_mb_in_slice = r.get_ue();
        let _slice_type = r.get_ue();
        let _pic_parameter_set_id = r.get_ue();

        let frame_num = r.get_word(sps.log2_max_frame_num());

        let mut field_pic_flag = false;
        let mut bottom_field_flag = false;
        if sps.interlaced() {
            field_pic_flag = r.get_bit() != 0;
            if field_pic_flag {
                bottom_field_flag = r.get_bit() != 0;
            }
        }

        if nal_unit_type == NalUnitType::IdrSlice {
            let _idr_pic_id = r.get_ue();
        }

        let mut pic_order_cnt_lsb = 0;
        let mut delta_pic_order_cnt_bottom = 0;
        if sps.poc_type() == 0 {
            pic_order_cnt_lsb = r.get_word(sps.log2_max_poc_lsb());
            if delta_present && !field_pic_flag {
                delta_pic_order_cnt_bottom = r.get_se();
            }
        }

        Some(SliceHeader {
            frame_num,
            field_pic_flag,
            bottom_field_flag,
            pic_order_cnt_lsb,
            delta_pic_order_cnt_bottom,
        })
    }

    pub fn frame_num(&self) -> u32 {
        self.frame_num
    }

    pub fn is_field(&self) -> bool {
        self.field_pic_flag
    }

    pub fn is_bottom(&self) -> bool {
        self.bottom_field_flag
    }

    pub fn pic_order_cnt_lsb(&self) -> u32 {
        self.pic_order_cnt_lsb
    }

    pub fn delta(&self) -> i32 {
        self.delta_pic_order_cnt_bottom
    }
}
