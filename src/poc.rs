//! Stateful Picture Order Count (POC) reconstruction.
//!
//! Not general-purpose: this implements only `pic_order_cnt_type == 0`, and
//! does not detect memory-management-control-operation 5, matching the
//! limitations of the source this crate's POC math is ported from. Callers
//! needing full POC type 1/2 support are out of scope.

use log::debug;

use crate::avcc::AvcCHeader;
use crate::nal::{NalUnit, NalUnitType};
use crate::pps::PicParamSet;
use crate::slice::SliceHeader;
use crate::sps::SeqParamSet;

/// Reconstructs POC values across a coded video sequence.
///
/// Create one fresh `PocTracker` per elementary stream, not per GOP: state
/// (`prev_poc_lsb`/`prev_poc_msb`) is carried forever except across an IDR,
/// which resets it.
pub struct PocTracker {
    sps: SeqParamSet,
    bottom_field_pic_order_present: bool,
    prev_lsb: i64,
    prev_msb: i64,
    frame_num: u32,
    last_lsb: u32,
}

impl PocTracker {
    /// Parses the SPS/PPS retained in `avcc` and resets tracker state.
    ///
    /// `pic_order_cnt_type` 1 and 2 are accepted here, same as the source
    /// this is ported from: `get_poc` below still runs its type-0 math
    /// against whatever `pic_order_cnt_lsb` it's handed (0, since
    /// [`crate::slice::SliceHeader::parse`] only reads that field for type
    /// 0), producing a degenerate but defined POC rather than failing the
    /// whole stream. Computing correct POCs for types 1/2 is out of scope.
    pub fn set_header(avcc: &AvcCHeader) -> Option<PocTracker> {
        let sps_nal = avcc.sps()?;
        let sps = SeqParamSet::parse(sps_nal)?;
        if sps.poc_type() != 0 {
            debug!(
                "poc tracker: poc_type {} accepted but not computed (type-0 only)",
                sps.poc_type()
            );
        }
        let pps_nal = avcc.pps()?;
        let pps = PicParamSet::parse(pps_nal)?;
        Some(PocTracker {
            sps,
            bottom_field_pic_order_present: pps.bottom_field_pic_order_in_frame_present_flag(),
            prev_lsb: 0,
            prev_msb: 0,
            frame_num: 0,
            last_lsb: 0,
        })
    }

    /// Attempts to parse `nal` as a slice header and compute its POC.
    /// Returns `None` if `nal` isn't a slice NAL.
    pub fn get_poc(&mut self, nal: &NalUnit) -> Option<i64> {
        let slice = SliceHeader::parse(nal, &self.sps, self.bottom_field_pic_order_present)?;
        self.frame_num = slice.frame_num();

        let max_lsb = 1i64 << self.sps.log2_max_poc_lsb();
        let is_idr = nal.nal_unit_type() == NalUnitType::IdrSlice;

        let (mut prev_lsb, mut prev_msb) = (self.prev_lsb, self.prev_msb);
        if is_idr {
            prev_lsb = 0;
            prev_msb = 0;
        }

        let lsb = i64::from(slice.pic_order_cnt_lsb());
        let msb = if lsb < prev_lsb && (prev_lsb - lsb) >= max_lsb / 2 {
            prev_msb + max_lsb
        } else if lsb > prev_lsb && (lsb - prev_lsb) > max_lsb / 2 {
            prev_msb - max_lsb
        } else {
            prev_msb
        };

        if nal.is_ref_pic() {
            self.prev_lsb = lsb;
            self.prev_msb = msb;
        }

        self.last_lsb = slice.pic_order_cnt_lsb();
        Some(msb + lsb)
    }

    pub fn frame_num(&self) -> u32 {
        self.frame_num
    }

    pub fn last_lsb(&self) -> u32 {
        self.last_lsb
    }
}
