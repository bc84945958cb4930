//! Sequence Parameter Set parsing.

use log::debug;

use crate::nal::{NalUnit, NalUnitType};

/// Profiles whose SPS carries the chroma-format / bit-depth / scaling-matrix
/// block (Table in ISO/IEC 14496-10 section 7.3.2.1.1).
const PROFILES_WITH_CHROMA_INFO: [u8; 9] = [44, 83, 86, 100, 110, 118, 122, 128, 244];

/// A cropping rectangle in pixels, relative to the encoded frame. Plain
/// left/top/right/bottom fields in every build: the platform rectangle type
/// the original source used under one OS is a portability artifact, not
/// part of the semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CropRect {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl CropRect {
    fn is_empty(&self) -> bool {
        *self == CropRect::default()
    }
}

/// Decoded Sequence Parameter Set fields needed for slice-header parsing
/// and POC reconstruction. Holds no reference to the source buffer.
#[derive(Debug, Clone)]
pub struct SeqParamSet {
    profile_idc: u8,
    constraint_flags: u8,
    level_idc: u8,
    log2_max_frame_num: u32,
    poc_type: u32,
    log2_max_poc_lsb: u32,
    encoded_width: u32,
    encoded_height: u32,
    interlaced: bool,
    crop: CropRect,
}

impl SeqParamSet {
    /// Parses `nal` as a Sequence Parameter Set. Returns `None` if `nal`
    /// isn't SPS-typed, if `poc_type` isn't in `{0, 1, 2}`, or if the
    /// decoded dimensions exceed the 2000-pixel smoke-test bound.
    pub fn parse(nal: &NalUnit) -> Option<SeqParamSet> {
        if nal.nal_unit_type() != NalUnitType::Sps {
            return None;
        }
        let mut r = nal.reader();
        r.skip(8); // NAL header byte.

        let profile_idc = r.get_word(8) as u8;
        let constraint_flags = r.get_word(8) as u8;
        let level_idc = r.get_word(8) as u8;
        let _seq_parameter_set_id = r.get_ue();

        if PROFILES_WITH_CHROMA_INFO.contains(&profile_idc) {
            let chroma_format_idc = r.get_ue();
            if chroma_format_idc == 3 {
                r.skip(1); // separate_colour_plane_flag
            }
            let _bit_depth_luma_minus8 = r.get_ue();
            let _bit_depth_chroma_minus8 = r.get_ue();
            r.skip(1); // qpprime_y_zero_transform_bypass_flag
            let seq_scaling_matrix_present = r.get_bit() != 0;
            if seq_scaling_matrix_present {
                let max_scaling_lists = if chroma_format_idc == 3 { 12 } else { 8 };
                for i in 0..max_scaling_lists {
                    if r.get_bit() != 0 {
                        let size = if i < 6 { 16 } else { 64 };
                        scaling_list(&mut r, size);
                    }
                }
            }
        }

        let log2_max_frame_num = r.get_ue() + 4;
        let poc_type = r.get_ue();
        let mut log2_max_poc_lsb = 0;
        match poc_type {
            0 => {
                log2_max_poc_lsb = r.get_ue() + 4;
            }
            1 => {
                r.skip(1); // delta_pic_order_always_zero_flag
                let _offset_for_non_ref_pic = r.get_se();
                let _offset_for_top_to_bottom_field = r.get_se();
                let num_ref_frames_in_cycle = r.get_ue();
                for _ in 0..num_ref_frames_in_cycle {
                    let _offset_for_ref_frame = r.get_se();
                }
            }
            2 => {
                // No additional data in the stream for poc_type 2.
            }
            other => {
                debug!("rejecting sps: unsupported pic_order_cnt_type {}", other);
                return None;
            }
        }

        let _num_ref_frames = r.get_ue();
        let _gaps_in_frame_num_value_allowed_flag = r.get_bit();

        let pic_width_in_mbs_minus1 = r.get_ue();
        let pic_height_in_map_units_minus1 = r.get_ue();
        let mut width = (pic_width_in_mbs_minus1 + 1) * 16;
        let mut height = (pic_height_in_map_units_minus1 + 1) * 16;

        if width > 2000 || height > 2000 {
            debug!("rejecting sps: {}x{} exceeds smoke-test bound", width, height);
            return None;
        }

        let frame_mbs_only_flag = r.get_bit() != 0;
        if !frame_mbs_only_flag {
            r.skip(1); // mb_adaptive_frame_field_flag
        }
        r.skip(1); // direct_8x8_inference_flag

        let frame_cropping_flag = r.get_bit() != 0;
        let mut crop = CropRect::default();
        if frame_cropping_flag {
            let left = r.get_ue() * 2;
            let right_offset = r.get_ue() * 2;
            let top = r.get_ue() * 2;
            let bottom_offset = r.get_ue() * 2;
            crop = CropRect {
                left,
                top,
                right: width - right_offset,
                bottom: height - bottom_offset,
            };
        }

        if !frame_mbs_only_flag {
            height *= 2;
            if frame_cropping_flag {
                crop.top *= 2;
                crop.bottom *= 2;
            }
        }

        Some(SeqParamSet {
            profile_idc,
            constraint_flags,
            level_idc,
            log2_max_frame_num,
            poc_type,
            log2_max_poc_lsb,
            encoded_width: width,
            encoded_height: height,
            interlaced: !frame_mbs_only_flag,
            crop,
        })
    }

    pub fn profile(&self) -> u8 {
        self.profile_idc
    }

    pub fn level(&self) -> u8 {
        self.level_idc
    }

    pub fn compat(&self) -> u8 {
        self.constraint_flags
    }

    pub fn log2_max_frame_num(&self) -> u32 {
        self.log2_max_frame_num
    }

    pub fn poc_type(&self) -> u32 {
        self.poc_type
    }

    /// Only meaningful when `poc_type() == 0`.
    pub fn log2_max_poc_lsb(&self) -> u32 {
        self.log2_max_poc_lsb
    }

    pub fn interlaced(&self) -> bool {
        self.interlaced
    }

    pub fn encoded_width(&self) -> u32 {
        self.encoded_width
    }

    pub fn encoded_height(&self) -> u32 {
        self.encoded_height
    }

    pub fn crop_rect(&self) -> CropRect {
        self.crop
    }

    pub fn cropped_width(&self) -> u32 {
        if self.crop.is_empty() {
            self.encoded_width
        } else {
            self.crop.right - self.crop.left
        }
    }

    pub fn cropped_height(&self) -> u32 {
        if self.crop.is_empty() {
            self.encoded_height
        } else {
            self.crop.bottom - self.crop.top
        }
    }
}

/// Decodes and discards one scaling list of `size` entries (4x4: 16, 8x8: 64).
fn scaling_list(r: &mut crate::bitreader::BitReader, size: u32) {
    let mut last_scale: i32 = 8;
    let mut next_scale: i32 = 8;
    for _ in 0..size {
        if next_scale != 0 {
            let delta = r.get_se();
            next_scale = (last_scale + delta + 256) % 256;
        }
        let scale = if next_scale == 0 { last_scale } else { next_scale };
        last_scale = scale;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::BitWriter;

    fn minimal_sps_bytes(width_mbs_minus1: u32, height_mbs_minus1: u32, crop: Option<(u32, u32, u32, u32)>, frame_mbs_only: bool) -> Vec<u8> {
        let mut w = BitWriter::new();
        w.write_bits(8, 66); // profile_idc = baseline, no chroma info block
        w.write_bits(8, 0);
        w.write_bits(8, 30);
        w.write_ue(0); // seq_parameter_set_id
        w.write_ue(0); // log2_max_frame_num_minus4 -> 4 bits
        w.write_ue(0); // pic_order_cnt_type = 0
        w.write_ue(0); // log2_max_pic_order_cnt_lsb_minus4 -> 4 bits
        w.write_ue(0); // num_ref_frames
        w.write_bit(false); // gaps_in_frame_num_value_allowed_flag
        w.write_ue(width_mbs_minus1);
        w.write_ue(height_mbs_minus1);
        w.write_bit(frame_mbs_only);
        if !frame_mbs_only {
            w.write_bit(false); // mb_adaptive_frame_field_flag
        }
        w.write_bit(false); // direct_8x8_inference_flag
        match crop {
            // Values here are in 2-pixel crop units, as the bitstream encodes them directly.
            Some((left, right_off, top, bottom_off)) => {
                w.write_bit(true);
                w.write_ue(left);
                w.write_ue(right_off);
                w.write_ue(top);
                w.write_ue(bottom_off);
            }
            None => w.write_bit(false),
        }
        let mut out = vec![0x67u8]; // NAL header: ref_idc=3, type=7 (SPS)
        out.extend(w.finish());
        out
    }

    #[test]
    fn s2_profile_and_level() {
        let bytes = minimal_sps_bytes(0, 0, None, true);
        let nal = NalUnit::from_payload(&bytes);
        let sps = SeqParamSet::parse(&nal).expect("valid sps");
        assert_eq!(sps.profile(), 66);
        assert_eq!(sps.level(), 30);
    }

    #[test]
    fn s5_crop_rectangle() {
        // 1920x1088 encoded, crop (0,0,0,8) in 2-pixel units -> bottom offset 16 px.
        let width_mbs_minus1 = 1920 / 16 - 1;
        let height_mbs_minus1 = 1088 / 16 - 1;
        let bytes = minimal_sps_bytes(width_mbs_minus1, height_mbs_minus1, Some((0, 0, 0, 8)), true);
        let nal = NalUnit::from_payload(&bytes);
        let sps = SeqParamSet::parse(&nal).expect("valid sps");
        assert_eq!(sps.encoded_width(), 1920);
        assert_eq!(sps.encoded_height(), 1088);
        assert_eq!(sps.cropped_width(), 1920);
        assert_eq!(sps.cropped_height(), 1072);
    }

    #[test]
    fn rejects_oversized_dimensions() {
        let bytes = minimal_sps_bytes(2000 / 16, 2000 / 16, None, true);
        let nal = NalUnit::from_payload(&bytes);
        assert!(SeqParamSet::parse(&nal).is_none());
    }

    #[test]
    fn rejects_unsupported_poc_type() {
        let mut w = BitWriter::new();
        w.write_bits(8, 66);
        w.write_bits(8, 0);
        w.write_bits(8, 30);
        w.write_ue(0); // seq_parameter_set_id
        w.write_ue(0); // log2_max_frame_num_minus4
        w.write_ue(3); // pic_order_cnt_type = 3 (invalid)
        let mut bytes = vec![0x67u8];
        bytes.extend(w.finish());
        let nal = NalUnit::from_payload(&bytes);
        assert!(SeqParamSet::parse(&nal).is_none());
    }

    #[test]
    fn rejects_non_sps_nal() {
        let nal = NalUnit::from_payload(&[0x68, 0x00]); // PPS type
        assert!(SeqParamSet::parse(&nal).is_none());
    }

    #[test]
    fn interlaced_doubles_height_and_crop() {
        let width_mbs_minus1 = 1920 / 16 - 1;
        let height_mbs_minus1 = 1088 / 16 - 1;
        let bytes = minimal_sps_bytes(width_mbs_minus1, height_mbs_minus1, Some((0, 0, 0, 8)), false);
        let nal = NalUnit::from_payload(&bytes);
        let sps = SeqParamSet::parse(&nal).expect("valid sps");
        assert!(sps.interlaced());
        assert_eq!(sps.encoded_height(), 1088 * 2);
    }
}
