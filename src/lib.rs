//! H.264/AVC bitstream parser: NAL unit location, SPS/PPS/slice-header/SEI
//! decoding, `avcC` configuration records, and stateful Picture Order Count
//! (POC) reconstruction.
//!
//! This crate does no full H.264 decode -- no macroblock syntax, no pixel
//! reconstruction, no entropy decoding beyond Exp-Golomb -- and it does no
//! I/O. It hands back borrowed views into caller-owned buffers; the caller
//! keeps those buffers alive and unmodified for as long as a view derived
//! from them is in use.
//!
//! Typical use: feed a byte stream to [`nal::NalLocator`] to get
//! [`nal::NalUnit`] views, parse the SPS/PPS once with [`sps::SeqParamSet`]
//! and [`pps::PicParamSet`], hand both to [`poc::PocTracker::set_header`]
//! via an [`avcc::AvcCHeader`], then call [`poc::PocTracker::get_poc`] per
//! slice NAL to recover display order.

pub mod avcc;
pub mod bitreader;
pub mod nal;
pub mod pps;
pub mod poc;
pub mod sei;
pub mod slice;
pub mod sps;

#[cfg(test)]
mod testutil;

pub use avcc::AvcCHeader;
pub use bitreader::BitReader;
pub use nal::{NalLocator, NalParseResult, NalUnit, NalUnitType};
pub use poc::PocTracker;
pub use pps::PicParamSet;
pub use sei::SeiMessage;
pub use slice::SliceHeader;
pub use sps::{CropRect, SeqParamSet};
