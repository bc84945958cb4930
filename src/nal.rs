//! NAL unit views and their location within Annex B or AVCC byte streams.

use log::trace;

use crate::bitreader::BitReader;

/// Recognized `nal_unit_type` values (low 5 bits of the NAL header byte).
/// Table 7-1 of ISO/IEC 14496-10.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NalUnitType {
    Slice,
    PartitionA,
    PartitionB,
    PartitionC,
    IdrSlice,
    Sei,
    Sps,
    Pps,
    Aud,
    Other(u8),
}

impl NalUnitType {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => NalUnitType::Slice,
            2 => NalUnitType::PartitionA,
            3 => NalUnitType::PartitionB,
            4 => NalUnitType::PartitionC,
            5 => NalUnitType::IdrSlice,
            6 => NalUnitType::Sei,
            7 => NalUnitType::Sps,
            8 => NalUnitType::Pps,
            9 => NalUnitType::Aud,
            o => NalUnitType::Other(o),
        }
    }
}

/// A non-owning view over one NAL unit's bytes, starting at the 1-byte NAL
/// header (the low 5 bits of which are `nal_unit_type`; bits 5-6 are
/// `nal_ref_idc`).
///
/// Cheap to copy: copying a `NalUnit` copies the borrowed slice, not the
/// bytes it points to. It carries no parse cursor of its own; borrow a
/// [`BitReader`] from [`NalUnit::reader`] to walk its bits.
#[derive(Debug, Clone, Copy)]
pub struct NalUnit<'a> {
    payload: &'a [u8],
    /// Offset of the start code's first `0x00` relative to the buffer this
    /// NAL was located in, if framed by Annex B. `None` for AVCC framing
    /// (there is no start code to point at).
    start_code_offset: Option<usize>,
}

impl<'a> NalUnit<'a> {
    /// Builds a view directly over `payload` (the NAL header byte onward),
    /// with no associated start code. Used by callers that already have the
    /// NAL bytes in hand, e.g. an `avcC` record's retained SPS/PPS entries.
    pub fn from_payload(payload: &'a [u8]) -> Self {
        NalUnit {
            payload,
            start_code_offset: None,
        }
    }

    /// The raw bytes of this NAL unit, header byte included.
    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }

    /// A fresh bit cursor over this NAL's payload.
    pub fn reader(&self) -> BitReader<'a> {
        BitReader::new(self.payload)
    }

    pub fn nal_unit_type(&self) -> NalUnitType {
        match self.payload.first() {
            None => NalUnitType::Other(0),
            Some(&b) => NalUnitType::from_u8(b & 0x1F),
        }
    }

    /// True when `nal_ref_idc` (bits 5-6 of the header byte) is non-zero:
    /// this NAL is referenced by later pictures.
    pub fn is_ref_pic(&self) -> bool {
        matches!(self.payload.first(), Some(&b) if b & 0x60 != 0)
    }

    pub fn start_code_offset(&self) -> Option<usize> {
        self.start_code_offset
    }
}

/// Outcome of locating one NAL unit in a buffer.
#[derive(Debug)]
pub enum NalParseResult<'a> {
    /// A complete NAL unit was found, plus the byte offset in `buffer` just
    /// past it (where the next search should resume).
    Nal(NalUnit<'a>, usize),
    /// Not enough bytes are present yet to determine the NAL's boundaries;
    /// the caller should supply more data (or, if this was the last block,
    /// treat the remainder as a truncated stream).
    NeedMore,
}

/// Locates NAL unit boundaries in a byte stream.
///
/// Two framing modes, selected by `length_size`:
/// - `length_size == 0`: Annex B, NAL units delimited by `00 00 01` start
///   codes (optionally preceded by extra `0x00` bytes).
/// - `length_size` in `{1, 2, 4}`: AVCC, each NAL prefixed by a big-endian
///   length of that many bytes.
pub struct NalLocator;

impl NalLocator {
    /// Attempts to parse one NAL unit starting at the front of `buffer`.
    ///
    /// `is_last_block` only matters for Annex B framing: when no further
    /// start code is found, it decides whether the current NAL extends to
    /// the end of `buffer` (true) or more data is needed (false).
    pub fn parse_one<'a>(
        buffer: &'a [u8],
        length_size: usize,
        is_last_block: bool,
    ) -> NalParseResult<'a> {
        if length_size > 0 {
            Self::parse_one_avcc(buffer, length_size)
        } else {
            Self::parse_one_annex_b(buffer, is_last_block)
        }
    }

    fn parse_one_avcc(buffer: &[u8], length_size: usize) -> NalParseResult<'_> {
        if buffer.len() < length_size {
            return NalParseResult::NeedMore;
        }
        let mut n: usize = 0;
        for &b in &buffer[..length_size] {
            n = (n << 8) + usize::from(b);
        }
        if n + length_size > buffer.len() {
            return NalParseResult::NeedMore;
        }
        let start = length_size;
        let end = start + n;
        trace!("avcc nal: {} bytes", n);
        NalParseResult::Nal(NalUnit::from_payload(&buffer[start..end]), end)
    }

    fn parse_one_annex_b(buffer: &[u8], is_last_block: bool) -> NalParseResult<'_> {
        let (begin, start) = match find_start_code(buffer, 0) {
            Some(found) => found,
            None => return NalParseResult::NeedMore,
        };
        match find_start_code(buffer, start) {
            Some((next_begin, _next_start)) => {
                let nal = &buffer[start..next_begin];
                trace!("annex b nal: {} bytes", nal.len());
                NalParseResult::Nal(
                    NalUnit {
                        payload: nal,
                        start_code_offset: Some(begin),
                    },
                    next_begin,
                )
            }
            None if is_last_block => {
                let nal = &buffer[start..];
                trace!("annex b nal (final): {} bytes", nal.len());
                NalParseResult::Nal(
                    NalUnit {
                        payload: nal,
                        start_code_offset: Some(begin),
                    },
                    buffer.len(),
                )
            }
            None => NalParseResult::NeedMore,
        }
    }
}

/// Scans `buffer[from..]` for a `00 00 01` start code, optionally preceded
/// by extra `0x00` bytes. Returns `(first_zero_offset, payload_start_offset)`.
fn find_start_code(buffer: &[u8], from: usize) -> Option<(usize, usize)> {
    let mut begin: Option<usize> = None;
    let mut i = from;
    while i < buffer.len() {
        if buffer[i] == 0 {
            if begin.is_none() {
                begin = Some(i);
            }
            if i + 2 < buffer.len() && buffer[i + 1] == 0 && buffer[i + 2] == 1 {
                return Some((begin.unwrap(), i + 3));
            }
        } else {
            begin = None;
        }
        i += 1;
    }
    None
}
