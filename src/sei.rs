//! SEI message views.
//!
//! A single SEI NAL can carry more than one message back to back; this
//! crate only decodes the leading one's type/length/payload-start, matching
//! spec scope (nested messages aren't split out here).

use crate::nal::{NalUnit, NalUnitType};

/// A non-owning view of one SEI message's header fields and payload.
/// Valid as long as the underlying NAL's bytes stay alive.
#[derive(Debug, Clone, Copy)]
pub struct SeiMessage<'a> {
    payload_type: u32,
    payload_size: u32,
    payload: &'a [u8],
}

impl<'a> SeiMessage<'a> {
    /// Parses the leading SEI message in `nal`. Returns `None` if `nal`
    /// isn't SEI-typed or its payload is too short to hold a type/size pair.
    pub fn parse(nal: &NalUnit<'a>) -> Option<SeiMessage<'a>> {
        if nal.nal_unit_type() != NalUnitType::Sei {
            return None;
        }
        let bytes = nal.payload();
        let mut idx = 1usize; // skip the NAL header byte

        let mut payload_type = 0u32;
        loop {
            let b = *bytes.get(idx)?;
            idx += 1;
            if b == 0xff {
                payload_type += 255;
            } else {
                payload_type += u32::from(b);
                break;
            }
        }

        let mut payload_size = 0u32;
        loop {
            let b = *bytes.get(idx)?;
            idx += 1;
            if b == 0xff {
                payload_size += 255;
            } else {
                payload_size += u32::from(b);
                break;
            }
        }

        Some(SeiMessage {
            payload_type,
            payload_size,
            payload: &bytes[idx..],
        })
    }

    pub fn payload_type(&self) -> u32 {
        self.payload_type
    }

    pub fn payload_size(&self) -> u32 {
        self.payload_size
    }

    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s6_sums_leading_ff_runs() {
        // nal header, FF FF 05 (type=255+255+5=515), FF 0A (length=255+10=265), payload...
        let bytes = [0x06u8, 0xFF, 0xFF, 0x05, 0xFF, 0x0A, 0xAB, 0xCD];
        let nal = NalUnit::from_payload(&bytes);
        let sei = SeiMessage::parse(&nal).expect("valid sei");
        assert_eq!(sei.payload_type(), 515);
        assert_eq!(sei.payload_size(), 265);
        assert_eq!(sei.payload(), &[0xAB, 0xCD]);
    }

    #[test]
    fn rejects_non_sei_nal() {
        let nal = NalUnit::from_payload(&[0x67, 0x00, 0x00]);
        assert!(SeiMessage::parse(&nal).is_none());
    }

    #[test]
    fn truncated_sei_returns_none() {
        let nal = NalUnit::from_payload(&[0x06, 0xFF]);
        assert!(SeiMessage::parse(&nal).is_none());
    }
}
