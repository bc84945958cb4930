//! `avcC` configuration record parsing (ISO/IEC 14496-15 section 5.2.4.1).

use log::debug;

use crate::nal::NalUnit;

/// The length-size and retained SPS/PPS NAL views from an `avcC` record.
/// Both NAL views alias the buffer `AvcCHeader::parse` was given.
///
/// Only the first SPS and first PPS entries are retained; later ones (an
/// encoder emitting more than one is rare and out of scope here, matching
/// the source this was distilled from) are ignored.
#[derive(Debug, Clone, Copy)]
pub struct AvcCHeader<'a> {
    length_size: usize,
    sps: Option<NalUnit<'a>>,
    pps: Option<NalUnit<'a>>,
}

impl<'a> AvcCHeader<'a> {
    /// Parses an `avcC` record. Returns `None` if `header` is shorter than
    /// 8 bytes. Past that point, bounds failures while walking the SPS/PPS
    /// entry lists leave the corresponding field `None` rather than failing
    /// the whole parse -- the caller detects this via [`Self::sps`]/
    /// [`Self::pps`].
    pub fn parse(header: &'a [u8]) -> Option<AvcCHeader<'a>> {
        if header.len() < 8 {
            debug!("rejecting avcC: {} bytes, need at least 8", header.len());
            return None;
        }

        let length_size = usize::from(header[4] & 0x3) + 1;
        let num_sps = header[5] & 0x1f;

        let mut sps = None;
        let mut pos = 6usize;
        for i in 0..num_sps {
            if pos + 2 > header.len() {
                break;
            }
            let len = usize::from(header[pos]) << 8 | usize::from(header[pos + 1]);
            pos += 2;
            if pos + len > header.len() {
                break;
            }
            if i == 0 {
                sps = Some(NalUnit::from_payload(&header[pos..pos + len]));
            }
            pos += len;
        }

        let mut pps = None;
        if pos < header.len() {
            let num_pps = header[pos];
            pos += 1;
            if num_pps > 0 && pos + 2 <= header.len() {
                let len = usize::from(header[pos]) << 8 | usize::from(header[pos + 1]);
                pos += 2;
                if pos + len <= header.len() {
                    pps = Some(NalUnit::from_payload(&header[pos..pos + len]));
                }
            }
        }

        Some(AvcCHeader {
            length_size,
            sps,
            pps,
        })
    }

    pub fn length_size(&self) -> usize {
        self.length_size
    }

    pub fn sps(&self) -> Option<&NalUnit<'a>> {
        self.sps.as_ref()
    }

    pub fn pps(&self) -> Option<&NalUnit<'a>> {
        self.pps.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> Vec<u8> {
        let mut rec = vec![1u8, 0x42, 0x00, 0x1E]; // configurationVersion, profile, compat, level
        rec.push(0xFF); // lengthSizeMinusOne=3 (top 6 bits reserved=1) -> length_size 4
        rec.push(0xE1); // reserved 0b111 + numSPS=1
        let sps_nal = [0x67u8, 0x42, 0x00, 0x1E];
        rec.extend(&(sps_nal.len() as u16).to_be_bytes());
        rec.extend(&sps_nal);
        rec.push(1); // numPPS
        let pps_nal = [0x68u8, 0xEE];
        rec.extend(&(pps_nal.len() as u16).to_be_bytes());
        rec.extend(&pps_nal);
        rec
    }

    #[test]
    fn s3_length_size_and_sps_count() {
        let rec = sample_record();
        let header = AvcCHeader::parse(&rec).expect("valid avcC");
        assert_eq!(header.length_size(), 4);
        assert_eq!(header.sps().unwrap().payload(), &[0x67, 0x42, 0x00, 0x1E]);
        assert_eq!(header.pps().unwrap().payload(), &[0x68, 0xEE]);
    }

    #[test]
    fn rejects_short_buffer() {
        assert!(AvcCHeader::parse(&[0u8; 7]).is_none());
    }

    #[test]
    fn truncated_sps_entry_leaves_sps_none() {
        let mut rec = vec![1u8, 0x42, 0x00, 0x1E, 0xFF, 0xE1];
        rec.extend(&[0u8, 10]); // claims 10-byte SPS, but buffer ends here
        let header = AvcCHeader::parse(&rec).expect("8+ bytes, parses to something");
        assert!(header.sps().is_none());
        assert!(header.pps().is_none());
    }
}
