// psi/section.rs
//! Single-packet PSI section extraction with CRC-32 (MPEG-2) checking.

use crc::{Crc, CRC_32_MPEG_2};

use crate::constants::*;
use crate::demux::DemuxContext;
use crate::error::DemuxError;
use crate::Result;

const CRC_MPEG: Crc<u32> = Crc::<u32>::new(&CRC_32_MPEG_2);

/// One PSI section, borrowed straight out of the caller's buffer.
///
/// Spans `table_id` through the trailing CRC-32.
#[derive(Debug, Clone, Copy)]
pub struct PsiSection<'a> {
    bytes: &'a [u8],
}

impl<'a> PsiSection<'a> {
    /// Validates pointer field, length and section numbering of a payload
    /// that starts a new section.
    pub fn from_payload(payload: &'a [u8]) -> Result<Self> {
        if payload.is_empty() {
            return Err(DemuxError::NotSupported("empty PSI payload"));
        }
        if payload[0] != 0 {
            return Err(DemuxError::NotSupported("PSI pointer field"));
        }
        let rest = &payload[1..];
        if rest.len() < PAT_HEADER_SIZE {
            return Err(DemuxError::NotSupported("PSI section spans packets"));
        }

        let sec_len = 3 + ((((rest[1] & 0x0F) as usize) << 8) | rest[2] as usize);
        if sec_len > rest.len() {
            return Err(DemuxError::NotSupported("PSI section spans packets"));
        }
        if sec_len < PAT_HEADER_SIZE + PSI_CRC_SIZE {
            return Err(DemuxError::Unknown("PSI section too short"));
        }
        if rest[6] != 0 || rest[7] != 0 {
            return Err(DemuxError::NotSupported("multi-section PSI table"));
        }

        Ok(Self { bytes: &rest[..sec_len] })
    }

    pub fn table_id(&self) -> u8 {
        self.bytes[0]
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Offset of the CRC-32, i.e. the end of the table body.
    pub fn crc_offset(&self) -> usize {
        self.bytes.len() - PSI_CRC_SIZE
    }

    pub fn crc_ok(&self) -> bool {
        let end = self.crc_offset();
        let calc = CRC_MPEG.checksum(&self.bytes[..end]);
        let stored = u32::from_be_bytes([
            self.bytes[end],
            self.bytes[end + 1],
            self.bytes[end + 2],
            self.bytes[end + 3],
        ]);
        calc == stored
    }
}

/// Scans forward from the context cursor until a packet on `pid` yields a
/// payload, then extracts the section it starts.
///
/// Only sections that begin and end inside that one packet are supported.
pub fn read_section<'a>(ctx: &mut DemuxContext<'a>, pid: u16) -> Result<PsiSection<'a>> {
    loop {
        let pkt = ctx.next_packet()?;
        if pkt.pid() != pid {
            continue;
        }
        let Some(payload) = pkt.payload() else {
            continue;
        };
        if !pkt.payload_unit_start() {
            return Err(DemuxError::NotSupported("PSI continuation packet"));
        }

        let section = PsiSection::from_payload(payload)?;
        if !section.crc_ok() {
            log::warn!("PSI CRC-32 mismatch on PID 0x{pid:04X} (table 0x{:02X})", section.table_id());
        }
        return Ok(section);
    }
}
