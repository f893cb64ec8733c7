//! TS packet grid synchronisation and payload extraction

use crate::constants::*;
use crate::error::DemuxError;
use crate::Result;

/// Borrowed view of one 188-byte transport packet
#[derive(Debug, Clone, Copy)]
pub struct TsPacket<'a> {
    bytes: &'a [u8],
}

impl<'a> TsPacket<'a> {
    /// `bytes` must hold at least one whole packet; extra bytes are ignored.
    pub fn new(bytes: &'a [u8]) -> Result<Self> {
        if bytes.len() < TS_PACKET_SIZE {
            return Err(DemuxError::WantMoreData {
                needed: TS_PACKET_SIZE,
                available: bytes.len(),
            });
        }
        if bytes[0] != TS_SYNC_BYTE {
            return Err(DemuxError::NotFound);
        }
        Ok(Self { bytes: &bytes[..TS_PACKET_SIZE] })
    }

    pub fn transport_error(&self) -> bool {
        self.bytes[1] & 0x80 != 0
    }

    pub fn payload_unit_start(&self) -> bool {
        self.bytes[1] & 0x40 != 0
    }

    pub fn pid(&self) -> u16 {
        (((self.bytes[1] & 0x1F) as u16) << 8) | (self.bytes[2] as u16)
    }

    pub fn adaptation_field_control(&self) -> u8 {
        (self.bytes[3] & 0x30) >> 4
    }

    pub fn continuity_counter(&self) -> u8 {
        self.bytes[3] & 0x0F
    }

    /// Payload bytes after the header and adaptation field, if the packet
    /// carries any.
    pub fn payload(&self) -> Option<&'a [u8]> {
        if self.transport_error() {
            return None;
        }
        match self.adaptation_field_control() {
            // reserved / adaptation field only
            0 | 2 => None,
            1 => Some(&self.bytes[TS_HEADER_SIZE..]),
            _ => {
                let adap_len = self.bytes[TS_HEADER_SIZE] as usize;
                let start = TS_HEADER_SIZE + 1 + adap_len;
                if start >= TS_PACKET_SIZE {
                    return None;
                }
                Some(&self.bytes[start..])
            }
        }
    }
}

/// Finds the offset of the first packet boundary in `data`.
///
/// Without `force_resync` a sync byte at offset 0 is trusted as is.
/// Otherwise every candidate within the first packet must be confirmed by
/// sync bytes one and two packets further on.
pub fn sync_offset(data: &[u8], force_resync: bool) -> Result<usize> {
    if data.len() < TS_PACKET_SIZE {
        return Err(DemuxError::WantMoreData {
            needed: TS_PACKET_SIZE,
            available: data.len(),
        });
    }
    if !force_resync && data[0] == TS_SYNC_BYTE {
        return Ok(0);
    }
    if data.len() < TS_SYNC_WINDOW {
        return Err(DemuxError::WantMoreData {
            needed: TS_SYNC_WINDOW,
            available: data.len(),
        });
    }

    let last_candidate = (data.len() - TS_SYNC_WINDOW).min(TS_PACKET_SIZE - 1);
    let confirmed = |i: usize| {
        (0..TS_SYNC_CONFIRM_PACKETS).all(|n| data[i + n * TS_PACKET_SIZE] == TS_SYNC_BYTE)
    };
    match (0..=last_candidate).find(|&i| confirmed(i)) {
        Some(i) => {
            log::trace!("TS resync at offset {i}");
            Ok(i)
        }
        // candidates past the confirmable range may still be valid with more data
        None if last_candidate < TS_PACKET_SIZE - 1 => Err(DemuxError::WantMoreData {
            needed: TS_SYNC_WINDOW + TS_PACKET_SIZE - 1,
            available: data.len(),
        }),
        None => Err(DemuxError::NotFound),
    }
}

/// True when `data` starts with a confirmed TS packet grid.
pub fn is_mpeg2ts(data: &[u8]) -> bool {
    sync_offset(data, true).is_ok()
}
