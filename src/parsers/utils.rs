//! Common parsing utilities

use crate::constants::*;

/// Little-endian u16 from the first two bytes
pub fn le_u16(b: &[u8]) -> u16 {
    u16::from_le_bytes([b[0], b[1]])
}

/// Little-endian u32 from the first four bytes
pub fn le_u32(b: &[u8]) -> u32 {
    u32::from_le_bytes([b[0], b[1], b[2], b[3]])
}

/// Decode a 28-bit synchsafe integer (7 usable bits per byte)
pub fn synchsafe_u32(b: &[u8]) -> u32 {
    b[..4]
        .iter()
        .fold(0u32, |acc, &byte| (acc << 7) | (byte & 0x7F) as u32)
}

/// Total size of the ID3v2 tag at the start of `header`, header and
/// optional footer included. `None` when there is no tag.
pub fn id3v2_tag_size(header: &[u8]) -> Option<usize> {
    if header.len() < ID3V2_HEADER_SIZE || &header[..3] != b"ID3" {
        return None;
    }
    let flags = header[5];
    let body = synchsafe_u32(&header[6..10]) as usize;
    let footer = if flags & ID3V2_FOOTER_FLAG != 0 { ID3V2_FOOTER_SIZE } else { 0 };
    Some(ID3V2_HEADER_SIZE + body + footer)
}
