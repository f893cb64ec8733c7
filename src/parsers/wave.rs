//! Canonical 44-byte RIFF/WAVE header parser

use crate::constants::WAVE_HEADER_SIZE;
use crate::parsers::utils::{le_u16, le_u32};
use crate::types::{CodecHeader, PcmFormat, SampleRate};

/// Parse a canonical WAVE header (fmt chunk at offset 12) at the start of `data`
pub fn parse_wave(data: &[u8]) -> Option<CodecHeader> {
    if data.len() < WAVE_HEADER_SIZE {
        return None;
    }
    if &data[0..4] != b"RIFF" || &data[8..12] != b"WAVE" || &data[12..16] != b"fmt " {
        return None;
    }

    let channels = le_u16(&data[22..]);
    let sample_rate = SampleRate::from_hz(le_u32(&data[24..]))?;
    let pcm_format = PcmFormat::from_bits_per_sample(le_u16(&data[34..]))?;
    if channels == 0 {
        return None;
    }

    Some(CodecHeader {
        channels,
        sample_rate,
        frame_length: None,
        pcm_format: Some(pcm_format),
    })
}
