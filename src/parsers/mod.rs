//! Codec header parsers for the audio formats we can sniff
//!
//! Each parser looks at a header at the very start of the slice it is given
//! and returns `None` when the bytes are not a valid header of its format.

mod audio;
mod wave;
pub(crate) mod utils;

pub use audio::{parse_adts, parse_mp3};
pub use utils::id3v2_tag_size;
pub use wave::parse_wave;

#[cfg(test)]
pub(crate) use wave::tests::wave_header;

use crate::types::{AudioType, CodecHeader, FrameLength};

/// Parse the header of `audio_type` at the start of `data`
pub fn parse_audio_header(audio_type: AudioType, data: &[u8], frame_length: FrameLength) -> Option<CodecHeader> {
    match audio_type {
        AudioType::Mp3 => parse_mp3(data, frame_length),
        AudioType::Aac => parse_adts(data, frame_length),
        AudioType::Wave => parse_wave(data),
        _ => None,
    }
}

/// Mask over the second header byte that must be all ones for a frame sync
pub fn frame_sync_mask(audio_type: AudioType) -> Option<u8> {
    match audio_type {
        AudioType::Mp3 => Some(0xE0),
        AudioType::Aac => Some(0xF0),
        _ => None,
    }
}

/// True when `data` starts with the frame sync of `audio_type`
pub fn is_frame_sync(data: &[u8], mask: u8) -> bool {
    data.len() >= 2 && data[0] == 0xFF && data[1] & mask == mask
}
