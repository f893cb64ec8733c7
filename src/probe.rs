//! Buffer-level format detection and header validation

use crate::constants::*;
use crate::demux::ts_parsing;
use crate::packet::is_mpeg2ts;
use crate::parsers::{frame_sync_mask, id3v2_tag_size, is_frame_sync, parse_audio_header, parse_wave};
use crate::types::{AudioType, CodecHeader, FrameLength};

fn header_size(audio_type: AudioType) -> usize {
    match audio_type {
        AudioType::Aac => ADTS_HEADER_SIZE,
        _ => MP3_HEADER_SIZE,
    }
}

/// Finds two back-to-back frames of `audio_type` and returns the header of
/// the first one.
///
/// After a failed follow-up frame the scan restarts one byte past the first
/// frame of the attempt.
pub fn find_frame_pair(data: &[u8], audio_type: AudioType) -> Option<CodecHeader> {
    let mask = frame_sync_mask(audio_type)?;
    let hdr_size = header_size(audio_type);

    let mut idx = 0;
    let mut matches = 0;
    let mut first: Option<(usize, CodecHeader)> = None;

    while idx + hdr_size <= data.len() {
        let header = is_frame_sync(&data[idx..], mask)
            .then(|| parse_audio_header(audio_type, &data[idx..], FrameLength::Decode))
            .flatten();

        match (header, first) {
            (Some(h), _) => {
                matches += 1;
                if matches == 2 {
                    return first.map(|(_, h)| h);
                }
                first = Some((idx, h));
                // FrameLength::Decode always yields a length
                idx += h.frame_length.unwrap_or(1);
            }
            (None, Some((start, _))) => {
                log::trace!("{audio_type} frame at {start} has no follow-up frame");
                matches = 0;
                first = None;
                idx = start + 1;
            }
            (None, None) => idx += 1,
        }
    }
    None
}

/// Structural check: the first frame header of `audio_type` found in `data`.
pub fn parse_first_frame(data: &[u8], audio_type: AudioType) -> Option<CodecHeader> {
    let mask = frame_sync_mask(audio_type)?;
    (0..data.len())
        .filter(|&i| is_frame_sync(&data[i..], mask))
        .find_map(|i| parse_audio_header(audio_type, &data[i..], FrameLength::Skip))
}

/// Extracts decode parameters for `audio_type` from a buffer.
///
/// MP3 and AAC need two consecutive frames; WAVE and transport streams are
/// checked structurally.
pub fn buffer_header_parsing(data: &[u8], audio_type: AudioType) -> Option<CodecHeader> {
    match audio_type {
        AudioType::Mp3 | AudioType::Aac => find_frame_pair(data, audio_type),
        AudioType::Wave => parse_wave(data),
        AudioType::Mp2t => match ts_parsing(data) {
            Ok((_, header)) => Some(header),
            Err(e) => {
                log::debug!("TS header parsing failed: {e}");
                None
            }
        },
        _ => None,
    }
}

/// Skips an ID3v2 tag at the start of `data`. Empty if the tag does not fit.
fn skip_id3v2(data: &[u8]) -> &[u8] {
    match id3v2_tag_size(data) {
        Some(size) => data.get(size..).unwrap_or_default(),
        None => data,
    }
}

/// Detects the audio format of a buffer by content: TS, MP3, ADTS, WAVE.
pub fn audio_type_from_stream(data: &[u8]) -> AudioType {
    let audio_type = if is_mpeg2ts(data) {
        AudioType::Mp2t
    } else if find_frame_pair(skip_id3v2(data), AudioType::Mp3).is_some() {
        AudioType::Mp3
    } else if find_frame_pair(data, AudioType::Aac).is_some() {
        AudioType::Aac
    } else if parse_wave(data).is_some() {
        AudioType::Wave
    } else {
        AudioType::Unknown
    };
    log::debug!("stream of {} bytes sniffed as {audio_type}", data.len());
    audio_type
}

/// Maps a file extension to an audio type; the content is not inspected.
pub fn audio_type_from_path(path: &str) -> AudioType {
    let basename = path.rsplit('/').next().unwrap_or(path);
    let Some((_, ext)) = basename.rsplit_once('.') else {
        return AudioType::Unknown;
    };
    match ext.to_ascii_lowercase().as_str() {
        "mp3" => AudioType::Mp3,
        "aac" => AudioType::Aac,
        "opus" => AudioType::Opus,
        "flac" => AudioType::Flac,
        "pcm" | "raw" => AudioType::Pcm,
        "wav" => AudioType::Wave,
        "ts" => AudioType::Mp2t,
        _ => AudioType::Unknown,
    }
}

/// Maps a MIME type to an audio type by ordered substring match.
pub fn audio_type_from_mime_type(mime: &str) -> AudioType {
    let mime = mime.to_ascii_lowercase();
    // "aac" also covers "aacp"
    if mime.contains("aac") {
        AudioType::Aac
    } else if mime.contains("mpeg") {
        AudioType::Mp3
    } else if mime.contains("mp4") {
        AudioType::Aac
    } else if mime.contains("opus") {
        AudioType::Opus
    } else if mime.contains("mp2t") {
        AudioType::Mp2t
    } else {
        AudioType::Unknown
    }
}
