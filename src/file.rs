//! Header parsing straight from a seekable file
//!
//! Frame sync scanning reads a byte at a time; wrap unbuffered files in a
//! `BufReader`.

use std::io::{self, ErrorKind, Read, Seek, SeekFrom};

use crate::constants::*;
use crate::demux::ts_parsing;
use crate::parsers::{frame_sync_mask, id3v2_tag_size, is_frame_sync, parse_audio_header, parse_wave};
use crate::types::{AudioType, CodecHeader, FrameLength};

/// Seeks the file back to its start when dropped, whatever path we leave by.
struct Rewind<'f, F: Seek> {
    file: &'f mut F,
}

impl<F: Seek> Drop for Rewind<'_, F> {
    fn drop(&mut self) {
        if let Err(e) = self.file.seek(SeekFrom::Start(0)) {
            log::warn!("failed to rewind file after header parsing: {e}");
        }
    }
}

/// Reads `buf.len()` bytes; `Ok(false)` at end of file.
fn read_full<F: Read>(f: &mut F, buf: &mut [u8]) -> io::Result<bool> {
    match f.read_exact(buf) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(e),
    }
}

/// Offset of the first byte after an ID3v2 tag, or 0 without one.
fn audio_start<F: Read + Seek>(f: &mut F) -> io::Result<u64> {
    f.seek(SeekFrom::Start(0))?;
    let mut header = [0u8; ID3V2_HEADER_SIZE];
    if !read_full(f, &mut header)? {
        return Ok(0);
    }
    Ok(id3v2_tag_size(&header).map_or(0, |size| size as u64))
}

/// Scans forward from the current position for `0xFF` followed by a byte
/// matching `mask`, returning the offset of the `0xFF`.
fn scan_sync<F: Read + Seek>(f: &mut F, mask: u8) -> io::Result<Option<u64>> {
    let mut byte = [0u8; 1];
    loop {
        if !read_full(f, &mut byte)? {
            return Ok(None);
        }
        if byte[0] != 0xFF {
            continue;
        }
        if !read_full(f, &mut byte)? {
            return Ok(None);
        }
        if byte[0] & mask == mask {
            return Ok(Some(f.stream_position()? - 2));
        }
        // the second byte may itself open a sync word
        f.seek(SeekFrom::Current(-1))?;
    }
}

fn header_at<F: Read + Seek>(f: &mut F, pos: u64, buf: &mut [u8]) -> io::Result<bool> {
    f.seek(SeekFrom::Start(pos))?;
    read_full(f, buf)
}

/// Finds the first frame of `audio_type` that is followed by a second one.
fn find_frame_pair<F: Read + Seek>(f: &mut F, audio_type: AudioType) -> io::Result<Option<CodecHeader>> {
    let Some(mask) = frame_sync_mask(audio_type) else {
        return Ok(None);
    };
    let hdr_size = if audio_type == AudioType::Aac { ADTS_HEADER_SIZE } else { MP3_HEADER_SIZE };
    let mut hdr = [0u8; ADTS_HEADER_SIZE];
    let hdr = &mut hdr[..hdr_size];

    let start = audio_start(f)?;
    f.seek(SeekFrom::Start(start))?;
    while let Some(pos) = scan_sync(f, mask)? {
        if !header_at(f, pos, hdr)? {
            return Ok(None);
        }
        if let Some(header) = parse_audio_header(audio_type, hdr, FrameLength::Decode) {
            let next = pos + header.frame_length.unwrap_or(0) as u64;
            if header_at(f, next, hdr)?
                && is_frame_sync(hdr, mask)
                && parse_audio_header(audio_type, hdr, FrameLength::Decode).is_some()
            {
                log::debug!("{audio_type} frame pair found at offset {pos}");
                return Ok(Some(header));
            }
        }
        f.seek(SeekFrom::Start(pos + 1))?;
    }
    Ok(None)
}

fn parse_file<F: Read + Seek>(f: &mut F, audio_type: AudioType) -> io::Result<Option<CodecHeader>> {
    match audio_type {
        AudioType::Mp3 | AudioType::Aac => find_frame_pair(f, audio_type),
        AudioType::Wave => {
            let mut header = [0u8; WAVE_HEADER_SIZE];
            if !header_at(f, 0, &mut header)? {
                return Ok(None);
            }
            Ok(parse_wave(&header))
        }
        AudioType::Mp2t => {
            f.seek(SeekFrom::Start(0))?;
            let mut buf = Vec::with_capacity(PREPARSE_BUFFER_SIZE);
            f.by_ref().take(PREPARSE_BUFFER_SIZE as u64).read_to_end(&mut buf)?;
            Ok(ts_parsing(&buf).ok().map(|(_, header)| header))
        }
        _ => Ok(None),
    }
}

/// File counterpart of [`buffer_header_parsing`](crate::probe::buffer_header_parsing).
///
/// The file is always left positioned at its start.
pub fn file_header_parsing<F: Read + Seek>(file: &mut F, audio_type: AudioType) -> Option<CodecHeader> {
    let mut guard = Rewind { file };
    match parse_file(&mut *guard.file, audio_type) {
        Ok(header) => header,
        Err(e) => {
            log::debug!("{audio_type} header parsing failed: {e}");
            None
        }
    }
}
