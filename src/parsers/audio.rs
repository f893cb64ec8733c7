//! MPEG audio (Layer III) and ADTS/AAC frame header parsers

use bitstream_io::{BigEndian, BitRead, BitReader};

use crate::constants::{MP3_HEADER_SIZE, ADTS_HEADER_SIZE};
use crate::types::{CodecHeader, FrameLength, SampleRate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MpegVersion {
    Mpeg1,
    Mpeg2,
    Mpeg25,
}

impl MpegVersion {
    /// Right shift applied to the MPEG-1 sample rate table
    fn rate_shift(self) -> u32 {
        match self {
            MpegVersion::Mpeg1 => 0,
            MpegVersion::Mpeg2 => 1,
            MpegVersion::Mpeg25 => 2,
        }
    }

    fn samples_per_frame(self) -> u32 {
        match self {
            MpegVersion::Mpeg1 => 1152,
            MpegVersion::Mpeg2 | MpegVersion::Mpeg25 => 576,
        }
    }

    fn bitrates_kbps(self) -> &'static [u32; 14] {
        match self {
            MpegVersion::Mpeg1 => &MPEG1_L3_BITRATES,
            MpegVersion::Mpeg2 | MpegVersion::Mpeg25 => &MPEG2_L3_BITRATES,
        }
    }
}

const MP3_SAMPLE_RATES: [u32; 3] = [44100, 48000, 32000];

/// Layer III bitrates for bitrate_index 1..=14
const MPEG1_L3_BITRATES: [u32; 14] = [32, 40, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320];
const MPEG2_L3_BITRATES: [u32; 14] = [8, 16, 24, 32, 40, 48, 56, 64, 80, 96, 112, 128, 144, 160];

const ADTS_SAMPLE_RATES: [SampleRate; 13] = [
    SampleRate::Hz96000,
    SampleRate::Hz88200,
    SampleRate::Hz64000,
    SampleRate::Hz48000,
    SampleRate::Hz44100,
    SampleRate::Hz32000,
    SampleRate::Hz24000,
    SampleRate::Hz22050,
    SampleRate::Hz16000,
    SampleRate::Hz12000,
    SampleRate::Hz11025,
    SampleRate::Hz8000,
    SampleRate::Hz7350,
];

/// Parse an MPEG Layer III frame header at the start of `data`
pub fn parse_mp3(data: &[u8], frame_length: FrameLength) -> Option<CodecHeader> {
    if data.len() < MP3_HEADER_SIZE {
        return None;
    }
    let mut br = BitReader::endian(&data[..MP3_HEADER_SIZE], BigEndian);

    if br.read::<11, u16>().ok()? != 0x7FF {
        return None;
    }
    let version = match br.read::<2, u8>().ok()? {
        0b00 => MpegVersion::Mpeg2,
        0b10 => MpegVersion::Mpeg1,
        0b11 => MpegVersion::Mpeg25,
        _ => return None, // reserved
    };
    if br.read::<2, u8>().ok()? != 0b01 {
        return None; // Layer III only
    }
    br.skip(1).ok()?; // protection_bit
    let bitrate_index = br.read::<4, u8>().ok()?;
    let sr_index = br.read::<2, u8>().ok()? as usize;
    let padding = br.read::<1, u8>().ok()? as u32;
    br.skip(1).ok()?; // private_bit
    let channel_mode = br.read::<2, u8>().ok()?;

    let sample_rate_hz = MP3_SAMPLE_RATES.get(sr_index)? >> version.rate_shift();
    let sample_rate = SampleRate::from_hz(sample_rate_hz)?;
    let channels = if channel_mode <= 2 { 2 } else { 1 };
    if bitrate_index == 0 || bitrate_index == 0xF {
        return None; // free format / bad
    }

    let frame_length = match frame_length {
        FrameLength::Skip => None,
        FrameLength::Decode => {
            let bitrate = version.bitrates_kbps()[bitrate_index as usize - 1] * 1000;
            let len = (version.samples_per_frame() / 8 * bitrate / sample_rate_hz + padding) as usize;
            if len <= MP3_HEADER_SIZE {
                return None;
            }
            Some(len)
        }
    };

    Some(CodecHeader {
        channels,
        sample_rate,
        frame_length,
        pcm_format: None,
    })
}

/// Parse an ADTS frame header at the start of `data`
pub fn parse_adts(data: &[u8], frame_length: FrameLength) -> Option<CodecHeader> {
    // the fields we read end inside byte 6
    if data.len() < ADTS_HEADER_SIZE - 1 {
        return None;
    }
    let mut br = BitReader::endian(&data[..ADTS_HEADER_SIZE - 1], BigEndian);

    if br.read::<12, u16>().ok()? != 0xFFF {
        return None;
    }
    br.skip(1).ok()?; // ID
    if br.read::<2, u8>().ok()? != 0 {
        return None; // layer
    }
    br.skip(1).ok()?; // protection_absent
    if br.read::<2, u8>().ok()? == 3 {
        return None; // reserved profile
    }
    let sr_index = br.read::<4, u8>().ok()? as usize;
    br.skip(1).ok()?; // private_bit
    let channel_cfg = br.read::<3, u8>().ok()?;
    br.skip(4).ok()?; // original/copy, home, copyright id bit + start

    let sample_rate = *ADTS_SAMPLE_RATES.get(sr_index)?;
    let channels = match channel_cfg {
        0 => return None, // defined in-band, not in the header
        7 => 8,
        n => n as u16,
    };

    let frame_length = match frame_length {
        FrameLength::Skip => None,
        FrameLength::Decode => {
            let len = br.read::<13, u16>().ok()? as usize;
            if len < ADTS_HEADER_SIZE {
                return None;
            }
            Some(len)
        }
    };

    Some(CodecHeader {
        channels,
        sample_rate,
        frame_length,
        pcm_format: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mpeg1_layer3_128k_44100() {
        let hdr = [0xFF, 0xF3, 0x90, 0x00];
        let h = parse_mp3(&hdr, FrameLength::Decode).unwrap();
        assert_eq!(h.sample_rate, SampleRate::Hz44100);
        assert_eq!(h.channels, 2);
        assert_eq!(h.frame_length, Some(417));
    }

    #[test]
    fn mp3_padding_and_mono() {
        let hdr = [0xFF, 0xF3, 0x92, 0xC0];
        let h = parse_mp3(&hdr, FrameLength::Decode).unwrap();
        assert_eq!(h.channels, 1);
        assert_eq!(h.frame_length, Some(418));
    }

    #[test]
    fn version_bits_select_rate_table() {
        // 10: MPEG-1
        let h = parse_mp3(&[0xFF, 0xF3, 0x90, 0x00], FrameLength::Decode).unwrap();
        assert_eq!(h.sample_rate, SampleRate::Hz44100);
        assert_eq!(h.frame_length, Some(144 * 128_000 / 44_100));

        // 00: MPEG-2
        let h = parse_mp3(&[0xFF, 0xE3, 0x90, 0x00], FrameLength::Decode).unwrap();
        assert_eq!(h.sample_rate, SampleRate::Hz22050);
        assert_eq!(h.frame_length, Some(72 * 80_000 / 22_050));

        // 11: MPEG-2.5
        let h = parse_mp3(&[0xFF, 0xFB, 0x90, 0x00], FrameLength::Decode).unwrap();
        assert_eq!(h.sample_rate, SampleRate::Hz11025);
        assert_eq!(h.frame_length, Some(72 * 80_000 / 11_025));

        // 01: reserved
        assert!(parse_mp3(&[0xFF, 0xEB, 0x90, 0x00], FrameLength::Skip).is_none());
    }

    #[test]
    fn mpeg2_and_mpeg25_rates() {
        // MPEG-2, 64 kbps, 24 kHz
        let h = parse_mp3(&[0xFF, 0xE3, 0x84, 0x00], FrameLength::Decode).unwrap();
        assert_eq!(h.sample_rate, SampleRate::Hz24000);
        assert_eq!(h.frame_length, Some(72 * 64_000 / 24_000));

        // MPEG-2.5, 8 kHz
        let h = parse_mp3(&[0xFF, 0xFB, 0x18, 0x00], FrameLength::Skip).unwrap();
        assert_eq!(h.sample_rate, SampleRate::Hz8000);
        assert_eq!(h.frame_length, None);
    }

    #[test]
    fn mp3_rejects_bad_fields() {
        assert!(parse_mp3(&[0xFF, 0xF5, 0x90, 0x00], FrameLength::Skip).is_none()); // layer II
        assert!(parse_mp3(&[0xFF, 0xF3, 0x00, 0x00], FrameLength::Skip).is_none()); // free format
        assert!(parse_mp3(&[0xFF, 0xF3, 0xF0, 0x00], FrameLength::Skip).is_none()); // bad bitrate
        assert!(parse_mp3(&[0xFF, 0xF3, 0x9C, 0x00], FrameLength::Skip).is_none()); // reserved rate
        assert!(parse_mp3(&[0xFF, 0xF3, 0x90], FrameLength::Skip).is_none());
    }

    fn adts(profile: u8, sr_index: u8, channel_cfg: u8, frame_len: u16) -> [u8; 7] {
        [
            0xFF,
            0xF1,
            (profile << 6) | (sr_index << 2) | (channel_cfg >> 2),
            ((channel_cfg & 0x3) << 6) | ((frame_len >> 11) as u8 & 0x3),
            (frame_len >> 3) as u8,
            ((frame_len & 0x7) as u8) << 5 | 0x1F,
            0xFC,
        ]
    }

    #[test]
    fn adts_lc_stereo_44100() {
        let h = parse_adts(&adts(1, 4, 2, 371), FrameLength::Decode).unwrap();
        assert_eq!(h.sample_rate, SampleRate::Hz44100);
        assert_eq!(h.channels, 2);
        assert_eq!(h.frame_length, Some(371));
    }

    #[test]
    fn adts_channel_configurations() {
        assert_eq!(parse_adts(&adts(1, 3, 7, 100), FrameLength::Skip).unwrap().channels, 8);
        assert_eq!(parse_adts(&adts(1, 3, 6, 100), FrameLength::Skip).unwrap().channels, 6);
        assert!(parse_adts(&adts(1, 3, 0, 100), FrameLength::Skip).is_none());
    }

    #[test]
    fn adts_rejects_bad_fields() {
        assert!(parse_adts(&adts(3, 4, 2, 100), FrameLength::Skip).is_none());
        assert!(parse_adts(&adts(1, 13, 2, 100), FrameLength::Skip).is_none());
        let mut layered = adts(1, 4, 2, 100);
        layered[1] = 0xF3;
        assert!(parse_adts(&layered, FrameLength::Skip).is_none());
        // a zero frame length is only checked when asked for
        assert!(parse_adts(&adts(1, 4, 2, 0), FrameLength::Decode).is_none());
        assert!(parse_adts(&adts(1, 4, 2, 0), FrameLength::Skip).is_some());
    }
}
