use serde::Serialize;

/// Audio container or codec detected in a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AudioType {
    Mp3,
    Aac,
    Opus,
    Flac,
    Pcm,
    Wave,
    Mp2t,
    Invalid,
    Unknown,
}

impl AudioType {
    pub fn name(self) -> &'static str {
        match self {
            AudioType::Mp3 => "MP3",
            AudioType::Aac => "AAC",
            AudioType::Opus => "OPUS",
            AudioType::Flac => "FLAC",
            AudioType::Pcm => "PCM",
            AudioType::Wave => "WAVE",
            AudioType::Mp2t => "MP2T",
            AudioType::Invalid => "INVALID",
            AudioType::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for AudioType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Sample rates a decoder can be configured with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "u32")]
pub enum SampleRate {
    Hz7350,
    Hz8000,
    Hz11025,
    Hz12000,
    Hz16000,
    Hz22050,
    Hz24000,
    Hz32000,
    Hz44100,
    Hz48000,
    Hz64000,
    Hz88200,
    Hz96000,
}

impl SampleRate {
    pub fn hz(self) -> u32 {
        match self {
            SampleRate::Hz7350 => 7350,
            SampleRate::Hz8000 => 8000,
            SampleRate::Hz11025 => 11025,
            SampleRate::Hz12000 => 12000,
            SampleRate::Hz16000 => 16000,
            SampleRate::Hz22050 => 22050,
            SampleRate::Hz24000 => 24000,
            SampleRate::Hz32000 => 32000,
            SampleRate::Hz44100 => 44100,
            SampleRate::Hz48000 => 48000,
            SampleRate::Hz64000 => 64000,
            SampleRate::Hz88200 => 88200,
            SampleRate::Hz96000 => 96000,
        }
    }

    pub fn from_hz(hz: u32) -> Option<Self> {
        Some(match hz {
            7350 => SampleRate::Hz7350,
            8000 => SampleRate::Hz8000,
            11025 => SampleRate::Hz11025,
            12000 => SampleRate::Hz12000,
            16000 => SampleRate::Hz16000,
            22050 => SampleRate::Hz22050,
            24000 => SampleRate::Hz24000,
            32000 => SampleRate::Hz32000,
            44100 => SampleRate::Hz44100,
            48000 => SampleRate::Hz48000,
            64000 => SampleRate::Hz64000,
            88200 => SampleRate::Hz88200,
            96000 => SampleRate::Hz96000,
            _ => return None,
        })
    }
}

impl From<SampleRate> for u32 {
    fn from(rate: SampleRate) -> u32 {
        rate.hz()
    }
}

/// PCM sample layout announced by a WAVE header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PcmFormat {
    S8,
    S16Le,
    S32Le,
}

impl PcmFormat {
    pub fn from_bits_per_sample(bits: u16) -> Option<Self> {
        match bits {
            8 => Some(PcmFormat::S8),
            16 => Some(PcmFormat::S16Le),
            32 => Some(PcmFormat::S32Le),
            _ => None,
        }
    }
}

/// Decode parameters extracted from a codec or container header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CodecHeader {
    pub channels: u16,
    pub sample_rate: SampleRate,
    /// Whole frame size in bytes, header included
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pcm_format: Option<PcmFormat>,
}

/// Whether a header parser should also decode and check the frame length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameLength {
    Skip,
    Decode,
}
