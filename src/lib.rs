// src/lib.rs
//! Audio format sniffing: MPEG-TS (AAC/MP3), bare MP3, ADTS/AAC and
//! canonical WAVE, down to the parameters a decoder needs.

pub mod sniffer {
    pub use crate::file::file_header_parsing;
    pub use crate::probe::{
        audio_type_from_mime_type, audio_type_from_path, audio_type_from_stream,
        buffer_header_parsing,
    };
    pub use crate::types::{AudioType, CodecHeader, PcmFormat, SampleRate};
}

pub mod constants;
pub mod demux;
pub mod error;
pub mod file;
pub mod packet;
pub mod parsers;
pub mod pes;
pub mod probe;
pub mod psi;
pub mod report;
pub mod types;

pub use demux::{ts_parsing, DemuxContext};
pub use error::DemuxError;

/// Result type for demux operations
pub type Result<T> = std::result::Result<T, DemuxError>;
