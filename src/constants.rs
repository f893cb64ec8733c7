//! Constants for MPEG-TS demultiplexing and audio header sniffing

/// MPEG-TS packet constants
pub const TS_PACKET_SIZE: usize = 188;
pub const TS_SYNC_BYTE: u8 = 0x47;
/// Packets that must agree before a resync offset is trusted
pub const TS_SYNC_CONFIRM_PACKETS: usize = 3;
pub const TS_SYNC_WINDOW: usize = TS_PACKET_SIZE * TS_SYNC_CONFIRM_PACKETS;
pub const TS_HEADER_SIZE: usize = 4;

/// PSI constants
pub const PID_PAT: u16 = 0x0000;
pub const PAT_HEADER_SIZE: usize = 8;
pub const PAT_ENTRY_SIZE: usize = 4;
pub const PMT_HEADER_SIZE: usize = 12;
pub const PMT_STREAM_HEAD_SIZE: usize = 5;
pub const PSI_CRC_SIZE: usize = 4;
pub const MAX_PMT_STREAMS: usize = 10;
/// Program number reserved for the network PID
pub const NETWORK_PROGRAM_NUMBER: u16 = 0;

/// PMT stream types carrying audio we can hand to a decoder
pub const STREAM_TYPE_MPEG1_AUDIO: u8 = 0x03;
pub const STREAM_TYPE_MPEG2_AAC: u8 = 0x0F;
pub const STREAM_TYPE_HE_AAC: u8 = 0x11;

/// PES packet constants
pub const PES_PREFIX_SIZE: usize = 6; // start code + stream_id + PES_packet_length
pub const PES_OPTIONAL_HEADER_SIZE: usize = 3; // flags + PES_header_data_length
pub const PES_AUDIO_STREAM_ID_MIN: u8 = 0xC0;
pub const PES_AUDIO_STREAM_ID_MAX: u8 = 0xDF;
pub const TS_CONTINUITY_MODULO: u8 = 16;

/// Scratch buffer used to pull elementary stream bytes out of a TS
pub const PREPARSE_BUFFER_SIZE: usize = 4096;

/// Codec header sizes
pub const MP3_HEADER_SIZE: usize = 4;
pub const ADTS_HEADER_SIZE: usize = 7;
pub const WAVE_HEADER_SIZE: usize = 44;

/// ID3v2 tag layout
pub const ID3V2_HEADER_SIZE: usize = 10;
pub const ID3V2_FOOTER_SIZE: usize = 10;
pub const ID3V2_FOOTER_FLAG: u8 = 0x10;
