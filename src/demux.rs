//! MPEG-TS demultiplexing down to the first audio elementary stream

use crate::constants::*;
use crate::error::DemuxError;
use crate::packet::{sync_offset, TsPacket};
use crate::pes::{read_pes, PesState};
use crate::probe::parse_first_frame;
use crate::psi::{read_section, PatProgram, PmtStream, PsiSection, StreamOffsets};
use crate::types::{AudioType, CodecHeader};
use crate::Result;

/// Per-call demux state over a borrowed transport stream buffer
pub struct DemuxContext<'a> {
    data: &'a [u8],
    offset: usize,
    pub(crate) pes: PesState<'a>,
    pat: Option<PsiSection<'a>>,
    pmt: Option<PsiSection<'a>>,
    streams: StreamOffsets,
}

impl<'a> DemuxContext<'a> {
    pub fn new(data: &'a [u8]) -> Result<Self> {
        if data.len() < TS_SYNC_WINDOW {
            return Err(DemuxError::BadParameter("buffer shorter than three TS packets"));
        }
        Ok(Self {
            data,
            offset: 0,
            pes: PesState::default(),
            pat: None,
            pmt: None,
            streams: StreamOffsets::default(),
        })
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Next packet at or after the cursor; the cursor moves past it.
    pub fn next_packet(&mut self) -> Result<TsPacket<'a>> {
        let data = self.data;
        let start = self.offset + sync_offset(&data[self.offset..], false)?;
        let pkt = TsPacket::new(&data[start..])?;
        self.offset = start + TS_PACKET_SIZE;
        Ok(pkt)
    }

    /// Reads the PAT and returns its program count.
    pub fn load_pat(&mut self) -> Result<usize> {
        let pat = read_section(self, PID_PAT)?;
        self.pat = Some(pat);
        Ok(pat.program_count())
    }

    /// Reads the PMT carried on `pid` and returns its stream count.
    pub fn load_pmt(&mut self, pid: u16) -> Result<usize> {
        let pmt = read_section(self, pid)?;
        self.streams = StreamOffsets::scan(&pmt);
        self.pmt = Some(pmt);
        Ok(self.streams.len())
    }

    pub fn program(&self, index: usize) -> Result<PatProgram> {
        self.pat
            .as_ref()
            .ok_or(DemuxError::Unknown("PAT not loaded"))?
            .program(index)
    }

    pub fn num_streams(&self) -> usize {
        self.streams.len()
    }

    pub fn stream(&self, index: usize) -> Option<PmtStream> {
        let offset = self.streams.get(index)?;
        self.pmt.as_ref().map(|pmt| pmt.stream_at(offset))
    }

    /// Fills `out` from the elementary stream on `pid`, see [`read_pes`].
    pub fn read_es(&mut self, pid: u16, out: &mut [u8]) -> Result<usize> {
        read_pes(self, pid, out)
    }
}

/// Codec carried by a PMT stream type, if it is one we can probe
pub fn audio_type_for_stream_type(stream_type: u8) -> Option<AudioType> {
    match stream_type {
        STREAM_TYPE_MPEG1_AUDIO => Some(AudioType::Mp3),
        STREAM_TYPE_MPEG2_AAC | STREAM_TYPE_HE_AAC => Some(AudioType::Aac),
        _ => None,
    }
}

/// Walks PAT → PMT → first audio PES of a single-program transport stream
/// and parses the codec header found there.
pub fn ts_parsing(data: &[u8]) -> Result<(AudioType, CodecHeader)> {
    let mut ctx = DemuxContext::new(data)?;

    if ctx.load_pat()? == 0 {
        return Err(DemuxError::NotFound);
    }
    let mut program = ctx.program(0)?;
    if program.program_number == NETWORK_PROGRAM_NUMBER {
        program = ctx.program(1)?;
    }
    log::trace!(
        "program {} -> PMT PID 0x{:04X}",
        program.program_number,
        program.pmt_pid
    );

    if ctx.load_pmt(program.pmt_pid)? == 0 {
        return Err(DemuxError::NotFound);
    }
    let (stream, audio_type) = (0..ctx.num_streams())
        .filter_map(|i| ctx.stream(i))
        .find_map(|s| audio_type_for_stream_type(s.stream_type).map(|t| (s, t)))
        .ok_or(DemuxError::NotSupported("no audio stream in PMT"))?;
    log::debug!(
        "selected ES PID 0x{:04X} (stream type 0x{:02X}) as {audio_type}",
        stream.elementary_pid,
        stream.stream_type
    );

    let mut es = vec![0u8; PREPARSE_BUFFER_SIZE];
    let n = ctx.read_es(stream.elementary_pid, &mut es)?;
    es.truncate(n);

    parse_first_frame(&es, audio_type)
        .map(|header| (audio_type, header))
        .ok_or(DemuxError::Unknown("no codec header in elementary stream"))
}
