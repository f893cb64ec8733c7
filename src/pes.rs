//! PES reassembly for a single elementary stream PID

use crate::constants::*;
use crate::demux::DemuxContext;
use crate::Result;

/// TS payload bytes not yet copied out to the caller
#[derive(Debug, Clone, Copy)]
struct Pending<'a> {
    data: &'a [u8],
    consumed: usize,
}

impl Pending<'_> {
    fn remaining(&self) -> usize {
        self.data.len() - self.consumed
    }
}

/// Reassembly state for the PES packet currently being read.
#[derive(Debug, Clone, Default)]
pub struct PesState<'a> {
    pid: Option<u16>,
    /// Total PES packet size including its 6-byte prefix
    packet_len: usize,
    /// Bytes of the current PES packet seen so far, header included
    present: usize,
    /// Bytes to skip before elementary stream data starts
    header_len: usize,
    /// `None` while not synchronised to a PES packet start
    continuity: Option<u8>,
    pending: Option<Pending<'a>>,
}

impl<'a> PesState<'a> {
    pub fn is_synchronized(&self) -> bool {
        self.continuity.is_some()
    }

    fn select(&mut self, pid: u16) {
        if self.pid != Some(pid) {
            *self = PesState { pid: Some(pid), ..Default::default() };
        }
    }

    /// Starts a new PES packet from a payload with PUSI set. Returns false
    /// when the payload does not open an MPEG audio PES packet.
    fn begin_packet(&mut self, payload: &[u8]) -> bool {
        if payload.len() < PES_PREFIX_SIZE + PES_OPTIONAL_HEADER_SIZE
            || !(PES_AUDIO_STREAM_ID_MIN..=PES_AUDIO_STREAM_ID_MAX).contains(&payload[3])
        {
            return false;
        }
        let pes_len = u16::from_be_bytes([payload[4], payload[5]]) as usize;
        self.packet_len = PES_PREFIX_SIZE + pes_len;
        self.header_len = PES_PREFIX_SIZE + PES_OPTIONAL_HEADER_SIZE + payload[8] as usize;
        self.present = 0;
        true
    }

    /// Accounts for `payload` within the current PES packet and returns the
    /// elementary stream bytes it carries.
    fn take_es<'p>(&mut self, payload: &'p [u8]) -> &'p [u8] {
        let usable = payload.len().min(self.packet_len.saturating_sub(self.present));
        let mut data = &payload[..usable];
        if self.present < self.header_len {
            let skip = (self.header_len - self.present).min(data.len());
            self.present += skip;
            data = &data[skip..];
        }
        self.present += data.len();
        data
    }
}

/// Fills `out` with elementary stream bytes of `pid`, starting at the
/// context cursor.
///
/// Running out of input is not an error: the bytes gathered so far are
/// returned. A continuity counter gap drops everything copied during this
/// call and waits for the next PES packet start.
pub fn read_pes<'a>(ctx: &mut DemuxContext<'a>, pid: u16, out: &mut [u8]) -> Result<usize> {
    ctx.pes.select(pid);
    let mut filled = 0;

    while filled < out.len() {
        if let Some(pending) = ctx.pes.pending.as_mut() {
            let n = (out.len() - filled).min(pending.remaining());
            out[filled..filled + n]
                .copy_from_slice(&pending.data[pending.consumed..pending.consumed + n]);
            filled += n;
            pending.consumed += n;
            if pending.remaining() == 0 {
                ctx.pes.pending = None;
            }
            continue;
        }

        let pkt = match ctx.next_packet() {
            Ok(pkt) => pkt,
            Err(e) if e.is_want_more_data() => return Ok(filled),
            Err(e) => return Err(e),
        };
        if pkt.pid() != pid {
            continue;
        }
        let Some(payload) = pkt.payload() else {
            continue;
        };

        let cc = pkt.continuity_counter();
        if pkt.payload_unit_start() {
            if !ctx.pes.begin_packet(payload) {
                log::trace!("PID 0x{pid:04X}: PES start is not MPEG audio");
                ctx.pes.continuity = None;
                continue;
            }
        } else {
            let Some(last) = ctx.pes.continuity else {
                continue;
            };
            if cc != (last + 1) % TS_CONTINUITY_MODULO {
                log::trace!("PID 0x{pid:04X}: continuity {last} -> {cc}, dropping {filled} bytes");
                ctx.pes.continuity = None;
                filled = 0;
                continue;
            }
        }
        ctx.pes.continuity = Some(cc);

        let data = ctx.pes.take_es(payload);
        if !data.is_empty() {
            ctx.pes.pending = Some(Pending { data, consumed: 0 });
        }
    }
    Ok(filled)
}
