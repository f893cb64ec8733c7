use std::io::Cursor;

use audio_sniff::constants::{TS_PACKET_SIZE, TS_SYNC_WINDOW};
use audio_sniff::sniffer::{
    audio_type_from_stream, buffer_header_parsing, file_header_parsing, AudioType, SampleRate,
};
use audio_sniff::{ts_parsing, DemuxContext, DemuxError};
use crc::{Crc, CRC_32_MPEG_2};

const CRC: Crc<u32> = Crc::<u32>::new(&CRC_32_MPEG_2);
const PMT_PID: u16 = 0x100;
const ES_PID: u16 = 0x101;

fn ts_packet(pid: u16, pusi: bool, cc: u8, payload: &[u8]) -> Vec<u8> {
    let mut p = vec![
        0x47,
        ((pid >> 8) as u8 & 0x1F) | (if pusi { 0x40 } else { 0 }),
        pid as u8,
        0x10 | (cc & 0x0F),
    ];
    p.extend_from_slice(payload);
    p.resize(TS_PACKET_SIZE, 0xFF);
    p
}

/// Wraps a section body (everything after section_length) with header and CRC
fn section(table_id: u8, id: u16, last_section: u8, body: &[u8]) -> Vec<u8> {
    let sec_len = 5 + body.len() + 4;
    let mut s = vec![
        table_id,
        0xB0 | (sec_len >> 8) as u8,
        sec_len as u8,
        (id >> 8) as u8,
        id as u8,
        0xC1,
        0x00,
        last_section,
    ];
    s.extend_from_slice(body);
    let crc = CRC.checksum(&s);
    s.extend_from_slice(&crc.to_be_bytes());
    // pointer field
    let mut payload = vec![0x00];
    payload.extend(s);
    payload
}

fn pat(programs: &[(u16, u16)]) -> Vec<u8> {
    let mut body = Vec::new();
    for (num, pid) in programs {
        body.extend_from_slice(&num.to_be_bytes());
        body.extend_from_slice(&(0xE000 | pid).to_be_bytes());
    }
    ts_packet(0, true, 0, &section(0x00, 1, 0, &body))
}

fn pmt(streams: &[(u8, u16)]) -> Vec<u8> {
    let mut body = vec![0xE0 | (ES_PID >> 8) as u8, ES_PID as u8, 0xF0, 0x00];
    for (stream_type, pid) in streams {
        body.push(*stream_type);
        body.extend_from_slice(&(0xE000 | pid).to_be_bytes());
        body.extend_from_slice(&[0xF0, 0x00]);
    }
    ts_packet(PMT_PID, true, 0, &section(0x02, 1, 0, &body))
}

fn pes(es: &[u8]) -> Vec<u8> {
    let mut p = vec![0x00, 0x00, 0x01, 0xC0];
    p.extend_from_slice(&((3 + 5 + es.len()) as u16).to_be_bytes());
    p.extend_from_slice(&[0x80, 0x80, 0x05, 0x21, 0x00, 0x01, 0x00, 0x01]);
    p.extend_from_slice(es);
    p
}

/// AAC LC, 44.1 kHz, stereo
const ADTS_HDR: [u8; 7] = [0xFF, 0xF1, 0x50, 0x80, 0x1F, 0x3F, 0xFC];
/// MPEG-1 Layer III, 128 kbps, 48 kHz, mono
const MP3_HDR: [u8; 4] = [0xFF, 0xF3, 0x94, 0xC0];

fn aac_ts() -> Vec<u8> {
    let mut es = ADTS_HDR.to_vec();
    es.extend_from_slice(&[0x21; 40]);
    [pat(&[(1, PMT_PID)]), pmt(&[(0x0F, ES_PID)]), ts_packet(ES_PID, true, 0, &pes(&es))].concat()
}

#[test]
fn single_program_adts_stream() {
    let data = aac_ts();
    assert_eq!(data.len(), TS_SYNC_WINDOW);

    let (audio_type, header) = ts_parsing(&data).unwrap();
    assert_eq!(audio_type, AudioType::Aac);
    assert_eq!(header.channels, 2);
    assert_eq!(header.sample_rate, SampleRate::Hz44100);

    assert_eq!(audio_type_from_stream(&data), AudioType::Mp2t);
    let header = buffer_header_parsing(&data, AudioType::Mp2t).unwrap();
    assert_eq!(header.channels, 2);
}

#[test]
fn mp3_stream_behind_network_program() {
    let data = [
        pat(&[(0, 0x10), (5, PMT_PID)]),
        pmt(&[(0x1B, 0x1E0), (0x03, ES_PID)]),
        ts_packet(0x1E0, true, 0, &[0x00; 184]),
        ts_packet(ES_PID, true, 0, &pes(&MP3_HDR)),
    ]
    .concat();

    let (audio_type, header) = ts_parsing(&data).unwrap();
    assert_eq!(audio_type, AudioType::Mp3);
    assert_eq!(header.channels, 1);
    assert_eq!(header.sample_rate, SampleRate::Hz48000);
}

#[test]
fn leading_garbage_is_skipped() {
    let mut data = vec![0x00; 10];
    data.extend(aac_ts());
    assert_eq!(audio_type_from_stream(&data), AudioType::Mp2t);
    assert_eq!(ts_parsing(&data).unwrap().0, AudioType::Aac);
}

#[test]
fn short_buffer_is_rejected() {
    let data = &aac_ts()[..TS_SYNC_WINDOW - 1];
    assert!(matches!(ts_parsing(data), Err(DemuxError::BadParameter(_))));
    assert_ne!(audio_type_from_stream(data), AudioType::Mp2t);
}

#[test]
fn pmt_without_audio_fails() {
    let data = [
        pat(&[(1, PMT_PID)]),
        pmt(&[(0x1B, ES_PID)]),
        ts_packet(ES_PID, true, 0, &[0x00; 184]),
    ]
    .concat();
    assert!(matches!(ts_parsing(&data), Err(DemuxError::NotSupported(_))));
}

#[test]
fn multi_section_pat_is_not_supported() {
    let pat = ts_packet(0, true, 0, &section(0x00, 1, 1, &[0x00, 0x01, 0xE1, 0x00]));
    let data = [pat, pmt(&[(0x0F, ES_PID)]), ts_packet(ES_PID, true, 0, &pes(&ADTS_HDR))].concat();
    assert!(matches!(ts_parsing(&data), Err(DemuxError::NotSupported(_))));
    assert!(buffer_header_parsing(&data, AudioType::Mp2t).is_none());
}

#[test]
fn missing_pmt_wants_more_data() {
    let data = [
        pat(&[(1, PMT_PID)]),
        ts_packet(0x1FFF, false, 0, &[]),
        ts_packet(0x1FFF, false, 0, &[]),
    ]
    .concat();
    assert!(ts_parsing(&data).unwrap_err().is_want_more_data());
}

#[test]
fn continuity_gap_drops_copied_bytes() {
    let mut first = pes(&[0x55; 170]);
    first[4..6].copy_from_slice(&1000u16.to_be_bytes());
    let data = [
        ts_packet(ES_PID, true, 3, &first),
        ts_packet(ES_PID, false, 5, &[0x66; 184]),
        ts_packet(0x1FFF, false, 0, &[]),
    ]
    .concat();

    let mut ctx = DemuxContext::new(&data).unwrap();
    let mut out = vec![0u8; 1024];
    assert_eq!(ctx.read_es(ES_PID, &mut out).unwrap(), 0);
    assert_eq!(ctx.offset(), data.len());
}

#[test]
fn file_variant_reads_transport_stream() {
    let mut file = Cursor::new(aac_ts());
    file.set_position(200);
    let header = file_header_parsing(&mut file, AudioType::Mp2t).unwrap();
    assert_eq!(header.sample_rate, SampleRate::Hz44100);
    assert_eq!(file.position(), 0);
}
