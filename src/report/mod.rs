//! Report generation for probed audio files

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use anyhow::Context;
use serde::Serialize;

use crate::constants::PREPARSE_BUFFER_SIZE;
use crate::file::file_header_parsing;
use crate::probe::{audio_type_from_mime_type, audio_type_from_path, audio_type_from_stream};
use crate::types::{AudioType, CodecHeader};

/// What decided the reported audio type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectedBy {
    Content,
    MimeType,
    Extension,
    Nothing,
}

/// Result of probing one input
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub source: String,
    pub audio_type: AudioType,
    pub detected_by: DetectedBy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<CodecHeader>,
}

/// JSON structure for a complete run (internal serialization)
#[derive(Serialize)]
struct ReportJson<'a> {
    ts_time: String,
    files: &'a [ProbeReport],
}

/// Report generator for audio probing results
pub struct Reporter;

impl Reporter {
    /// Sniff `reader` by content, falling back to the MIME hint and then to
    /// the extension of `source`, and parse the header of what was found.
    pub fn probe_reader<R: Read + Seek>(
        reader: &mut R,
        source: &str,
        mime: Option<&str>,
    ) -> anyhow::Result<ProbeReport> {
        let mut head = Vec::with_capacity(PREPARSE_BUFFER_SIZE);
        reader.seek(SeekFrom::Start(0))?;
        reader
            .by_ref()
            .take(PREPARSE_BUFFER_SIZE as u64)
            .read_to_end(&mut head)
            .with_context(|| format!("reading {source}"))?;
        reader.seek(SeekFrom::Start(0))?;

        let mut detected_by = DetectedBy::Content;
        let mut audio_type = audio_type_from_stream(&head);
        if audio_type == AudioType::Unknown {
            if let Some(mime) = mime {
                audio_type = audio_type_from_mime_type(mime);
                detected_by = DetectedBy::MimeType;
            }
        }
        if audio_type == AudioType::Unknown {
            audio_type = audio_type_from_path(source);
            detected_by = DetectedBy::Extension;
        }
        if audio_type == AudioType::Unknown {
            detected_by = DetectedBy::Nothing;
        }

        let header = file_header_parsing(reader, audio_type);
        log::info!("{source}: {audio_type} ({detected_by:?}), header {}", if header.is_some() { "ok" } else { "not found" });

        Ok(ProbeReport {
            source: source.to_string(),
            audio_type,
            detected_by,
            header,
        })
    }

    pub fn probe_file(path: &Path, mime: Option<&str>) -> anyhow::Result<ProbeReport> {
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let mut reader = BufReader::new(file);
        Self::probe_reader(&mut reader, &path.to_string_lossy(), mime)
    }

    pub fn to_json(reports: &[ProbeReport], pretty: bool) -> anyhow::Result<String> {
        let rep = ReportJson {
            ts_time: chrono::Utc::now().to_rfc3339(),
            files: reports,
        };
        let json = if pretty {
            serde_json::to_string_pretty(&rep)?
        } else {
            serde_json::to_string(&rep)?
        };
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::wave_header;
    use std::io::Cursor;

    #[test]
    fn content_beats_extension() {
        let mut wav = Cursor::new(wave_header(2, 44100, 16));
        let rep = Reporter::probe_reader(&mut wav, "mislabelled.mp3", None).unwrap();
        assert_eq!(rep.audio_type, AudioType::Wave);
        assert_eq!(rep.detected_by, DetectedBy::Content);
        assert_eq!(rep.header.unwrap().channels, 2);
    }

    #[test]
    fn falls_back_to_mime_then_extension() {
        let mut junk = Cursor::new(vec![0u8; 100]);
        let rep = Reporter::probe_reader(&mut junk, "song.flac", Some("audio/opus")).unwrap();
        assert_eq!(rep.audio_type, AudioType::Opus);
        assert_eq!(rep.detected_by, DetectedBy::MimeType);
        assert!(rep.header.is_none());

        let rep = Reporter::probe_reader(&mut junk, "song.flac", None).unwrap();
        assert_eq!(rep.detected_by, DetectedBy::Extension);

        let rep = Reporter::probe_reader(&mut junk, "noext", None).unwrap();
        assert_eq!(rep.audio_type, AudioType::Unknown);
        assert_eq!(rep.detected_by, DetectedBy::Nothing);
    }

    #[test]
    fn json_shape() {
        let mut wav = Cursor::new(wave_header(1, 8000, 8));
        let rep = Reporter::probe_reader(&mut wav, "a.wav", None).unwrap();
        let json = Reporter::to_json(&[rep], false).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        let f = &v["files"][0];
        assert_eq!(f["audio_type"], "WAVE");
        assert_eq!(f["detected_by"], "content");
        assert_eq!(f["header"]["sample_rate"], 8000);
        assert_eq!(f["header"]["pcm_format"], "S8");
        assert!(f["header"].get("frame_length").is_none());
        assert!(v["ts_time"].is_string());
    }
}
