use crate::constants::*;
use crate::psi::section::PsiSection;

/// ─────────── PMT ───────────
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PmtStream {
    pub stream_type: u8,
    pub elementary_pid: u16,
}

/// Byte offsets of the elementary stream entries inside a PMT section.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamOffsets {
    offsets: [usize; MAX_PMT_STREAMS],
    count: usize,
}

impl StreamOffsets {
    /// Walks the ES loop up to the CRC, keeping at most `MAX_PMT_STREAMS`.
    pub fn scan(section: &PsiSection<'_>) -> Self {
        let b = section.as_bytes();
        let end = section.crc_offset();
        let mut out = Self::default();
        if b.len() < PMT_HEADER_SIZE {
            return out;
        }

        let prog_info_len = (((b[10] & 0x0F) as usize) << 8) | (b[11] as usize);
        let mut idx = PMT_HEADER_SIZE + prog_info_len; // skip program descriptors
        while idx + PMT_STREAM_HEAD_SIZE <= end && out.count < MAX_PMT_STREAMS {
            out.offsets[out.count] = idx;
            out.count += 1;
            let es_info_len = (((b[idx + 3] & 0x0F) as usize) << 8) | (b[idx + 4] as usize);
            idx += PMT_STREAM_HEAD_SIZE + es_info_len; // skip ES descriptors
        }
        out
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn get(&self, index: usize) -> Option<usize> {
        (index < self.count).then(|| self.offsets[index])
    }
}

impl PsiSection<'_> {
    /// Stream entry at a byte offset produced by [`StreamOffsets::scan`].
    pub fn stream_at(&self, offset: usize) -> PmtStream {
        let b = self.as_bytes();
        PmtStream {
            stream_type: b[offset],
            elementary_pid: (((b[offset + 1] & 0x1F) as u16) << 8) | (b[offset + 2] as u16),
        }
    }
}
