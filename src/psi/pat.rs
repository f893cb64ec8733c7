use crate::constants::*;
use crate::error::DemuxError;
use crate::psi::section::PsiSection;
use crate::Result;

/// ─────────── PAT ───────────
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatProgram {
    pub program_number: u16,
    /// PMT PID, or the network PID for program 0
    pub pmt_pid: u16,
}

impl PsiSection<'_> {
    /// Number of program entries between the PAT header and the CRC.
    pub fn program_count(&self) -> usize {
        self.crc_offset().saturating_sub(PAT_HEADER_SIZE) / PAT_ENTRY_SIZE
    }

    pub fn program(&self, index: usize) -> Result<PatProgram> {
        if index >= self.program_count() {
            return Err(DemuxError::BadParameter("PAT program index out of range"));
        }
        let b = self.as_bytes();
        let idx = PAT_HEADER_SIZE + index * PAT_ENTRY_SIZE;
        Ok(PatProgram {
            program_number: u16::from_be_bytes([b[idx], b[idx + 1]]),
            pmt_pid: (((b[idx + 2] & 0x1F) as u16) << 8) | (b[idx + 3] as u16),
        })
    }
}
