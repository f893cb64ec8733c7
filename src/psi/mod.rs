pub mod section;
pub mod pat;
pub mod pmt;

pub use section::{read_section, PsiSection};
pub use pat::PatProgram;
pub use pmt::{PmtStream, StreamOffsets};
