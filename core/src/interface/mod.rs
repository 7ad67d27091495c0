pub mod evidence;
pub mod frontend;

pub use evidence::{EvidenceRecord, EvidenceSink};
pub use frontend::RadioFrontEnd;
