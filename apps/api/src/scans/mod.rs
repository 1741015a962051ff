// Resume scans: upload → extract → rank against open jobs → persist.
// The matching itself lives in `crate::matching`; this module is orchestration only.

pub mod handlers;
pub mod query;
pub mod upload;
