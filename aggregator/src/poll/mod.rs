//! Background poll loops. Both run on the shared scrape period and
//! publish complete snapshots; one endpoint's failure never aborts a
//! cycle for the others, and one cycle's failure never stops a loop.

pub mod scores;
pub mod traffic;
