mod detail;
mod distribution;
pub mod views;

pub use detail::{mentor_detail_summary, RECENT_NOTE_LIMIT, RECENT_SUBMISSION_WINDOW};
pub use distribution::{build_distribution, DistributionReport};
