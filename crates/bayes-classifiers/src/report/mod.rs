pub mod evaluation;
pub mod plots;
pub mod report;

pub use evaluation::evaluation_report;
pub use report::{Report, ReportSection};
