//! Domain models shared by the query and HTTP layers

pub mod day;
pub mod measurement;
pub mod pagination;
pub mod value;

pub use day::UtcDay;
pub use measurement::{Averages, DownloadPoint};
pub use pagination::{PageParams, PageRequest, PageSummary};
pub use value::{format_timestamp, ColumnValue, DynamicRow};
