pub mod product;
pub mod schedule;

pub use product::{CatalogReader, InMemoryCatalog, Product};
pub use schedule::{
    parse_schedule_rows, RawScheduleRow, ScheduleError, VolumeRange, VolumeSchedule,
};
