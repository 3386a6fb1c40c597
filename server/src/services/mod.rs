pub mod datetime;
pub mod error;
pub mod events;

pub use datetime::{combine_date_time, split_date_time, MalformedDatePolicy};
pub use error::AccessError;
pub use events::EventAccessService;
