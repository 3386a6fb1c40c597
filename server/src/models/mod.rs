pub mod access_config;
pub mod event;

pub use access_config::AccessConfig;
pub use event::{
    CreateEventRequest, Event, EventCategory, ExternalEventId, ExternalEventRecord, NewEvent,
    PLACEHOLDER_IMAGE_URL,
};
