pub mod demographics;
pub mod new_record;
pub mod record;
pub mod record_state;
pub mod subscriber_email;

pub use demographics::{DemographicValue, Demographics};
pub use new_record::{NewRecord, Pagination, RecordUpdate};
pub use record::Record;
pub use record_state::RecordState;
pub use subscriber_email::SubscriberEmail;
