//! XML conventions of the mailing list API.
//!
//! Requests are a `DATASET` of `DATA` elements discriminated by their `type`
//! attribute (plus an `id` for `extra` and `demographic` data). Replies use the
//! same shape, with a `TYPE` element telling success from failure and one
//! `RECORD` element per returned record.

pub mod reply;
pub mod request;

pub use reply::{DataLookup, Element, Reply};
pub use request::DatasetRequest;
