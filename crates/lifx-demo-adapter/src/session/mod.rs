/*
[INPUT]:  Session store and HTTP response headers
[OUTPUT]: Session ids and usage counters
[POS]:    Session layer - identity and rate-limit bookkeeping
[UPDATE]: When session tracking behavior changes
*/

pub mod headers;
pub mod id;
pub mod tracker;

pub use headers::HeaderLookup;
pub use tracker::{DEFAULT_RESET_DELAY, SessionNotifier, SessionTracker};
