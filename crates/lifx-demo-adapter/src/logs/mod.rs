/*
[INPUT]:  Backend client and clipboard service
[OUTPUT]: Server logs, combined views and text exports
[POS]:    Logs layer - server log viewer state
[UPDATE]: When log endpoints or export formats change
*/

pub mod export;
pub mod fetcher;

pub use export::CombinedLogEntry;
pub use fetcher::{AllLogsOptions, AllLogsResult, EndpointStatuses, FetchOptions, LogsState, ServerLogs};
