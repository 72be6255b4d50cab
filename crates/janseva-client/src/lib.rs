//! # janseva-client — The NetworkClient Boundary
//!
//! Defines the abstract interface through which the workflow engine
//! reaches the government backend: OTP send/verify, application
//! submission, record search, download grants, and status lookup.
//!
//! Transport is out of scope — implementations may speak HTTP, a
//! message bus, or nothing at all. Two implementations ship with the
//! crate:
//!
//! - [`InMemoryNetworkClient`] — a record store in memory, backing the
//!   demo CLI and tests.
//! - [`UnreachableNetworkClient`] — every call fails with a transport
//!   error, driving the engine's offline fallback paths in tests.
//!
//! ## Error Policy
//!
//! All operations return `Result<_, ClientError>`. The workflow engine
//! pattern-matches `Ok` vs `Err` explicitly; only the `Err` arm may
//! invoke the local fabrication path, and only when offline/demo mode
//! is enabled.

pub mod memory;
pub mod messages;
pub mod traits;

pub use memory::{InMemoryNetworkClient, UnreachableNetworkClient};
pub use messages::{
    DownloadGrant, SearchQuery, SearchRecord, SearchResults, StatusResponse,
    SubmissionResponse, TimelineEntry,
};
pub use traits::{ClientError, NetworkClient};
