//! Disaster feed core: backend wire types, the HTTP client, marker layers,
//! and the classification submission helper.
//!
//! Nothing in here touches a UI toolkit; front ends drive [`FeedRenderer`]
//! and [`SubmissionHelper`] and draw whatever [`feed::LayerSet`] holds.

pub mod api;
pub mod feed;
pub mod prelude;
pub mod submission;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod testing;

pub use feed::{FeedRenderer, RefreshStatus};
pub use prelude::{DisasterApi, LogicalError, TransportError};
pub use submission::{SubmissionHelper, SubmissionOutcome};
