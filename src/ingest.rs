//! Turning raw input into accept/reject decisions.
//!
//! Everything here is a pure function of the candidate text, the current
//! collection and the configuration. Applying the decisions is the job of
//! [`crate::field::EmailField`].

mod extract;
pub use extract::extract_candidates;

/// The paste pipeline.
pub mod batch;
pub use batch::{BatchReport, ingest_batch};

/// The single-entry pipeline.
pub mod single;
pub use single::admit;

/// Host-supplied initial values.
pub mod initial;
pub use initial::reconcile_initial;
