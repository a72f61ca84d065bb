//! Client dashboard state for the MindToWeb platform.
//!
//! Everything here sits between the hosted backend and a rendering layer:
//! discussion threads that stay live through the change feed, pure
//! filtering and sorting over the client's request list, the profile
//! editor, and the marketing chat widget's lead capture.

pub mod discussion;
pub mod filter;
pub mod leads;
pub mod profile;

pub use discussion::{DiscussionError, DiscussionThread, SyncHandle, ThreadComment};
pub use filter::{filter_requests, SortOrder, StatusFilter};
pub use leads::{LeadCapture, LeadError, LeadForm, LeadStatus};
pub use profile::ProfileEditor;
