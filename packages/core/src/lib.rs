//! Domain types shared by the MindToWeb client platform.
//!
//! Everything here mirrors rows in the hosted backend: service requests
//! submitted through the intake wizard, client profiles, per-project
//! discussion comments, and marketing leads. Serialized field values must
//! match the strings stored by the backend exactly.

pub mod discussion;
pub mod lead;
pub mod profile;
pub mod request;

pub use discussion::{DiscussionComment, NewComment};
pub use lead::{Lead, NewLead, LEAD_SOURCE_CHAT_WIDGET};
pub use profile::{Profile, ProfileUpdate};
pub use request::{
    BudgetRange, NewServiceRequest, ProjectTimeline, RequestStatus, ServiceRequest, ServiceType,
    UrgencyLevel,
};
