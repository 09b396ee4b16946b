//! Partnerships and the request workflow that creates them.
//!
//! A sender proposes a lead/follow pairing to a recipient. The proposal passes through role,
//! eligibility, blacklist, existing-partnership, and pending-request checks before it is stored
//! as pending. Only the recipient can resolve it, and an accepted request materializes a
//! [`Partnership`].

pub mod blacklist;
pub mod domain;
pub mod repository;
pub mod request;
pub mod router;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use blacklist::{
    BlacklistReason, BlacklistRegistry, PartnershipRequestBlacklistEntry, SearchBlacklistCriteria,
};
pub use domain::{NewPartnership, Partnership, PartnershipId, PartnershipRole, PartnershipRoleView};
pub use repository::{
    must_find_partnership, PartnershipRepository, PartnershipRequestRepository,
    SearchPartnershipCriteria, SearchPartnershipRequestCriteria,
};
pub use request::{
    NewPartnershipRequest, PartnershipRequest, PartnershipRequestRecord,
    PartnershipRequestResponse, RequestId, RequestStatus, RequestStatusView,
    ResolvedPartnershipRequest, ResponseCode,
};
pub use router::partnership_router;
pub use service::{PartnershipRequestService, ResponseOutcome};
pub use validation::{Ineligibility, Participant, PartnershipRequestError, RoleViolation};
