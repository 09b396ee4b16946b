//! Ordered checks guarding request creation and response resolution.
//!
//! Each check either passes or returns the first violation it finds; none of them write to a
//! store, so a request that fails any check leaves no trace.

use std::fmt;

use tracing::{debug, warn};

use super::blacklist::{BlacklistRegistry, SearchBlacklistCriteria};
use super::repository::{
    PartnershipRepository, PartnershipRequestRepository, SearchPartnershipCriteria,
    SearchPartnershipRequestCriteria,
};
use super::request::{
    PartnershipRequest, PartnershipRequestRecord, PartnershipRequestResponse,
    ResolvedPartnershipRequest, RequestId, RequestStatus,
};
use crate::account::{find_account, Account, AccountDirectory, AccountId, SearchAccountCriteria};
use crate::store::RepositoryError;

/// Side of a request an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Participant {
    Sender,
    Recipient,
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Participant::Sender => f.write_str("sender"),
            Participant::Recipient => f.write_str("recipient"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RoleViolation {
    #[error("sender and recipient have identical roles")]
    IdenticalRoles,
    #[error("cannot send partnership request to yourself")]
    SelfRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Ineligibility {
    #[error("account cannot be found")]
    NotFound,
    #[error("account is not an athlete")]
    NotAthlete,
}

/// Failures raised while creating or resolving partnership requests.
#[derive(Debug, thiserror::Error)]
pub enum PartnershipRequestError {
    #[error("invalid role assignment: {0}")]
    InvalidRoleAssignment(RoleViolation),
    #[error("{participant} {account_id} is not eligible for partnership: {reason}")]
    AccountNotEligible {
        participant: Participant,
        account_id: AccountId,
        reason: Ineligibility,
    },
    #[error("cannot send partnership request to this user")]
    SenderBlocked,
    #[error("lead {lead_id} and follow {follow_id} are already partners with these roles")]
    DuplicatePartnership {
        lead_id: AccountId,
        follow_id: AccountId,
    },
    #[error("pending request {request_id} must be responded to first")]
    PendingRequestExists { request_id: RequestId },
    #[error("{0} must be specified")]
    MissingIdentifier(&'static str),
    #[error("cannot find request {request_id} for recipient {recipient_id}")]
    RequestNotFound {
        request_id: RequestId,
        recipient_id: AccountId,
    },
    #[error("request {request_id} is already {status}")]
    AlreadyResolved {
        request_id: RequestId,
        status: RequestStatus,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub(crate) fn validate_roles(request: &PartnershipRequest) -> Result<(), PartnershipRequestError> {
    if request.sender_role == request.recipient_role {
        return Err(PartnershipRequestError::InvalidRoleAssignment(
            RoleViolation::IdenticalRoles,
        ));
    }
    if request.sender_id == request.recipient_id {
        return Err(PartnershipRequestError::InvalidRoleAssignment(
            RoleViolation::SelfRequest,
        ));
    }
    debug!(
        sender_id = %request.sender_id,
        recipient_id = %request.recipient_id,
        "roles are complementary"
    );
    Ok(())
}

pub(crate) fn resolve_athlete<D>(
    accounts: &D,
    account_id: AccountId,
    participant: Participant,
) -> Result<Account, PartnershipRequestError>
where
    D: AccountDirectory + ?Sized,
{
    let not_eligible = |reason| PartnershipRequestError::AccountNotEligible {
        participant,
        account_id,
        reason,
    };

    let account = find_account(accounts, &SearchAccountCriteria::by_id(account_id))?
        .ok_or_else(|| not_eligible(Ineligibility::NotFound))?;
    if !account.is_athlete() {
        return Err(not_eligible(Ineligibility::NotAthlete));
    }
    debug!(%participant, %account_id, "participant resolved to an athlete");
    Ok(account)
}

pub(crate) fn resolve_participants<D>(
    request: PartnershipRequest,
    accounts: &D,
) -> Result<ResolvedPartnershipRequest, PartnershipRequestError>
where
    D: AccountDirectory + ?Sized,
{
    let sender = resolve_athlete(accounts, request.sender_id, Participant::Sender)?;
    let recipient = resolve_athlete(accounts, request.recipient_id, Participant::Recipient)?;
    Ok(ResolvedPartnershipRequest::new(request, sender, recipient))
}

pub(crate) fn ensure_sender_not_blocked<B>(
    request: &ResolvedPartnershipRequest,
    blacklist: &B,
) -> Result<(), PartnershipRequestError>
where
    B: BlacklistRegistry + ?Sized,
{
    let recipient_id = request.recipient().id;
    let sender_id = request.sender().id;
    let entries = blacklist.search(&SearchBlacklistCriteria::reported_by(recipient_id))?;
    if entries
        .iter()
        .any(|entry| entry.blocked_user_id == sender_id)
    {
        warn!(%sender_id, %recipient_id, "partnership request vetoed by recipient blacklist");
        return Err(PartnershipRequestError::SenderBlocked);
    }
    debug!(%sender_id, %recipient_id, "sender not on recipient blacklist");
    Ok(())
}

pub(crate) fn ensure_no_existing_partnership<P>(
    request: &ResolvedPartnershipRequest,
    partnerships: &P,
) -> Result<(), PartnershipRequestError>
where
    P: PartnershipRepository + ?Sized,
{
    let (lead_id, follow_id) = request.lead_and_follow();
    ensure_pair_unpartnered(partnerships, lead_id, follow_id)
}

/// Fail when `lead_id` already leads `follow_id`. The reverse configuration is not a duplicate.
pub(crate) fn ensure_pair_unpartnered<P>(
    partnerships: &P,
    lead_id: AccountId,
    follow_id: AccountId,
) -> Result<(), PartnershipRequestError>
where
    P: PartnershipRepository + ?Sized,
{
    let existing = partnerships.search(&SearchPartnershipCriteria::by_pair(lead_id, follow_id))?;
    if existing.is_empty() {
        debug!(%lead_id, %follow_id, "no partnership with this role configuration");
        Ok(())
    } else {
        Err(PartnershipRequestError::DuplicatePartnership { lead_id, follow_id })
    }
}

pub(crate) fn ensure_no_pending_request<R>(
    request: &ResolvedPartnershipRequest,
    requests: &R,
) -> Result<(), PartnershipRequestError>
where
    R: PartnershipRequestRepository + ?Sized,
{
    let criteria =
        SearchPartnershipRequestCriteria::pending_between(request.sender().id, request.recipient().id);
    match requests.search(&criteria)?.first() {
        Some(pending) => Err(PartnershipRequestError::PendingRequestExists {
            request_id: pending.id,
        }),
        None => {
            debug!(
                sender_id = %request.sender().id,
                recipient_id = %request.recipient().id,
                "no pending request in this direction"
            );
            Ok(())
        }
    }
}

/// Check that a response targets exactly one request of this recipient that is still pending.
pub(crate) fn validate_response<R>(
    response: &PartnershipRequestResponse,
    requests: &R,
) -> Result<PartnershipRequestRecord, PartnershipRequestError>
where
    R: PartnershipRequestRepository + ?Sized,
{
    if response.recipient_id.is_unset() {
        return Err(PartnershipRequestError::MissingIdentifier("recipient"));
    }
    if response.request_id.is_unset() {
        return Err(PartnershipRequestError::MissingIdentifier("request"));
    }

    let record = find_addressed_request(requests, response.request_id, response.recipient_id)?;
    if record.status.is_terminal() {
        return Err(PartnershipRequestError::AlreadyResolved {
            request_id: record.id,
            status: record.status,
        });
    }

    debug!(request_id = %record.id, "response targets a pending request");
    Ok(record)
}

pub(crate) fn find_addressed_request<R>(
    requests: &R,
    request_id: RequestId,
    recipient_id: AccountId,
) -> Result<PartnershipRequestRecord, PartnershipRequestError>
where
    R: PartnershipRequestRepository + ?Sized,
{
    let mut matches =
        requests.search(&SearchPartnershipRequestCriteria::addressed_to(request_id, recipient_id))?;
    match (matches.pop(), matches.is_empty()) {
        (Some(record), true) => Ok(record),
        _ => Err(PartnershipRequestError::RequestNotFound {
            request_id,
            recipient_id,
        }),
    }
}
