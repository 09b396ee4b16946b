use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use super::blacklist::BlacklistRegistry;
use super::domain::{NewPartnership, Partnership, PartnershipId};
use super::repository::{
    PartnershipRepository, PartnershipRequestRepository, SearchPartnershipCriteria,
    SearchPartnershipRequestCriteria,
};
use super::request::{
    PartnershipRequest, PartnershipRequestRecord, PartnershipRequestResponse,
    ResolvedPartnershipRequest, RequestId, RequestStatus,
};
use super::validation::{
    ensure_no_existing_partnership, ensure_no_pending_request, ensure_pair_unpartnered,
    ensure_sender_not_blocked, find_addressed_request, resolve_participants, validate_response,
    validate_roles, Ineligibility, Participant, PartnershipRequestError,
};
use crate::account::{find_account, Account, AccountDirectory, AccountId, SearchAccountCriteria};
use crate::store::RepositoryError;

/// Result of applying a recipient's response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ResponseOutcome {
    Accepted {
        request: PartnershipRequestRecord,
        partnership: Partnership,
    },
    Declined {
        request: PartnershipRequestRecord,
    },
    /// The response code was neither accept nor decline; nothing changed.
    Ignored { request_id: RequestId },
}

/// Engine that validates, creates, and resolves partnership requests.
///
/// Holds no state of its own: every call re-reads the stores it was constructed with.
pub struct PartnershipRequestService<D, B, P, R> {
    accounts: Arc<D>,
    blacklist: Arc<B>,
    partnerships: Arc<P>,
    requests: Arc<R>,
}

impl<D, B, P, R> PartnershipRequestService<D, B, P, R>
where
    D: AccountDirectory + 'static,
    B: BlacklistRegistry + 'static,
    P: PartnershipRepository + 'static,
    R: PartnershipRequestRepository + 'static,
{
    pub fn new(accounts: Arc<D>, blacklist: Arc<B>, partnerships: Arc<P>, requests: Arc<R>) -> Self {
        Self {
            accounts,
            blacklist,
            partnerships,
            requests,
        }
    }

    /// Run every creation check in order, stopping at the first failure.
    pub fn validate(
        &self,
        request: PartnershipRequest,
    ) -> Result<ResolvedPartnershipRequest, PartnershipRequestError> {
        validate_roles(&request)?;
        let resolved = resolve_participants(request, self.accounts.as_ref())?;
        ensure_sender_not_blocked(&resolved, self.blacklist.as_ref())?;
        ensure_no_existing_partnership(&resolved, self.partnerships.as_ref())?;
        ensure_no_pending_request(&resolved, self.requests.as_ref())?;
        Ok(resolved)
    }

    /// Validate a proposal and store it as a pending request.
    pub fn create_request(
        &self,
        request: PartnershipRequest,
    ) -> Result<PartnershipRequestRecord, PartnershipRequestError> {
        let resolved = self.validate(request)?;
        let stored = self
            .requests
            .create(resolved.into_new_request(Utc::now()))?;

        info!(
            request_id = %stored.id,
            sender_id = %stored.sender_id,
            recipient_id = %stored.recipient_id,
            "partnership request created"
        );
        Ok(stored)
    }

    /// Apply a recipient's decision; an accepted request becomes a partnership.
    pub fn respond(
        &self,
        response: PartnershipRequestResponse,
    ) -> Result<ResponseOutcome, PartnershipRequestError> {
        let mut record = validate_response(&response, self.requests.as_ref())?;

        let Some(status) = response.response.decision() else {
            debug!(
                request_id = %record.id,
                code = i64::from(response.response),
                "unrecognized response code, request left untouched"
            );
            return Ok(ResponseOutcome::Ignored {
                request_id: record.id,
            });
        };

        if status == RequestStatus::Accepted {
            let (lead_id, follow_id) = record.lead_and_follow();
            ensure_pair_unpartnered(self.partnerships.as_ref(), lead_id, follow_id)?;
        }

        record.status = status;
        record.updated_at = response.responded_at;
        record.update_user_id = Some(response.recipient_id);
        self.requests.update(&record)?;
        info!(request_id = %record.id, %status, "partnership request resolved");

        if status != RequestStatus::Accepted {
            return Ok(ResponseOutcome::Declined { request: record });
        }

        let latest =
            find_addressed_request(self.requests.as_ref(), response.request_id, response.recipient_id)?;
        let partnership = self.materialize_partnership(&latest)?;
        info!(
            partnership_id = %partnership.id,
            lead_id = %partnership.lead_id,
            follow_id = %partnership.follow_id,
            "partnership created from accepted request"
        );

        Ok(ResponseOutcome::Accepted {
            request: latest,
            partnership,
        })
    }

    fn materialize_partnership(
        &self,
        request: &PartnershipRequestRecord,
    ) -> Result<Partnership, PartnershipRequestError> {
        let (lead_id, follow_id) = request.lead_and_follow();
        let lead = self.participant_account(request, lead_id)?;
        let follow = self.participant_account(request, follow_id)?;

        let partnership = self.partnerships.create(NewPartnership {
            lead_id,
            follow_id,
            same_sex: lead.gender == follow.gender,
            created_at: Utc::now(),
        })?;
        Ok(partnership)
    }

    fn participant_account(
        &self,
        request: &PartnershipRequestRecord,
        account_id: AccountId,
    ) -> Result<Account, PartnershipRequestError> {
        let participant = if account_id == request.sender_id {
            Participant::Sender
        } else {
            Participant::Recipient
        };

        find_account(
            self.accounts.as_ref(),
            &SearchAccountCriteria::by_id(account_id),
        )?
        .ok_or(PartnershipRequestError::AccountNotEligible {
            participant,
            account_id,
            reason: Ineligibility::NotFound,
        })
    }

    /// All partnerships of an account: those it leads first, then those it follows.
    pub fn partnerships_for(&self, account_id: AccountId) -> Result<Vec<Partnership>, RepositoryError> {
        let mut partnerships = self
            .partnerships
            .search(&SearchPartnershipCriteria::by_lead(account_id))?;
        partnerships.extend(
            self.partnerships
                .search(&SearchPartnershipCriteria::by_follow(account_id))?,
        );
        Ok(partnerships)
    }

    /// Look up a partnership by an id that may not exist. Zero or several matches yield `None`.
    pub fn partnership_by_id(
        &self,
        id: PartnershipId,
    ) -> Result<Option<Partnership>, RepositoryError> {
        let mut matches = self
            .partnerships
            .search(&SearchPartnershipCriteria::by_id(id))?;
        if matches.len() == 1 {
            Ok(matches.pop())
        } else {
            Ok(None)
        }
    }

    pub fn search_requests(
        &self,
        criteria: &SearchPartnershipRequestCriteria,
    ) -> Result<Vec<PartnershipRequestRecord>, RepositoryError> {
        self.requests.search(criteria)
    }

    pub fn sent_requests(
        &self,
        sender_id: AccountId,
        status: Option<RequestStatus>,
    ) -> Result<Vec<PartnershipRequestRecord>, RepositoryError> {
        self.search_requests(&SearchPartnershipRequestCriteria {
            sender_id: Some(sender_id),
            status,
            ..SearchPartnershipRequestCriteria::default()
        })
    }

    pub fn received_requests(
        &self,
        recipient_id: AccountId,
        status: Option<RequestStatus>,
    ) -> Result<Vec<PartnershipRequestRecord>, RepositoryError> {
        self.search_requests(&SearchPartnershipRequestCriteria {
            recipient_id: Some(recipient_id),
            status,
            ..SearchPartnershipRequestCriteria::default()
        })
    }
}
