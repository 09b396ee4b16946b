use super::domain::{NewPartnership, Partnership, PartnershipId};
use super::request::{NewPartnershipRequest, PartnershipRequestRecord, RequestId, RequestStatus};
use crate::account::AccountId;
use crate::store::RepositoryError;

/// Parameters a [`PartnershipRepository`] can search by. Unset fields do not constrain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPartnershipCriteria {
    pub partnership_id: Option<PartnershipId>,
    pub lead_id: Option<AccountId>,
    pub follow_id: Option<AccountId>,
}

impl SearchPartnershipCriteria {
    pub fn by_id(id: PartnershipId) -> Self {
        Self {
            partnership_id: Some(id),
            ..Self::default()
        }
    }

    pub fn by_lead(lead_id: AccountId) -> Self {
        Self {
            lead_id: Some(lead_id),
            ..Self::default()
        }
    }

    pub fn by_follow(follow_id: AccountId) -> Self {
        Self {
            follow_id: Some(follow_id),
            ..Self::default()
        }
    }

    pub fn by_pair(lead_id: AccountId, follow_id: AccountId) -> Self {
        Self {
            partnership_id: None,
            lead_id: Some(lead_id),
            follow_id: Some(follow_id),
        }
    }

    pub fn matches(&self, partnership: &Partnership) -> bool {
        self.partnership_id.map_or(true, |id| partnership.id == id)
            && self.lead_id.map_or(true, |id| partnership.lead_id == id)
            && self.follow_id.map_or(true, |id| partnership.follow_id == id)
    }
}

/// Store of confirmed partnerships.
pub trait PartnershipRepository: Send + Sync {
    fn create(&self, partnership: NewPartnership) -> Result<Partnership, RepositoryError>;
    fn search(
        &self,
        criteria: &SearchPartnershipCriteria,
    ) -> Result<Vec<Partnership>, RepositoryError>;
}

/// Parameters a [`PartnershipRequestRepository`] can search by.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPartnershipRequestCriteria {
    pub request_id: Option<RequestId>,
    pub sender_id: Option<AccountId>,
    pub recipient_id: Option<AccountId>,
    pub status: Option<RequestStatus>,
}

impl SearchPartnershipRequestCriteria {
    pub fn addressed_to(request_id: RequestId, recipient_id: AccountId) -> Self {
        Self {
            request_id: Some(request_id),
            recipient_id: Some(recipient_id),
            ..Self::default()
        }
    }

    pub fn pending_between(sender_id: AccountId, recipient_id: AccountId) -> Self {
        Self {
            request_id: None,
            sender_id: Some(sender_id),
            recipient_id: Some(recipient_id),
            status: Some(RequestStatus::Pending),
        }
    }

    pub fn matches(&self, record: &PartnershipRequestRecord) -> bool {
        self.request_id.map_or(true, |id| record.id == id)
            && self.sender_id.map_or(true, |id| record.sender_id == id)
            && self.recipient_id.map_or(true, |id| record.recipient_id == id)
            && self.status.map_or(true, |status| record.status == status)
    }
}

/// Store of partnership requests and their lifecycle transitions.
pub trait PartnershipRequestRepository: Send + Sync {
    fn create(
        &self,
        request: NewPartnershipRequest,
    ) -> Result<PartnershipRequestRecord, RepositoryError>;
    fn update(&self, record: &PartnershipRequestRecord) -> Result<(), RepositoryError>;
    fn search(
        &self,
        criteria: &SearchPartnershipRequestCriteria,
    ) -> Result<Vec<PartnershipRequestRecord>, RepositoryError>;
}

/// Fetch a partnership whose id is known to exist, such as one the caller just created.
///
/// # Panics
///
/// Panics when the store fails or does not return exactly one partnership. Never call this
/// with an id taken from untrusted input; use
/// [`PartnershipRequestService::partnership_by_id`](super::PartnershipRequestService::partnership_by_id)
/// instead.
pub fn must_find_partnership<P>(repository: &P, id: PartnershipId) -> Partnership
where
    P: PartnershipRepository + ?Sized,
{
    let mut matches = match repository.search(&SearchPartnershipCriteria::by_id(id)) {
        Ok(matches) => matches,
        Err(err) => panic!("partnership store failed while loading partnership {id}: {err}"),
    };
    match (matches.pop(), matches.is_empty()) {
        (Some(partnership), true) => partnership,
        _ => panic!("cannot find partnership with id {id}"),
    }
}
