use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::PartnershipRole;
use crate::account::{Account, AccountId};

/// Identifier assigned to a partnership request by the request store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestId(pub u64);

impl RequestId {
    pub const fn is_unset(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of a partnership request. Only `Pending` can still change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Accepted,
    Pending,
    Declined,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 3] = [
        RequestStatus::Accepted,
        RequestStatus::Pending,
        RequestStatus::Declined,
    ];

    /// Small-integer code used by stores and by response payloads.
    pub const fn code(self) -> u8 {
        match self {
            RequestStatus::Accepted => 1,
            RequestStatus::Pending => 2,
            RequestStatus::Declined => 3,
        }
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(RequestStatus::Accepted),
            2 => Some(RequestStatus::Pending),
            3 => Some(RequestStatus::Declined),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RequestStatus::Accepted => "accepted",
            RequestStatus::Pending => "pending",
            RequestStatus::Declined => "declined",
        }
    }

    pub const fn is_terminal(self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Reference entry for the request status listing.
#[derive(Debug, Clone, Serialize)]
pub struct RequestStatusView {
    pub code: u8,
    pub status: RequestStatus,
    pub label: &'static str,
}

impl From<RequestStatus> for RequestStatusView {
    fn from(status: RequestStatus) -> Self {
        Self {
            code: status.code(),
            status,
            label: status.label(),
        }
    }
}

fn lead_and_follow(
    sender_id: AccountId,
    sender_role: PartnershipRole,
    recipient_id: AccountId,
) -> (AccountId, AccountId) {
    match sender_role {
        PartnershipRole::Lead => (sender_id, recipient_id),
        PartnershipRole::Follow => (recipient_id, sender_id),
    }
}

/// Proposal submitted by a sender, carrying ids only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnershipRequest {
    pub sender_id: AccountId,
    pub recipient_id: AccountId,
    pub sender_role: PartnershipRole,
    pub recipient_role: PartnershipRole,
    #[serde(default)]
    pub message: String,
}

impl PartnershipRequest {
    /// Ordered (lead, follow) pair implied by the sender's role.
    pub fn lead_and_follow(&self) -> (AccountId, AccountId) {
        lead_and_follow(self.sender_id, self.sender_role, self.recipient_id)
    }
}

/// Proposal whose sender and recipient were resolved to eligible accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPartnershipRequest {
    request: PartnershipRequest,
    sender: Account,
    recipient: Account,
}

impl ResolvedPartnershipRequest {
    pub(crate) fn new(request: PartnershipRequest, sender: Account, recipient: Account) -> Self {
        Self {
            request,
            sender,
            recipient,
        }
    }

    pub fn request(&self) -> &PartnershipRequest {
        &self.request
    }

    pub fn sender(&self) -> &Account {
        &self.sender
    }

    pub fn recipient(&self) -> &Account {
        &self.recipient
    }

    pub fn lead_and_follow(&self) -> (AccountId, AccountId) {
        lead_and_follow(self.sender.id, self.request.sender_role, self.recipient.id)
    }

    pub fn into_new_request(self, created_at: DateTime<Utc>) -> NewPartnershipRequest {
        NewPartnershipRequest {
            sender_id: self.sender.id,
            recipient_id: self.recipient.id,
            sender_role: self.request.sender_role,
            recipient_role: self.request.recipient_role,
            message: self.request.message,
            status: RequestStatus::Pending,
            create_user_id: self.sender.id,
            created_at,
        }
    }
}

/// Validated request handed to the store, which assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPartnershipRequest {
    pub sender_id: AccountId,
    pub recipient_id: AccountId,
    pub sender_role: PartnershipRole,
    pub recipient_role: PartnershipRole,
    pub message: String,
    pub status: RequestStatus,
    pub create_user_id: AccountId,
    pub created_at: DateTime<Utc>,
}

impl NewPartnershipRequest {
    pub fn into_record(self, id: RequestId) -> PartnershipRequestRecord {
        PartnershipRequestRecord {
            id,
            sender_id: self.sender_id,
            recipient_id: self.recipient_id,
            sender_role: self.sender_role,
            recipient_role: self.recipient_role,
            message: self.message,
            status: self.status,
            create_user_id: self.create_user_id,
            created_at: self.created_at,
            update_user_id: None,
            updated_at: self.created_at,
        }
    }
}

/// Stored partnership request including audit fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnershipRequestRecord {
    pub id: RequestId,
    pub sender_id: AccountId,
    pub recipient_id: AccountId,
    pub sender_role: PartnershipRole,
    pub recipient_role: PartnershipRole,
    pub message: String,
    pub status: RequestStatus,
    pub create_user_id: AccountId,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_user_id: Option<AccountId>,
    pub updated_at: DateTime<Utc>,
}

impl PartnershipRequestRecord {
    pub fn lead_and_follow(&self) -> (AccountId, AccountId) {
        lead_and_follow(self.sender_id, self.sender_role, self.recipient_id)
    }
}

/// Decision code sent by a recipient. Codes follow [`RequestStatus::code`]; anything other
/// than accept or decline is carried through as `Unrecognized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum ResponseCode {
    Accept,
    Decline,
    Unrecognized(i64),
}

impl ResponseCode {
    pub const fn decision(self) -> Option<RequestStatus> {
        match self {
            ResponseCode::Accept => Some(RequestStatus::Accepted),
            ResponseCode::Decline => Some(RequestStatus::Declined),
            ResponseCode::Unrecognized(_) => None,
        }
    }
}

impl From<i64> for ResponseCode {
    fn from(code: i64) -> Self {
        let status = u8::try_from(code).ok().and_then(RequestStatus::from_code);
        match status {
            Some(RequestStatus::Accepted) => ResponseCode::Accept,
            Some(RequestStatus::Declined) => ResponseCode::Decline,
            _ => ResponseCode::Unrecognized(code),
        }
    }
}

impl From<u8> for ResponseCode {
    fn from(code: u8) -> Self {
        ResponseCode::from(i64::from(code))
    }
}

impl From<ResponseCode> for i64 {
    fn from(code: ResponseCode) -> Self {
        match code {
            ResponseCode::Accept => i64::from(RequestStatus::Accepted.code()),
            ResponseCode::Decline => i64::from(RequestStatus::Declined.code()),
            ResponseCode::Unrecognized(raw) => raw,
        }
    }
}

/// A recipient's answer to a pending request. Never persisted on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnershipRequestResponse {
    pub request_id: RequestId,
    pub recipient_id: AccountId,
    pub response: ResponseCode,
    #[serde(default = "Utc::now")]
    pub responded_at: DateTime<Utc>,
}
