use super::common::*;
use crate::account::{
    Account, AccountDirectory, AccountId, AccountRole, Gender, SearchAccountCriteria,
};
use crate::partnership::blacklist::BlacklistReason;
use crate::partnership::domain::PartnershipRole;
use crate::partnership::repository::PartnershipRequestRepository;
use crate::partnership::request::{RequestId, RequestStatus, ResponseCode};
use crate::partnership::validation::{
    ensure_no_existing_partnership, ensure_no_pending_request, ensure_sender_not_blocked,
    resolve_participants, validate_response, validate_roles, Ineligibility, Participant,
    PartnershipRequestError, RoleViolation,
};
use crate::store::RepositoryError;

#[test]
fn identical_roles_are_rejected_regardless_of_other_fields() {
    for role in PartnershipRole::ALL {
        for (sender, recipient) in [(LEAD, FOLLOW), (LEAD, LEAD), (UNKNOWN, ORGANIZER)] {
            let mut request = proposal(sender, recipient, role);
            request.recipient_role = role;
            match validate_roles(&request) {
                Err(PartnershipRequestError::InvalidRoleAssignment(
                    RoleViolation::IdenticalRoles,
                )) => {}
                other => panic!("expected identical roles violation, got {other:?}"),
            }
        }
    }
}

#[test]
fn requests_to_self_are_rejected() {
    let request = proposal(LEAD, LEAD, PartnershipRole::Lead);
    match validate_roles(&request) {
        Err(PartnershipRequestError::InvalidRoleAssignment(RoleViolation::SelfRequest)) => {}
        other => panic!("expected self request violation, got {other:?}"),
    }
    assert!(validate_roles(&proposal(LEAD, FOLLOW, PartnershipRole::Follow)).is_ok());
}

#[test]
fn participants_resolve_to_athlete_accounts() {
    let fixture = fixture();
    let resolved = resolve_participants(
        proposal(LEAD, FOLLOW, PartnershipRole::Lead),
        fixture.accounts.as_ref(),
    )
    .expect("both athletes resolve");

    assert_eq!(resolved.sender().id, LEAD);
    assert_eq!(resolved.recipient().id, FOLLOW);
    assert_eq!(resolved.recipient().gender, Gender::Female);
    assert_eq!(resolved.lead_and_follow(), (LEAD, FOLLOW));
}

#[test]
fn missing_sender_is_not_eligible() {
    let fixture = fixture();
    match resolve_participants(
        proposal(UNKNOWN, FOLLOW, PartnershipRole::Lead),
        fixture.accounts.as_ref(),
    ) {
        Err(PartnershipRequestError::AccountNotEligible {
            participant: Participant::Sender,
            account_id,
            reason: Ineligibility::NotFound,
        }) => assert_eq!(account_id, UNKNOWN),
        other => panic!("expected missing sender, got {other:?}"),
    }
}

#[test]
fn non_athlete_recipient_is_not_eligible() {
    let fixture = fixture();
    match resolve_participants(
        proposal(LEAD, ORGANIZER, PartnershipRole::Lead),
        fixture.accounts.as_ref(),
    ) {
        Err(PartnershipRequestError::AccountNotEligible {
            participant: Participant::Recipient,
            reason: Ineligibility::NotAthlete,
            ..
        }) => {}
        other => panic!("expected non-athlete recipient, got {other:?}"),
    }
}

/// Directory that answers every id lookup with two copies of the same athlete.
struct DuplicatingDirectory;

impl AccountDirectory for DuplicatingDirectory {
    fn search(&self, criteria: &SearchAccountCriteria) -> Result<Vec<Account>, RepositoryError> {
        let id = criteria.id.unwrap_or(AccountId(0));
        let copy = account(id, Gender::Male, &[AccountRole::Athlete]);
        Ok(vec![copy.clone(), copy])
    }
}

#[test]
fn ambiguous_directory_matches_are_not_eligible() {
    match resolve_participants(
        proposal(LEAD, FOLLOW, PartnershipRole::Lead),
        &DuplicatingDirectory,
    ) {
        Err(PartnershipRequestError::AccountNotEligible {
            participant: Participant::Sender,
            reason: Ineligibility::NotFound,
            ..
        }) => {}
        other => panic!("expected ambiguous sender to be rejected, got {other:?}"),
    }
}

#[test]
fn blacklist_entry_from_recipient_vetoes_sender() {
    let fixture = fixture();
    fixture
        .blacklist
        .block(FOLLOW, LEAD, BlacklistReason::Harassment, None)
        .expect("block recorded");

    let resolved = resolve_participants(
        proposal(LEAD, FOLLOW, PartnershipRole::Lead),
        fixture.accounts.as_ref(),
    )
    .expect("participants resolve");

    assert!(matches!(
        ensure_sender_not_blocked(&resolved, fixture.blacklist.as_ref()),
        Err(PartnershipRequestError::SenderBlocked)
    ));
}

#[test]
fn blacklist_is_one_directional() {
    let fixture = fixture();
    fixture
        .blacklist
        .block(
            LEAD,
            FOLLOW,
            BlacklistReason::Spam,
            Some("repeated messages".to_string()),
        )
        .expect("block recorded");
    fixture
        .blacklist
        .block(FOLLOW, OTHER_LEAD, BlacklistReason::Other, None)
        .expect("block recorded");

    let resolved = resolve_participants(
        proposal(LEAD, FOLLOW, PartnershipRole::Lead),
        fixture.accounts.as_ref(),
    )
    .expect("participants resolve");

    assert!(ensure_sender_not_blocked(&resolved, fixture.blacklist.as_ref()).is_ok());
}

#[test]
fn blacklist_store_errors_propagate() {
    let fixture = fixture();
    let resolved = resolve_participants(
        proposal(LEAD, FOLLOW, PartnershipRole::Lead),
        fixture.accounts.as_ref(),
    )
    .expect("participants resolve");

    assert!(matches!(
        ensure_sender_not_blocked(&resolved, &UnavailableStore),
        Err(PartnershipRequestError::Repository(
            RepositoryError::Unavailable(_)
        ))
    ));
}

#[test]
fn existing_partnership_with_same_roles_is_a_duplicate() {
    let fixture = fixture();
    existing_partnership(&fixture.partnerships, LEAD, FOLLOW);

    let same_roles = resolve_participants(
        proposal(FOLLOW, LEAD, PartnershipRole::Follow),
        fixture.accounts.as_ref(),
    )
    .expect("participants resolve");
    match ensure_no_existing_partnership(&same_roles, fixture.partnerships.as_ref()) {
        Err(PartnershipRequestError::DuplicatePartnership { lead_id, follow_id }) => {
            assert_eq!((lead_id, follow_id), (LEAD, FOLLOW));
        }
        other => panic!("expected duplicate partnership, got {other:?}"),
    }

    let swapped_roles = resolve_participants(
        proposal(LEAD, FOLLOW, PartnershipRole::Follow),
        fixture.accounts.as_ref(),
    )
    .expect("participants resolve");
    assert!(ensure_no_existing_partnership(&swapped_roles, fixture.partnerships.as_ref()).is_ok());
}

#[test]
fn pending_request_in_same_direction_blocks_new_request() {
    let fixture = fixture();
    let pending = stored_request(
        &fixture.requests,
        proposal(LEAD, FOLLOW, PartnershipRole::Lead),
    );

    let same_direction = resolve_participants(
        proposal(LEAD, FOLLOW, PartnershipRole::Follow),
        fixture.accounts.as_ref(),
    )
    .expect("participants resolve");
    match ensure_no_pending_request(&same_direction, fixture.requests.as_ref()) {
        Err(PartnershipRequestError::PendingRequestExists { request_id }) => {
            assert_eq!(request_id, pending.id)
        }
        other => panic!("expected pending request conflict, got {other:?}"),
    }

    let opposite_direction = resolve_participants(
        proposal(FOLLOW, LEAD, PartnershipRole::Follow),
        fixture.accounts.as_ref(),
    )
    .expect("participants resolve");
    assert!(ensure_no_pending_request(&opposite_direction, fixture.requests.as_ref()).is_ok());
}

#[test]
fn resolved_requests_do_not_block_new_requests() {
    let fixture = fixture();
    let mut declined = stored_request(
        &fixture.requests,
        proposal(LEAD, FOLLOW, PartnershipRole::Lead),
    );
    declined.status = RequestStatus::Declined;
    fixture.requests.update(&declined).expect("update succeeds");

    let resolved = resolve_participants(
        proposal(LEAD, FOLLOW, PartnershipRole::Lead),
        fixture.accounts.as_ref(),
    )
    .expect("participants resolve");
    assert!(ensure_no_pending_request(&resolved, fixture.requests.as_ref()).is_ok());
}

#[test]
fn responses_need_both_identifiers() {
    let fixture = fixture();
    let missing_recipient = response(RequestId(1), AccountId(0), ResponseCode::Accept);
    match validate_response(&missing_recipient, fixture.requests.as_ref()) {
        Err(PartnershipRequestError::MissingIdentifier(field)) => assert_eq!(field, "recipient"),
        other => panic!("expected missing recipient, got {other:?}"),
    }

    let missing_request = response(RequestId(0), FOLLOW, ResponseCode::Accept);
    match validate_response(&missing_request, fixture.requests.as_ref()) {
        Err(PartnershipRequestError::MissingIdentifier(field)) => assert_eq!(field, "request"),
        other => panic!("expected missing request, got {other:?}"),
    }
}

#[test]
fn responses_must_come_from_the_recipient() {
    let fixture = fixture();
    let pending = stored_request(
        &fixture.requests,
        proposal(LEAD, FOLLOW, PartnershipRole::Lead),
    );

    let from_sender = response(pending.id, LEAD, ResponseCode::Accept);
    match validate_response(&from_sender, fixture.requests.as_ref()) {
        Err(PartnershipRequestError::RequestNotFound {
            request_id,
            recipient_id,
        }) => {
            assert_eq!(request_id, pending.id);
            assert_eq!(recipient_id, LEAD);
        }
        other => panic!("expected request not found, got {other:?}"),
    }

    let from_recipient = response(pending.id, FOLLOW, ResponseCode::Decline);
    let record =
        validate_response(&from_recipient, fixture.requests.as_ref()).expect("pending request");
    assert_eq!(record.status, RequestStatus::Pending);
}

#[test]
fn resolved_requests_reject_further_responses() {
    let fixture = fixture();
    let mut accepted = stored_request(
        &fixture.requests,
        proposal(LEAD, FOLLOW, PartnershipRole::Lead),
    );
    accepted.status = RequestStatus::Accepted;
    fixture.requests.update(&accepted).expect("update succeeds");

    match validate_response(
        &response(accepted.id, FOLLOW, ResponseCode::Decline),
        fixture.requests.as_ref(),
    ) {
        Err(PartnershipRequestError::AlreadyResolved { request_id, status }) => {
            assert_eq!(request_id, accepted.id);
            assert_eq!(status, RequestStatus::Accepted);
        }
        other => panic!("expected already resolved, got {other:?}"),
    }
}
