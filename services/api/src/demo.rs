use crate::infra::{seed_fixture_accounts, FIXTURE_ORGANIZER};
use chrono::Utc;
use clap::Args;
use das::account::{find_account, AccountDirectory, AccountId, SearchAccountCriteria};
use das::error::AppError;
use das::partnership::{
    BlacklistReason, PartnershipRequest, PartnershipRequestResponse, PartnershipRequestService,
    PartnershipRole, RequestStatus, ResponseCode, ResponseOutcome,
};
use das::store::memory::{
    InMemoryAccountDirectory, InMemoryBlacklistRegistry, InMemoryPartnershipRepository,
    InMemoryPartnershipRequestRepository,
};
use std::sync::Arc;

const SENDER: AccountId = AccountId(1);
const RECIPIENT: AccountId = AccountId(2);
const BLOCKED: AccountId = AccountId(5);

type DemoService = PartnershipRequestService<
    InMemoryAccountDirectory,
    InMemoryBlacklistRegistry,
    InMemoryPartnershipRepository,
    InMemoryPartnershipRequestRepository,
>;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Have the recipient decline instead of accept.
    #[arg(long)]
    pub(crate) decline: bool,
    /// The sender proposes to dance as follow rather than lead.
    #[arg(long)]
    pub(crate) sender_follows: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let accounts = Arc::new(InMemoryAccountDirectory::default());
    let blacklist = Arc::new(InMemoryBlacklistRegistry::default());
    seed_fixture_accounts(&accounts)?;
    blacklist.block(
        RECIPIENT,
        BLOCKED,
        BlacklistReason::Spam,
        Some("repeated requests after a decline".to_string()),
    )?;
    let service: DemoService = PartnershipRequestService::new(
        accounts.clone(),
        blacklist,
        Arc::new(InMemoryPartnershipRepository::default()),
        Arc::new(InMemoryPartnershipRequestRepository::default()),
    );

    println!("Partnership request demo");
    let sender = display_name(accounts.as_ref(), SENDER)?;
    let recipient = display_name(accounts.as_ref(), RECIPIENT)?;
    let sender_role = if args.sender_follows {
        PartnershipRole::Follow
    } else {
        PartnershipRole::Lead
    };

    println!("\nVetoed proposals");
    attempt(&service, proposal(BLOCKED, RECIPIENT, PartnershipRole::Lead));
    attempt(&service, proposal(SENDER, FIXTURE_ORGANIZER, PartnershipRole::Lead));
    let mut mirrored = proposal(SENDER, RECIPIENT, sender_role);
    mirrored.recipient_role = sender_role;
    attempt(&service, mirrored);

    println!("\nProposal");
    let request = service.create_request(proposal(SENDER, RECIPIENT, sender_role))?;
    println!(
        "- {sender} asks {recipient} to dance as {} (request {}, {})",
        sender_role.label(),
        request.id,
        request.status
    );
    attempt(&service, proposal(SENDER, RECIPIENT, sender_role));

    let inbox = service.received_requests(RECIPIENT, Some(RequestStatus::Pending))?;
    println!("- {recipient} has {} pending request(s)", inbox.len());

    println!("\nResponse");
    let code = if args.decline {
        ResponseCode::Decline
    } else {
        ResponseCode::Accept
    };
    let outcome = service.respond(PartnershipRequestResponse {
        request_id: request.id,
        recipient_id: RECIPIENT,
        response: code,
        responded_at: Utc::now(),
    })?;

    match outcome {
        ResponseOutcome::Accepted {
            request,
            partnership,
        } => {
            println!("- request {} {}", request.id, request.status);
            println!(
                "- partnership {}: lead {} / follow {}{}",
                partnership.id,
                display_name(accounts.as_ref(), partnership.lead_id)?,
                display_name(accounts.as_ref(), partnership.follow_id)?,
                if partnership.same_sex { " (same-sex)" } else { "" }
            );
            attempt(&service, proposal(RECIPIENT, SENDER, sender_role.counterpart()));
        }
        ResponseOutcome::Declined { request } => {
            println!("- request {} {}; no partnership created", request.id, request.status);
        }
        ResponseOutcome::Ignored { request_id } => {
            println!("- response code ignored; request {request_id} still pending");
        }
    }

    let partnerships = service.partnerships_for(SENDER)?;
    println!("\n{sender} now has {} partnership(s)", partnerships.len());
    for partnership in &partnerships {
        if let Some(role) = partnership.role_of(SENDER) {
            println!("- partnership {}: dances as {}", partnership.id, role.label());
        }
    }
    Ok(())
}

fn proposal(
    sender_id: AccountId,
    recipient_id: AccountId,
    sender_role: PartnershipRole,
) -> PartnershipRequest {
    PartnershipRequest {
        sender_id,
        recipient_id,
        sender_role,
        recipient_role: sender_role.counterpart(),
        message: "Looking for a partner for the autumn open".to_string(),
    }
}

fn attempt(service: &DemoService, request: PartnershipRequest) {
    let (sender_id, recipient_id) = (request.sender_id, request.recipient_id);
    match service.create_request(request) {
        Ok(record) => println!("- {sender_id} -> {recipient_id}: created request {}", record.id),
        Err(err) => println!("- {sender_id} -> {recipient_id}: rejected ({err})"),
    }
}

fn display_name<D: AccountDirectory>(directory: &D, id: AccountId) -> Result<String, AppError> {
    let account = find_account(directory, &SearchAccountCriteria::by_id(id))?;
    Ok(account
        .map(|account| account.full_name())
        .unwrap_or_else(|| format!("account {id}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_runs_for_every_flag_combination() {
        for (decline, sender_follows) in [(false, false), (true, false), (false, true)] {
            run_demo(DemoArgs {
                decline,
                sender_follows,
            })
            .expect("demo completes");
        }
    }
}
