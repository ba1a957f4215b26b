//! Pre-built [`tracing::Span`] constructors for governance operations.
//!
//! Consistent span names and field sets make it easy to correlate a
//! rejected call with the proposal it targeted.

use blan_types::Address;
use tracing::{info_span, Span};

use crate::proposal::ProposalId;

pub fn propose_span(proposer: &Address) -> Span {
    info_span!("propose", proposer = %proposer)
}

pub fn vote_span(id: ProposalId, voter: &Address) -> Span {
    info_span!("cast_vote", proposal = id, voter = %voter)
}

pub fn finalize_span(id: ProposalId) -> Span {
    info_span!("finalize", proposal = id)
}

pub fn execute_span(id: ProposalId) -> Span {
    info_span!("execute", proposal = id)
}

pub fn cancel_span(id: ProposalId, caller: &Address) -> Span {
    info_span!("cancel", proposal = id, caller = %caller)
}
