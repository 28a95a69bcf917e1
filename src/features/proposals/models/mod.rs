mod proposal;
mod status;

pub use proposal::{Proposal, ProposalUpdate, ProposalWithAuthor};
pub use status::{ProposalStatus, PROJECT_TRACK};
