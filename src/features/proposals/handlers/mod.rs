pub mod proposal_handler;
