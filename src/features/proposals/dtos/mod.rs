mod proposal_dto;

pub use proposal_dto::{
    AssignmentDto, ContactDto, CreateProposalDto, ProposalResponseDto, ReviewRequestDto,
    ReviewResponseDto, UpdateProposalDto,
};
