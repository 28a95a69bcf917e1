mod project_dto;

pub use project_dto::{
    ProjectFilterQuery, ProjectResponseDto, ProjectStudentDto, ProjectUpdateDto, UpdateProjectDto,
};
