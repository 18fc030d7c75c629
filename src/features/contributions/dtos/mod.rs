mod contribution_dto;

pub use contribution_dto::*;
