mod locator_dto;

pub use locator_dto::*;
