//! Data Transfer Objects for REST request/response serialization.

pub mod bin_dto;
pub mod history_dto;

pub use bin_dto::*;
pub use history_dto::*;
