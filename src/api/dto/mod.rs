//! Data Transfer Objects for REST request serialization.

pub mod pagination_dto;

pub use pagination_dto::*;
