//! # Yatube Core
//!
//! The domain layer of Yatube.
//! This crate contains the post lifecycle, access rules and pagination with
//! zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod pagination;
pub mod policy;
pub mod ports;
pub mod service;
pub mod validation;

pub use error::{DomainError, ValidationError};
pub use pagination::{Page, PageNumber, PageWindow, Paginator};
pub use service::{EditOutcome, GroupService, PostDetail, PostListing, PostService, Profile};
