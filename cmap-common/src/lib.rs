//! # Community Map Common Library
//!
//! Shared code for the community map service:
//! - Error and result types
//! - Configuration resolution (CLI → ENV → TOML → defaults)
//! - Member record data model

pub mod config;
pub mod error;
pub mod member;

pub use error::{Error, Result};
pub use member::{Coordinates, GeocodeStatus, Member, MemberTable};
