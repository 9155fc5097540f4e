//! JumpCloud API interaction module
//!
//! # Module Structure
//!
//! - [`http`] - HTTP utilities and API error classification
//! - [`client`] - Client bound to one API version's base path
//! - [`v1`] - Applications and system search
//! - [`v2`] - Association graph

pub mod client;
pub mod http;
pub mod v1;
pub mod v2;
