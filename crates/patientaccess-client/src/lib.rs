#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::redundant_pub_crate)]

//! Client for the Patient Access scheduling API.
//!
//! Signs a user in, decodes the issued bearer token, and fetches the
//! appointment slot types available to a patient.
//!
//! Layout:
//! - `client.rs`: [`Client`], [`ClientBuilder`], request construction and the endpoint calls
//! - `path.rs`: joining relative API paths onto the base URL
//! - `token.rs`: [`AccessToken`] and the expiry decode step
//! - `models.rs`: appointment slot DTOs
//! - `error.rs`: [`ClientError`]

pub mod client;
pub mod error;
pub mod models;
pub mod path;
pub mod token;

pub use client::{
    APPOINTMENT_HIERARCHY_PATH, Client, ClientBuilder, DEFAULT_BASE_URL, DEFAULT_USER_AGENT,
    HEADER_PATIENT_ID, SIGNIN_PATH,
};
pub use error::{ClientError, ClientResult};
pub use models::{AppointmentSlot, SlotType};
pub use path::join_paths;
pub use token::{AccessToken, WireAccessToken};
