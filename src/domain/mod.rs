//! Domain layer for the Zontacts plugin.
//!
//! Core types independent of Zellij APIs or infrastructure concerns.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`contact`]: Contact model, identifiers and collection construction
//!
//! # Examples
//!
//! ```
//! use zontacts::domain::{Contact, Result};
//!
//! fn first_contact() -> Result<Contact> {
//!     Ok(Contact::new(1u64, "Egor", "Emelyanov", "https://example.com/1.jpg"))
//! }
//!
//! assert_eq!(first_contact().unwrap().full_name(), "Egor Emelyanov");
//! ```

pub mod contact;
pub mod error;

pub use contact::{collection_from_records, Contact, ContactId, ContactRecord};
pub use error::{Result, ZontactsError};
