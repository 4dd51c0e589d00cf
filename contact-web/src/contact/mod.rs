//! Contact submission handling.
//!
//! ## Flow
//!
//! ```text
//! JSON body → Submission::from_json() → validate() → compose_email() → OutboundEmail
//! ```

pub mod message;
pub mod submission;

pub use message::compose_email;
pub use submission::{Submission, MESSAGE_MAX_CHARS, TOKEN_FIELD};
