//! Authentication subsystem.
//!
//! # Data Flow
//! ```text
//! AccountSettings
//!     → credential.rs (classify once: OAuth1 or NLAuth, or fail)
//!     → AccountCredential (immutable, owned by the link)
//!
//! Each attempt:
//!     → signer.rs (dispatch on the credential variant)
//!     → oauth1.rs (HMAC-SHA256 signature) | literal NLAuth header
//!     → Authorization + content-type headers
//! ```
//!
//! # Design Decisions
//! - Credentials are a tagged enum, not a trait object
//! - OAuth1 requests are re-signed on every attempt (fresh nonce and timestamp)

pub mod credential;
pub mod oauth1;
pub mod signer;

pub use credential::AccountCredential;
pub use signer::RequestSigner;
