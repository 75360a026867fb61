//! Request engine subsystem.
//!
//! # Data Flow
//! ```text
//! RestletLink (method, payload)
//!     → executor.rs (resolve target once, then the attempt loop)
//!     → request.rs (query string or JSON body, attempt budget)
//!     → auth::RequestSigner (headers, re-signed per attempt)
//!     → Transport (one HTTP exchange)
//!     → response.rs (decode, detect embedded error envelopes)
//!     → retry, or hand the outcome back
//! ```

pub mod executor;
pub mod request;
pub mod response;

pub use executor::{DelayFn, DelayFuture, Executor};
pub use request::RequestContext;
