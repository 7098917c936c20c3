//! # halo-guardrail
//!
//! Text guards applied before user input reaches storage or a model.
//!
//! ```
//! use halo_guardrail::mask_pii;
//!
//! let (masked, redactions) = mask_pii("mail me at budi@example.co.id");
//! assert_eq!(masked, "mail me at <email_redacted>");
//! assert_eq!(redactions[0].kind, "email");
//! ```

pub mod pii;
pub mod sanitize;

pub use pii::{PiiKind, PiiMasker, mask_pii};
pub use sanitize::{MAX_AGENT_INPUT_CHARS, is_react_trace, sanitize_agent_input};
