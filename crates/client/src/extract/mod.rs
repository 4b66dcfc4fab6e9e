//! Content extraction from fetched HTML.
//!
//! ### Emails
//! - Permissive pattern over `<head>` + `<body>` text, unioned with `mailto:` hrefs.
//! - Second-pass cleaning against a boundary-anchored pattern, lossless on no match.
//!
//! ### Titles
//! - First `<title>`, trimmed.
//!
//! ### Links
//! - Selector-driven href collection, deduplicated in document order.

pub mod emails;
pub mod links;
pub mod title;

pub use emails::{clean_all, clean_email, extract_emails};
pub use links::extract_hrefs;
pub use title::extract_title;
