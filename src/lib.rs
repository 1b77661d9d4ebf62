//! # apk-version
//!
//! A library providing a total ordering over Alpine (apk) package version
//! strings, as a package manager needs it to decide upgrade, downgrade and
//! equality relationships.
//!
//! # Example
//!
//! ```rust
//! use apk_version::{Match, Version, compare};
//!
//! let installed = Version::new("1.2.3-r4");
//! let available = Version::new("1.2.4");
//! assert!(installed.is_less_than(&available));
//! assert_eq!(compare(Some(&installed), Some(&available)), Match::LESS);
//! assert_eq!(Match::LESS.as_operator(), "<");
//!
//! // pre-release suffixes sort below their unsuffixed counterpart
//! assert!(Version::new("1.2_rc1") < Version::new("1.2"));
//!
//! // an absent version matches any ordering constraint
//! assert_eq!(
//!     compare(None, Some(&available)),
//!     Match::EQUAL | Match::LESS | Match::GREATER,
//! );
//! ```

mod errors;
pub use crate::errors::*;

mod cursor;

mod version;
pub use crate::version::*;
