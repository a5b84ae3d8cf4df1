pub mod account;

pub use account::{AccountInfo, ErrorKind, ItemCounts, VerificationOutcome};
