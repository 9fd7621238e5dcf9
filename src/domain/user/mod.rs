//! User domain module.
//!
//! Only the billing-relevant slice of a user lives here; profile data is
//! owned by the identity provider.

mod account;

pub use account::UserAccount;
