//! Staff authentication: password hashing, signed session tokens and the
//! request guard built on them.

pub mod guard;
pub mod password;
pub mod token;

pub use guard::{authorize, AuthorizedSubject, Rejection, StaffAuth};
pub use token::{Claims, InvalidToken, IssuedToken, TokenCodec};
