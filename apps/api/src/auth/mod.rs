pub mod handlers;
pub mod jwt;
pub mod password;

pub use jwt::{AuthUser, MaybeAuthUser};
