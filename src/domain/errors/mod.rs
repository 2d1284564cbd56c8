//! Domain error types.

mod avatar_error;

pub use avatar_error::{AvatarError, AvatarResource};
