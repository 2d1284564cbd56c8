//! Domain entities.

mod avatar_key;
mod encoded_avatar;
mod fetch_outcome;

pub use avatar_key::AvatarKey;
pub use encoded_avatar::EncodedAvatar;
pub use fetch_outcome::{FetchOutcome, combine};
