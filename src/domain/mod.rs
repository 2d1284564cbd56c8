//! Domain layer with core entities and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;

pub use entities::{AvatarKey, EncodedAvatar, FetchOutcome};
pub use errors::{AvatarError, AvatarResource};
pub use ports::{AvatarByteStream, AvatarSourcePort};
