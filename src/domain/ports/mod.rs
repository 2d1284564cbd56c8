mod avatar_source_port;

pub use avatar_source_port::{AvatarByteStream, AvatarSourcePort};

#[cfg(test)]
pub use avatar_source_port::MockAvatarSourcePort;

#[cfg(test)]
pub mod mocks {
    pub use super::avatar_source_port::mock::{StubAvatarSource, StubReply};
}
