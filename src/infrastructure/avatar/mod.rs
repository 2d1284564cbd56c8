//! Avatar source adapters.
//!
//! - `http_source`: the remote avatar endpoint pair
//! - `local_source`: a directory of `.jpg` / `.png` files

pub mod http_source;
pub mod local_source;

pub use http_source::{
    DEFAULT_BINARY_ROUTE, DEFAULT_CONTENT_TYPE_ROUTE, HttpAvatarSource, HttpSourceError,
    HttpSourceSettings,
};
pub use local_source::{LocalAvatarSource, avatar_file_stem};
