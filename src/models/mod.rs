//! Data models for records relayed from the upstream API.
//!
//! Records keep every raw upstream field and gain the derived fields clients rely on.

mod post;
mod tag;

pub use post::*;
pub use tag::*;
