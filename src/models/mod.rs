//! Data models for platform entities

mod giving;
mod group;
mod prayer;
mod user;

pub use giving::*;
pub use group::*;
pub use prayer::*;
pub use user::*;
