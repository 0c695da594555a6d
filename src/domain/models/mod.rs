mod backend;
mod message;
mod notice;
mod role;
mod store;
mod transcript;

pub use backend::*;
pub use message::*;
pub use notice::*;
pub use role::*;
pub use store::*;
pub use transcript::*;
