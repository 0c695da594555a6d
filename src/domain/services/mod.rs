mod chat_session;
mod model_client;

pub use chat_session::*;
pub use model_client::*;
