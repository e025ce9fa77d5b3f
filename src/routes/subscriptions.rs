mod errors;
mod helpers;
mod subscribe;
mod unsubscribe;

pub use errors::{SubscribeError, UnsubscribeError};
pub use subscribe::subscribe;
pub use unsubscribe::unsubscribe;
