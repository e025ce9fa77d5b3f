mod new_subscriber;
mod subscriber_email;
mod subscriber_name;
mod subscription;

pub use new_subscriber::{NewSubscriber, SubscribeBody};
pub use subscriber_email::SubscriberEmail;
pub use subscriber_name::SubscriberName;
pub use subscription::Subscription;
