use super::{SubscriberEmail, SubscriberName};

#[derive(serde::Deserialize)]
pub struct SubscribeBody {
    pub email: String,
    pub name: Option<String>,
}

#[derive(Debug)]
pub struct NewSubscriber {
    pub email: SubscriberEmail,
    pub name: Option<SubscriberName>,
}

impl TryFrom<SubscribeBody> for NewSubscriber {
    type Error = String;

    fn try_from(body: SubscribeBody) -> Result<Self, Self::Error> {
        let email = SubscriberEmail::parse(body.email)?;
        // An absent or empty name is allowed; anything else must parse.
        let name = match body.name {
            Some(name) if !name.trim().is_empty() => Some(SubscriberName::parse(name)?),
            _ => None,
        };

        Ok(Self { email, name })
    }
}

impl NewSubscriber {
    pub fn name_as_str(&self) -> Option<&str> {
        self.name.as_ref().map(|n| n.as_ref())
    }
}
