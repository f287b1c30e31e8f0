use serde::de::DeserializeOwned;

use crate::{
    database::Database,
    error::{NdError, NdResult},
};

/// Notification delivered by the database server on a named channel. Decoded from the wire
/// protocol by the database client before it reaches this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Name of the channel the notification was sent on
    channel: String,
    /// Payload text attached to the notification. Empty when the sender supplied no payload.
    payload: String,
    /// Process id of the backend that sent the notification
    process_id: u32,
}

impl Notification {
    /// Create a new [Notification] from its decoded parts
    pub fn new<C: Into<String>, P: Into<String>>(channel: C, payload: P, process_id: u32) -> Self {
        Self {
            channel: channel.into(),
            payload: payload.into(),
            process_id,
        }
    }

    /// Name of the channel the notification was sent on
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Payload text attached to the notification
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Process id of the backend that sent the notification
    pub const fn process_id(&self) -> u32 {
        self.process_id
    }

    /// Deserialize the payload as JSON into the requested type
    /// # Errors
    /// This function will return an error if the payload is not valid JSON for the type `T`
    pub fn json_payload<T: DeserializeOwned>(&self) -> NdResult<T> {
        serde_json::from_str(&self.payload)
            .map_err(|_| NdError::PayloadParseError(self.payload.clone()))
    }
}

/// Source of notifications for a single database connection. The seam between the dispatcher and
/// the database client: implementors must be able to issue `LISTEN`/`UNLISTEN` statements and
/// block until the server delivers the next notification.
pub trait NotificationSource
where
    Self: Send,
{
    /// Database that delivers notifications to this source
    type Database: Database;
    /// Issue a `LISTEN` statement for `channel` so the server streams its notifications to this
    /// source's connection
    async fn listen(&mut self, channel: &str) -> NdResult<()>;
    /// Issue an `UNLISTEN` statement for `channel`
    async fn unlisten(&mut self, channel: &str) -> NdResult<()>;
    /// Block until the next notification is available on the connection
    async fn recv(&mut self) -> NdResult<Notification>;
}
