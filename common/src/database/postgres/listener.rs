use log::error;
use sqlx::{
    postgres::{PgListener, PgNotification},
    PgPool,
};

use crate::{
    database::{
        listener::{Notification, NotificationSource},
        postgres::Postgres,
    },
    error::{NdError, NdResult},
};

impl From<PgNotification> for Notification {
    fn from(notification: PgNotification) -> Self {
        Self::new(
            notification.channel(),
            notification.payload(),
            notification.process_id(),
        )
    }
}

/// Postgresql implementation of [NotificationSource]. Wraps a [PgListener] owning a dedicated
/// connection to the database.
pub struct PgNotificationSource {
    /// Underlying database client listener
    listener: PgListener,
}

impl PgNotificationSource {
    /// Create a new [PgNotificationSource], connecting with the `url` provided
    /// # Errors
    /// This function will return an error if a connection cannot be established
    pub async fn connect(url: &str) -> NdResult<Self> {
        let listener = PgListener::connect(url).await.map_err(NdError::Connection)?;
        Ok(Self { listener })
    }

    /// Create a new [PgNotificationSource], acquiring a connection from `pool`
    /// # Errors
    /// This function will return an error if a connection cannot be acquired from the pool
    pub async fn connect_with(pool: &PgPool) -> NdResult<Self> {
        let listener = PgListener::connect_with(pool)
            .await
            .map_err(NdError::Connection)?;
        Ok(Self { listener })
    }
}

impl NotificationSource for PgNotificationSource {
    type Database = Postgres;

    async fn listen(&mut self, channel: &str) -> NdResult<()> {
        self.listener
            .listen(channel)
            .await
            .map_err(|error| NdError::Subscription {
                channel: channel.to_owned(),
                error,
            })
    }

    async fn unlisten(&mut self, channel: &str) -> NdResult<()> {
        self.listener
            .unlisten(channel)
            .await
            .map_err(|error| NdError::Subscription {
                channel: channel.to_owned(),
                error,
            })
    }

    async fn recv(&mut self) -> NdResult<Notification> {
        let notification = match self.listener.recv().await {
            Ok(notification) => notification,
            Err(error) => {
                error!("Error receiving notification.\n{:?}", error);
                return Err(NdError::Connection(error));
            }
        };
        Ok(notification.into())
    }
}
