//! Listener module for the components that subscribe to notification channels and route
//! incoming notifications to registered callbacks.

pub mod registry;

use common::{
    database::{
        listener::{Notification, NotificationSource},
        postgres::listener::PgNotificationSource,
    },
    error::{CallbackError, NdError, NdResult},
};
use log::info;
use sqlx::PgPool;

use self::registry::CallbackRegistry;

/// Dispatches notifications from a single database connection to caller supplied callbacks.
///
/// A [NotificationListener] is built against a [NotificationSource] that owns the listening
/// connection exclusively. Callbacks are attached per channel with
/// [subscribe_to_channel][NotificationListener::subscribe_to_channel], after which a call to
/// [start][NotificationListener::start] runs the dispatch loop for the remaining lifetime of the
/// process. Each incoming notification is stored as the listener's last notification and then
/// passed to every callback registered for its channel, in registration order. Callbacks run
/// inline on the task that called [start][NotificationListener::start] and a callback error ends
/// the loop; the listener never decides on its own to drop a notification or keep running past a
/// failure.
pub struct NotificationListener<L>
where
    L: NotificationSource,
{
    /// Source of incoming notifications, owning the database connection
    source: L,
    /// Registered callbacks per channel
    registry: CallbackRegistry,
    /// Most recently dispatched notification, if any
    last_notification: Option<Notification>,
}

impl NotificationListener<PgNotificationSource> {
    /// Create a new [NotificationListener] connected to the postgres database at `url`
    /// # Errors
    /// This function will return an error if a connection cannot be established
    pub async fn connect(url: &str) -> NdResult<Self> {
        Ok(Self::new(PgNotificationSource::connect(url).await?))
    }

    /// Create a new [NotificationListener] holding a connection acquired from `pool`
    /// # Errors
    /// This function will return an error if a connection cannot be acquired from the pool
    pub async fn connect_with(pool: &PgPool) -> NdResult<Self> {
        Ok(Self::new(PgNotificationSource::connect_with(pool).await?))
    }
}

impl<L> NotificationListener<L>
where
    L: NotificationSource,
{
    /// Create a new [NotificationListener] dispatching notifications received from `source`
    pub fn new(source: L) -> Self {
        Self {
            source,
            registry: CallbackRegistry::default(),
            last_notification: None,
        }
    }

    /// Most recently dispatched notification. [None] until the first notification has been
    /// dispatched.
    pub const fn last_notification(&self) -> Option<&Notification> {
        self.last_notification.as_ref()
    }

    /// Subscribe to `channel`, registering `callback` to run for every notification delivered on
    /// it. The first subscription for a channel issues a `LISTEN` statement on the connection;
    /// further subscriptions only append their callback, preserving registration order.
    /// # Errors
    /// This function will return an error if the `LISTEN` statement fails. The callback is not
    /// registered in that case.
    pub async fn subscribe_to_channel<F>(&mut self, channel: &str, callback: F) -> NdResult<()>
    where
        F: FnMut(Option<&Notification>) -> Result<(), CallbackError> + Send + 'static,
    {
        if !self.registry.contains_channel(channel) {
            self.source.listen(channel).await?;
            info!("Listening to channel `{channel}`");
        }
        self.registry.register(channel, Box::new(callback));
        Ok(())
    }

    /// Drop every callback registered for `channel` and issue an `UNLISTEN` statement so the
    /// server stops streaming its notifications to this connection
    /// # Errors
    /// This function will return an error if `channel` has no subscriptions or the `UNLISTEN`
    /// statement fails
    pub async fn unsubscribe_channel(&mut self, channel: &str) -> NdResult<()> {
        if !self.registry.remove_channel(channel) {
            return Err(NdError::Generic(format!(
                "Cannot unsubscribe from channel `{channel}` that has no subscriptions"
            )));
        }
        self.source.unlisten(channel).await?;
        info!("No longer listening to channel `{channel}`");
        Ok(())
    }

    /// Drop every registered callback, issuing an `UNLISTEN` statement per subscribed channel
    /// # Errors
    /// This function will return an error if an `UNLISTEN` statement fails
    pub async fn unsubscribe_all(&mut self) -> NdResult<()> {
        for channel in self.registry.drain_channels() {
            self.source.unlisten(&channel).await?;
            info!("No longer listening to channel `{channel}`");
        }
        Ok(())
    }

    /// Run the callbacks currently registered for `channel` once each, passing the last known
    /// notification as context. No-op for a channel without subscriptions.
    /// # Errors
    /// This function will return an error if a callback returns an error. Remaining callbacks
    /// for the channel are not run.
    pub fn run_channel_callbacks(&mut self, channel: &str) -> NdResult<()> {
        let Some(callbacks) = self.registry.callbacks_mut(channel) else {
            return Ok(());
        };
        for callback in callbacks.iter_mut() {
            if let Err(error) = callback(self.last_notification.as_ref()) {
                return Err(NdError::Callback {
                    channel: channel.to_owned(),
                    error,
                });
            }
        }
        Ok(())
    }

    /// Run every registered callback once, channel by channel in first-subscription order and in
    /// registration order within a channel
    /// # Errors
    /// This function will return an error if a callback returns an error. Remaining callbacks
    /// are not run.
    pub fn run_all_callbacks(&mut self) -> NdResult<()> {
        let channels: Vec<String> = self.registry.channels().map(str::to_owned).collect();
        for channel in channels {
            self.run_channel_callbacks(&channel)?;
        }
        Ok(())
    }

    /// Start the notification dispatch loop. When `initial_run` is true, every registered
    /// callback is first run once with the last known notification (none, on a fresh listener)
    /// so work queued while no listener was running is not left unprocessed. The loop then waits
    /// on the connection indefinitely, dispatching each incoming notification to the callbacks
    /// registered for its channel.
    ///
    /// This function does not return under normal operation. It is the terminal call of the
    /// listener's lifecycle, ending only when a callback fails or the connection produces an
    /// error.
    /// # Errors
    /// This function will return an error if a callback returns an error or receiving from the
    /// connection fails
    pub async fn start(&mut self, initial_run: bool) -> NdResult<()> {
        if initial_run {
            info!("Performing initial run of all registered callbacks");
            self.run_all_callbacks()?;
        }
        info!("Waiting for notifications");
        loop {
            let notification = self.source.recv().await?;
            self.handle_notification(notification)?;
        }
    }

    /// Record `notification` as the last notification and run the callbacks registered for its
    /// channel. A notification for a channel without subscriptions still updates the last
    /// notification.
    fn handle_notification(&mut self, notification: Notification) -> NdResult<()> {
        let channel = notification.channel().to_owned();
        self.last_notification = Some(notification);
        self.run_channel_callbacks(&channel)
    }
}
