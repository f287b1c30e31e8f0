use common::{database::listener::Notification, error::CallbackError};

/// Boxed callback invoked once per notification dispatched on its channel. Receives [None] only
/// during an initial run before any notification has been delivered.
pub type Callback = Box<dyn FnMut(Option<&Notification>) -> Result<(), CallbackError> + Send>;

/// Callbacks registered against a single channel, in registration order
struct ChannelCallbacks {
    /// Name of the channel the callbacks are registered against
    channel: String,
    /// Registered callbacks, oldest first
    callbacks: Vec<Callback>,
}

/// Mapping of channel name to registered callbacks. Channels are kept in first-subscription
/// order and callbacks within a channel in registration order, since the initial run fires
/// everything in exactly that order. Duplicate registrations are kept as-is.
#[derive(Default)]
pub struct CallbackRegistry {
    /// Per-channel callback entries, ordered by first subscription
    channels: Vec<ChannelCallbacks>,
}

impl CallbackRegistry {
    /// True if at least one callback is registered against `channel`
    pub fn contains_channel(&self, channel: &str) -> bool {
        self.channels.iter().any(|entry| entry.channel == channel)
    }

    /// Append `callback` to the entry for `channel`, creating the entry if this is the first
    /// subscription for the channel
    pub fn register(&mut self, channel: &str, callback: Callback) {
        match self
            .channels
            .iter_mut()
            .find(|entry| entry.channel == channel)
        {
            Some(entry) => entry.callbacks.push(callback),
            None => self.channels.push(ChannelCallbacks {
                channel: channel.to_owned(),
                callbacks: vec![callback],
            }),
        }
    }

    /// Remove the entry for `channel` with all of its callbacks. Returns false if the channel
    /// had no entry.
    pub fn remove_channel(&mut self, channel: &str) -> bool {
        let Some(position) = self
            .channels
            .iter()
            .position(|entry| entry.channel == channel)
        else {
            return false;
        };
        self.channels.remove(position);
        true
    }

    /// Remove every entry, returning the channel names that were registered in order
    pub fn drain_channels(&mut self) -> Vec<String> {
        self.channels
            .drain(..)
            .map(|entry| entry.channel)
            .collect()
    }

    /// Registered channel names in first-subscription order
    pub fn channels(&self) -> impl Iterator<Item = &str> {
        self.channels.iter().map(|entry| entry.channel.as_str())
    }

    /// Mutable access to the callbacks registered against `channel`, if any
    pub fn callbacks_mut(&mut self, channel: &str) -> Option<&mut [Callback]> {
        self.channels
            .iter_mut()
            .find(|entry| entry.channel == channel)
            .map(|entry| entry.callbacks.as_mut_slice())
    }
}
