/// Actions sent from the frontend to the backend
#[derive(Debug, Clone)]
pub enum BackendAction {
    /// Point the backend at a discussion service
    Connect { base_url: String },
    /// Start polling a channel (restarts any existing subscription)
    Subscribe { channel_id: i64 },
    /// Stop polling a channel
    Unsubscribe { channel_id: i64 },
    /// Post a message to a channel
    SendMessage { channel_id: i64, text: String },
    /// Fetch the page of history preceding `before_id`
    LoadOlder { channel_id: i64, before_id: i64 },
    /// Refresh the channel directory
    ListChannels,
    /// Shut the backend down
    Quit,
}

/// Events sent from the backend to the frontend
#[derive(Debug, Clone)]
pub enum ClientEvent {
    /// The service answered the connect probe
    Connected { base_url: String },
    /// The backend has shut down
    Disconnected(String),
    /// Something failed in a way the user should see
    Error(String),
    /// Informational line for the system log
    Info(String),
    /// The channel directory was (re)fetched
    ChannelList(Vec<crate::api::Channel>),
    /// A poll session started for a channel
    SubscriptionStarted { channel_id: i64, name: String },
    /// A poll session was stopped
    SubscriptionEnded { channel_id: i64 },
    /// The poller appended a new message
    MessageReceived {
        channel_id: i64,
        message: crate::api::Message,
        fragment: String,
    },
    /// An older page of history was fetched for prepending
    HistoryLoaded {
        channel_id: i64,
        lines: Vec<(i64, String)>,
    },
    /// The server accepted a sent message
    MessageSent { channel_id: i64, id: i64 },
}
