//! Per-call options for receive and list operations.

use std::time::Duration;

/// How a receive removes or locks the message.
///
/// The mode decides the HTTP verb of the receive request. There is no
/// default: a receive with no mode set fails before any request is issued.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReceiveMode {
    /// Atomically remove the message from the entity on read.
    ReceiveAndDelete,
    /// Lock the message for exclusive processing without deleting it; the
    /// caller must unlock or delete it afterwards.
    PeekLock,
}

/// Options for receive operations.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use atombus_client::ReceiveMessageOptions;
///
/// let options = ReceiveMessageOptions::peek_lock().timeout(Duration::from_secs(30));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ReceiveMessageOptions {
    timeout: Option<Duration>,
    mode: Option<ReceiveMode>,
}

impl ReceiveMessageOptions {
    /// Create options with no mode and no timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for a receive-and-delete receive.
    pub fn receive_and_delete() -> Self {
        Self::new().mode(ReceiveMode::ReceiveAndDelete)
    }

    /// Options for a peek-lock receive.
    pub fn peek_lock() -> Self {
        Self::new().mode(ReceiveMode::PeekLock)
    }

    /// Set the receive mode.
    pub fn mode(mut self, mode: ReceiveMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Set how long the service holds the request waiting for a message.
    ///
    /// Sent to the service as whole seconds via the `timeout` query
    /// parameter; the client itself enforces no local deadline.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The configured mode, if any.
    pub fn get_mode(&self) -> Option<ReceiveMode> {
        self.mode
    }

    /// The configured server-side timeout, if any.
    pub fn get_timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

/// Options for list operations.
///
/// Paging values pass through as the `$skip`/`$top` query parameters; the
/// client never loops over pages itself.
#[derive(Clone, Debug, Default)]
pub struct ListOptions {
    skip: Option<u32>,
    top: Option<u32>,
}

impl ListOptions {
    /// Create options without paging parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entities to skip.
    pub fn skip(mut self, skip: u32) -> Self {
        self.skip = Some(skip);
        self
    }

    /// Maximum number of entities to return.
    pub fn top(mut self, top: u32) -> Self {
        self.top = Some(top);
        self
    }

    pub fn get_skip(&self) -> Option<u32> {
        self.skip
    }

    pub fn get_top(&self) -> Option<u32> {
        self.top
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receive_options_default_has_no_mode() {
        let options = ReceiveMessageOptions::new();
        assert_eq!(options.get_mode(), None);
        assert_eq!(options.get_timeout(), None);
    }

    #[test]
    fn test_receive_options_constructors() {
        assert_eq!(
            ReceiveMessageOptions::receive_and_delete().get_mode(),
            Some(ReceiveMode::ReceiveAndDelete)
        );
        assert_eq!(
            ReceiveMessageOptions::peek_lock().get_mode(),
            Some(ReceiveMode::PeekLock)
        );
    }

    #[test]
    fn test_receive_options_timeout() {
        let options = ReceiveMessageOptions::peek_lock().timeout(Duration::from_secs(55));
        assert_eq!(options.get_timeout(), Some(Duration::from_secs(55)));
    }

    #[test]
    fn test_list_options() {
        let options = ListOptions::new().skip(10).top(5);
        assert_eq!(options.get_skip(), Some(10));
        assert_eq!(options.get_top(), Some(5));
        assert_eq!(ListOptions::new().get_skip(), None);
    }
}
