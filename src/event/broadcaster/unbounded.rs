use crossbeam::channel::{unbounded, Receiver, Sender};

/// Fans out every message to all subscribers, each one through its own unbounded channel.
///
/// Used by the output relay so a single read of a child stream reaches every sink (console and,
/// optionally, a log file). Disconnected subscribers are dropped on the next broadcast. Dropping
/// the broadcaster disconnects every subscriber once their queued messages are consumed.
#[derive(Debug)]
pub struct UnboundedBroadcast<T> {
    subscribers: Vec<Sender<T>>,
}

impl<T> Default for UnboundedBroadcast<T> {
    fn default() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }
}

impl<T> UnboundedBroadcast<T>
where
    T: Clone,
{
    pub fn subscribe(&mut self) -> Receiver<T> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Returns the number of subscribers that received the message.
    pub fn broadcast(&mut self, message: T) -> usize {
        self.subscribers.retain(|s| s.send(message.clone()).is_ok());
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_subscriber_gets_every_message() {
        let mut broadcaster = UnboundedBroadcast::default();
        let console = broadcaster.subscribe();
        let file = broadcaster.subscribe();

        assert_eq!(broadcaster.broadcast("first".to_string()), 2);
        assert_eq!(broadcaster.broadcast("second".to_string()), 2);

        assert_eq!(console.recv().unwrap(), "first");
        assert_eq!(console.recv().unwrap(), "second");
        assert_eq!(file.recv().unwrap(), "first");
        assert_eq!(file.recv().unwrap(), "second");
    }

    #[test]
    fn dropped_subscriber_is_removed() {
        let mut broadcaster = UnboundedBroadcast::default();
        let console = broadcaster.subscribe();
        drop(broadcaster.subscribe());

        assert_eq!(broadcaster.broadcast("line"), 1);
        assert_eq!(console.recv().unwrap(), "line");
    }

    #[test]
    fn dropping_broadcaster_disconnects_subscribers() {
        let mut broadcaster = UnboundedBroadcast::default();
        let console = broadcaster.subscribe();

        broadcaster.broadcast("last line");
        drop(broadcaster);

        // queued messages are still delivered before the disconnection
        assert_eq!(console.recv().unwrap(), "last line");
        console.recv().unwrap_err();
    }

    #[test]
    fn broadcast_without_subscribers() {
        let mut broadcaster: UnboundedBroadcast<&str> = UnboundedBroadcast::default();
        assert_eq!(broadcaster.broadcast("nobody listens"), 0);
    }
}
