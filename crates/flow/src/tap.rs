//! Per-node taps: read-only views of what a node receives.

use std::sync::mpsc::{Receiver, Sender, channel};
use std::sync::{Mutex, PoisonError};

use crate::Message;

/// Copies of every message delivered to one node since the tap was opened.
///
/// Dropping the tap detaches it; the flow stops copying on the next delivery.
#[derive(Debug)]
pub struct Tap {
    receiver: Receiver<Message>,
}

impl Tap {
    /// Everything received so far, oldest first. Never blocks.
    pub fn drain(&self) -> Vec<Message> {
        self.receiver.try_iter().collect()
    }
}

/// The open taps on one node. Owned by the flow, never global.
#[derive(Debug, Default)]
pub(crate) struct TapSet {
    senders: Mutex<Vec<Sender<Message>>>,
}

impl TapSet {
    pub(crate) fn attach(&self) -> Tap {
        let (sender, receiver) = channel();
        self.senders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sender);
        Tap { receiver }
    }

    /// Copy `message` to every open tap and forget the ones that were dropped.
    pub(crate) fn notify(&self, message: &Message) {
        let mut senders = self.senders.lock().unwrap_or_else(PoisonError::into_inner);
        if senders.is_empty() {
            return;
        }
        senders.retain(|tx| tx.send(message.clone()).is_ok());
    }
}
