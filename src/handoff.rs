use tokio::sync::oneshot;

use crate::submit::SubmissionResult;

/// One-shot, fire-and-forget transfer of a result to the next screen.
///
/// Nothing durable backs the channel: the receiving side reads at most once,
/// and entering the result view with nothing handed off is a valid neutral
/// state, not an error. An abandoned receiver makes the send a no-op, so a
/// submission that resolves after the user navigated away cannot fault.
pub fn channel() -> (HandoffSender, HandoffReceiver) {
    let (tx, rx) = oneshot::channel();
    (HandoffSender(tx), HandoffReceiver(Some(rx)))
}

pub struct HandoffSender(oneshot::Sender<SubmissionResult>);

impl HandoffSender {
    /// Hand the result over, consuming the sender. Dropped receivers are
    /// ignored.
    pub fn send(self, result: SubmissionResult) {
        let _ = self.0.send(result);
    }
}

pub struct HandoffReceiver(Option<oneshot::Receiver<SubmissionResult>>);

impl HandoffReceiver {
    /// Take the handed-off result, at most once. Returns `None` when nothing
    /// was sent, the sender was dropped, or the result was already taken.
    pub fn take(&mut self) -> Option<SubmissionResult> {
        self.0.take().and_then(|mut rx| rx.try_recv().ok())
    }
}
