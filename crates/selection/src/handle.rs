//! Cross-thread access to the UI-thread controller.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use snapzone_common::config::ScreenshotMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerRequest {
    StartCapture(ScreenshotMode),
    Cancel,
}

/// Cloneable, `Send` handle that queues requests for the UI thread and
/// wakes it.
#[derive(Clone)]
pub struct ControllerHandle {
    sender: Sender<ControllerRequest>,
    waker: Arc<dyn Fn() + Send + Sync>,
}

/// UI-thread end of the request queue.
pub struct RequestInbox {
    receiver: Receiver<ControllerRequest>,
}

/// Create a handle/inbox pair. `waker` is called after every request, for
/// example to request a repaint.
pub fn controller_channel(
    waker: impl Fn() + Send + Sync + 'static,
) -> (ControllerHandle, RequestInbox) {
    let (sender, receiver) = mpsc::channel();
    (
        ControllerHandle {
            sender,
            waker: Arc::new(waker),
        },
        RequestInbox { receiver },
    )
}

impl ControllerHandle {
    /// Queue `request`. Returns false once the UI thread has gone away.
    pub fn request(&self, request: ControllerRequest) -> bool {
        if self.sender.send(request).is_err() {
            tracing::debug!(?request, "Controller inbox closed");
            return false;
        }
        (self.waker)();
        true
    }

    pub fn start_capture(&self, mode: ScreenshotMode) -> bool {
        self.request(ControllerRequest::StartCapture(mode))
    }

    pub fn cancel(&self) -> bool {
        self.request(ControllerRequest::Cancel)
    }
}

impl std::fmt::Debug for ControllerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerHandle").finish_non_exhaustive()
    }
}

impl RequestInbox {
    /// Take every queued request without blocking.
    pub fn drain(&self) -> Vec<ControllerRequest> {
        let mut requests = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(request) => requests.push(request),
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => break,
            }
        }
        requests
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn requests_from_other_threads_are_drained_in_order() {
        let wakes = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&wakes);
        let (handle, inbox) = controller_channel(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let remote = handle.clone();
        std::thread::spawn(move || {
            remote.start_capture(ScreenshotMode::Mouse);
            remote.cancel();
        })
        .join()
        .unwrap();

        assert_eq!(
            inbox.drain(),
            vec![
                ControllerRequest::StartCapture(ScreenshotMode::Mouse),
                ControllerRequest::Cancel
            ]
        );
        assert_eq!(wakes.load(Ordering::SeqCst), 2);
        assert!(inbox.drain().is_empty());
    }

    #[test]
    fn closed_inbox_reports_failure() {
        let (handle, inbox) = controller_channel(|| {});
        drop(inbox);
        assert!(!handle.cancel());
    }
}
