//! The channel `#[async_bridge]` turns a completion callback into a future with.

use core::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};
use futures::{channel::oneshot, FutureExt};
use std::sync::{Mutex, PoisonError};

/// The sending half: resumed once by the callback.
#[derive(Debug)]
pub struct Completion<T> {
    // Behind a mutex so that `resume` takes `&self` and the callback can be a `Fn`.
    sender: Mutex<Option<oneshot::Sender<T>>>,
}

/// The receiving half: resolves to the value the callback was called with.
#[derive(Debug)]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Pending<T> {
    receiver: oneshot::Receiver<T>,
}

impl<T> Completion<T> {
    pub fn channel() -> (Self, Pending<T>) {
        let (sender, receiver) = oneshot::channel();
        (Self { sender: Mutex::new(Some(sender)) }, Pending { receiver })
    }

    /// Completes the paired [`Pending`]. Only the first call has any effect.
    pub fn resume(&self, value: T) {
        let sender = self.sender.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(sender) = sender {
            // The receiver may be gone if the bridged future was dropped; nothing to do then.
            let _ = sender.send(value);
        }
    }
}

impl<T> Future for Pending<T> {
    type Output = T;

    /// # Panics
    ///
    /// If the callback was dropped without being called.
    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        match self.receiver.poll_unpin(cx) {
            Poll::Ready(Ok(value)) => Poll::Ready(value),
            Poll::Ready(Err(oneshot::Canceled)) =>
                panic!("completion callback was dropped without being called"),
            Poll::Pending => Poll::Pending,
        }
    }
}
