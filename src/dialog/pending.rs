//! Deferred dialog results
//!
//! Builders such as `confirm` hand out a [`Pending`] that is fulfilled once
//! the dialog actually closes. Buttons stage an outcome before closing;
//! the dialog's `on_closed` hook delivers it. A close that gets vetoed
//! therefore never settles anything.

use super::types::{DialogId, DialogRejected};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

type Outcome<T> = Result<T, DialogRejected>;

/// Receiving half handed to the caller
#[derive(Debug)]
pub struct Pending<T> {
    id: DialogId,
    receiver: oneshot::Receiver<Outcome<T>>,
}

impl<T> Pending<T> {
    pub fn id(&self) -> &DialogId {
        &self.id
    }

    /// Wait for the dialog to settle.
    ///
    /// Resolves to `Dismissed` if the dialog is destroyed without a
    /// decision, e.g. by `close_all`.
    pub async fn wait(self) -> Outcome<T> {
        self.receiver.await.unwrap_or(Err(DialogRejected::Dismissed))
    }

    /// Take the outcome if the dialog has already settled.
    pub fn try_take(&mut self) -> Option<Outcome<T>> {
        match self.receiver.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(Err(DialogRejected::Dismissed)),
        }
    }
}

struct SettlementState<T> {
    sender: Option<oneshot::Sender<Outcome<T>>>,
    staged: Option<Outcome<T>>,
}

/// Sending half shared by a dialog's buttons and hooks
pub(crate) struct Settlement<T> {
    inner: Arc<Mutex<SettlementState<T>>>,
}

impl<T> Clone for Settlement<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Send + 'static> Settlement<T> {
    pub(crate) fn channel(id: DialogId) -> (Self, Pending<T>) {
        let (sender, receiver) = oneshot::channel();
        let settlement = Self {
            inner: Arc::new(Mutex::new(SettlementState {
                sender: Some(sender),
                staged: None,
            })),
        };
        (settlement, Pending { id, receiver })
    }

    /// Remember the outcome to deliver when the dialog closes.
    pub(crate) fn stage(&self, outcome: Outcome<T>) {
        if let Ok(mut state) = self.inner.lock() {
            state.staged = Some(outcome);
        }
    }

    /// Forget a staged outcome after the close was vetoed.
    pub(crate) fn unstage(&self) {
        if let Ok(mut state) = self.inner.lock() {
            state.staged = None;
        }
    }

    /// Deliver the staged outcome, or `Cancelled` when nothing was staged.
    ///
    /// Only the first call has any effect.
    pub(crate) fn finish(&self) {
        if let Ok(mut state) = self.inner.lock() {
            let outcome = state.staged.take().unwrap_or(Err(DialogRejected::Cancelled));
            if let Some(sender) = state.sender.take() {
                // The caller may have dropped its Pending
                let _ = sender.send(outcome);
            }
        }
    }

    pub(crate) fn is_settled(&self) -> bool {
        self.inner
            .lock()
            .map(|state| state.sender.is_none())
            .unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_delivers_staged_outcome() {
        let (settlement, mut pending) = Settlement::<u8>::channel(DialogId::from("p"));
        assert!(pending.try_take().is_none());

        settlement.stage(Ok(3));
        assert!(pending.try_take().is_none());

        settlement.finish();
        assert!(settlement.is_settled());
        assert_eq!(pending.try_take(), Some(Ok(3)));
    }

    #[test]
    fn test_finish_without_stage_cancels() {
        let (settlement, mut pending) = Settlement::<()>::channel(DialogId::from("p"));
        settlement.stage(Ok(()));
        settlement.unstage();
        settlement.finish();
        assert_eq!(pending.try_take(), Some(Err(DialogRejected::Cancelled)));
    }

    #[test]
    fn test_only_first_finish_counts() {
        let (settlement, mut pending) = Settlement::<u8>::channel(DialogId::from("p"));
        settlement.stage(Ok(1));
        settlement.finish();
        settlement.stage(Ok(2));
        settlement.finish();
        assert_eq!(pending.try_take(), Some(Ok(1)));
    }

    #[tokio::test]
    async fn test_dropped_settlement_dismisses() {
        let (settlement, pending) = Settlement::<()>::channel(DialogId::from("p"));
        assert_eq!(pending.id().as_str(), "p");
        drop(settlement);
        assert_eq!(pending.wait().await, Err(DialogRejected::Dismissed));
    }
}
