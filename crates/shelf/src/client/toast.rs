//! Transient notifications offering to undo a status change.

use tokio::{sync::watch, task::AbortHandle};

use super::*;

/// How long a toast stays up unless dismissed earlier.
pub const TOAST_DURATION: Duration = Duration::from_millis(5000);

/// A status change that can still be undone.
///
/// Once created a toast is never modified; undoing it replays the inverse of the
/// change it records.
#[derive(Debug, Clone, PartialEq)]
pub struct ToastData {
  /// Unique per notification
  pub id:              u64,
  /// Title shown in the notification
  pub book_title:      String,
  /// Status the book was changed to
  pub new_status:      ReadingStatus,
  /// Work the change applies to
  pub work_key:        String,
  /// Status before the change, `None` if the book had none
  pub previous_status: Option<ReadingStatus>,
  /// Metadata to send along when restoring the previous status
  pub metadata:        BookMetadata,
}

impl ToastData {
  /// The notification text.
  pub fn message(&self) -> String {
    format!("\"{}\" moved to {}", self.book_title, self.new_status.label())
  }
}

/// Shows at most one toast at a time and takes it down after a fixed duration.
pub struct Toaster {
  current:  Arc<watch::Sender<Option<ToastData>>>,
  next_id:  u64,
  timer:    Option<AbortHandle>,
  duration: Duration,
}

impl Default for Toaster {
  fn default() -> Self { Self::new() }
}

impl Toaster {
  /// A toaster dismissing toasts after [`TOAST_DURATION`].
  pub fn new() -> Self { Self::with_duration(TOAST_DURATION) }

  /// A toaster dismissing toasts after `duration`.
  pub fn with_duration(duration: Duration) -> Self {
    let (current, _) = watch::channel(None);
    Self { current: Arc::new(current), next_id: 1, timer: None, duration }
  }

  /// Reserves the id for the next toast.
  pub fn next_id(&mut self) -> u64 {
    let id = self.next_id;
    self.next_id += 1;
    id
  }

  /// Shows `toast`, replacing whatever is up, and starts its dismissal timer.
  ///
  /// Must be called from within a tokio runtime.
  pub fn show(&mut self, toast: ToastData) {
    self.stop_timer();
    let id = toast.id;
    self.current.send_replace(Some(toast));

    let current = Arc::clone(&self.current);
    let duration = self.duration;
    let timer = tokio::spawn(async move {
      tokio::time::sleep(duration).await;
      current.send_if_modified(|toast| take_if(toast, id));
    });
    self.timer = Some(timer.abort_handle());
  }

  /// Takes down the toast `id`, returning whether it was still showing.
  pub fn dismiss(&mut self, id: u64) -> bool {
    let dismissed = self.current.send_if_modified(|toast| take_if(toast, id));
    if dismissed {
      self.stop_timer();
    }
    dismissed
  }

  /// The toast currently showing.
  pub fn current(&self) -> Option<ToastData> { self.current.borrow().clone() }

  /// A receiver notified whenever a toast appears or goes away.
  pub fn subscribe(&self) -> watch::Receiver<Option<ToastData>> { self.current.subscribe() }

  fn stop_timer(&mut self) {
    if let Some(timer) = self.timer.take() {
      timer.abort();
    }
  }
}

impl Drop for Toaster {
  fn drop(&mut self) { self.stop_timer(); }
}

/// Clears `slot` if it holds toast `id`.
fn take_if(slot: &mut Option<ToastData>, id: u64) -> bool {
  if slot.as_ref().is_some_and(|toast| toast.id == id) {
    *slot = None;
    return true;
  }
  false
}
