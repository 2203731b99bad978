//! Debouncing of rapidly changing input.

use tokio::{
  sync::mpsc,
  task::JoinHandle,
  time::{self, Instant},
};

use super::*;

/// Delays values until the input has been quiet for a fixed period.
///
/// Each [`push`](Debouncer::push) restarts the quiet period; only the most recent
/// value is emitted once it has stood for `delay`, and the values it replaced are
/// dropped. Every pushed value counts as a change, even one equal to the last.
///
/// Dropping the debouncer cancels a pending emission and closes the output.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
///
/// use shelf::client::Debouncer;
///
/// # async fn example() {
/// let (debouncer, mut output) = Debouncer::new(Duration::from_millis(500));
/// debouncer.push("d".to_string());
/// debouncer.push("du".to_string());
/// debouncer.push("dune".to_string());
///
/// // Half a second after the last push
/// assert_eq!(output.recv().await.as_deref(), Some("dune"));
/// # }
/// ```
pub struct Debouncer<T> {
  /// Sends raw values to the timer task
  input: mpsc::UnboundedSender<T>,
  /// Timer task owning the pending value
  task:  JoinHandle<()>,
}

impl<T: Send + 'static> Debouncer<T> {
  /// Starts a debouncer and returns it with the receiver of settled values.
  ///
  /// Must be called from within a tokio runtime.
  pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
    let (input, mut raw) = mpsc::unbounded_channel::<T>();
    let (settled, output) = mpsc::unbounded_channel::<T>();

    let task = tokio::spawn(async move {
      let timer = time::sleep(delay);
      tokio::pin!(timer);
      let mut pending: Option<T> = None;

      loop {
        tokio::select! {
          value = raw.recv() => match value {
            Some(value) => {
              pending = Some(value);
              timer.as_mut().reset(Instant::now() + delay);
            },
            None => break,
          },
          () = &mut timer, if pending.is_some() => {
            if let Some(value) = pending.take() {
              if settled.send(value).is_err() {
                break;
              }
            }
          },
        }
      }
    });

    (Self { input, task }, output)
  }

  /// Feeds a new value, cancelling any emission still waiting.
  pub fn push(&self, value: T) {
    if self.input.send(value).is_err() {
      warn!("Debouncer task is gone, dropping value");
    }
  }
}

impl<T> Drop for Debouncer<T> {
  fn drop(&mut self) { self.task.abort(); }
}
