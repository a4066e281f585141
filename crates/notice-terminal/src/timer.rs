//! Cancellable one-shot timers keyed by order.
//!
//! Each timer is a detached tokio task racing a sleep against a
//! [`CancellationToken`]. Firings are delivered as messages so the owning
//! terminal applies them on its own loop. A firing carries the generation it
//! was scheduled under; one that arrives after its timer was cancelled or
//! replaced is discarded by [`Timers::take_fired`].

use std::{collections::HashMap, hash::Hash, time::Duration};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Delivered when a timer elapses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired<K> {
  pub key:    K,
  generation: u64,
}

struct Pending {
  token:      CancellationToken,
  generation: u64,
}

pub struct Timers<K> {
  root:       CancellationToken,
  pending:    HashMap<K, Pending>,
  generation: u64,
  tx:         mpsc::UnboundedSender<Fired<K>>,
}

impl<K> Timers<K>
where
  K: Eq + Hash + Clone + Send + 'static,
{
  /// A timer set and the receiver its firings arrive on.
  pub fn new() -> (Self, mpsc::UnboundedReceiver<Fired<K>>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let timers = Self {
      root: CancellationToken::new(),
      pending: HashMap::new(),
      generation: 0,
      tx,
    };
    (timers, rx)
  }

  /// Fire after `delay`, replacing any timer already pending for `key`.
  pub fn schedule(&mut self, key: K, delay: Duration) {
    self.cancel(&key);
    self.generation += 1;

    let token = self.root.child_token();
    let fired = Fired { key: key.clone(), generation: self.generation };
    let tx = self.tx.clone();
    let guard = token.clone();
    tokio::spawn(async move {
      tokio::select! {
        _ = guard.cancelled() => {}
        _ = tokio::time::sleep(delay) => {
          // The terminal may already be gone.
          let _ = tx.send(fired);
        }
      }
    });

    self.pending.insert(key, Pending { token, generation: self.generation });
  }

  /// Cancel the pending timer for `key`. Cancelling nothing is a no-op.
  pub fn cancel(&mut self, key: &K) -> bool {
    match self.pending.remove(key) {
      Some(pending) => {
        pending.token.cancel();
        true
      }
      None => false,
    }
  }

  /// Accept a firing. Returns `false` for a stale one.
  pub fn take_fired(&mut self, fired: &Fired<K>) -> bool {
    match self.pending.get(&fired.key) {
      Some(p) if p.generation == fired.generation => {
        self.pending.remove(&fired.key);
        true
      }
      _ => false,
    }
  }

  pub fn is_pending(&self, key: &K) -> bool { self.pending.contains_key(key) }

  pub fn len(&self) -> usize { self.pending.len() }

  pub fn is_empty(&self) -> bool { self.pending.is_empty() }

  /// Cancel everything. The set stays usable afterwards.
  pub fn cancel_all(&mut self) {
    self.root.cancel();
    self.root = CancellationToken::new();
    self.pending.clear();
  }
}

impl<K> Drop for Timers<K> {
  fn drop(&mut self) { self.root.cancel(); }
}

#[cfg(test)]
mod tests {
  use tokio::time::Instant;

  use super::*;

  #[tokio::test(start_paused = true)]
  async fn fires_at_exactly_the_delay() {
    let (mut timers, mut rx) = Timers::new();
    let start = Instant::now();
    timers.schedule("a", Duration::from_secs(5));

    let fired = rx.recv().await.unwrap();
    assert_eq!(Instant::now() - start, Duration::from_secs(5));
    assert!(timers.take_fired(&fired));
    assert!(timers.is_empty());
  }

  #[tokio::test(start_paused = true)]
  async fn cancelled_timer_never_fires() {
    let (mut timers, mut rx) = Timers::new();
    timers.schedule("a", Duration::from_secs(5));
    assert!(timers.cancel(&"a"));
    assert!(!timers.cancel(&"a"));

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(rx.try_recv().is_err());
  }

  #[tokio::test(start_paused = true)]
  async fn replaced_timer_firing_is_stale() {
    let (mut timers, mut rx) = Timers::new();
    timers.schedule("a", Duration::from_secs(1));
    tokio::time::sleep(Duration::from_millis(1_500)).await;
    // The first firing is queued but not yet taken when the timer is replaced.
    timers.schedule("a", Duration::from_secs(5));

    let stale = rx.recv().await.unwrap();
    assert!(!timers.take_fired(&stale));
    assert!(timers.is_pending(&"a"));

    let fresh = rx.recv().await.unwrap();
    assert!(timers.take_fired(&fresh));
  }

  #[tokio::test(start_paused = true)]
  async fn cancel_all_silences_every_timer() {
    let (mut timers, mut rx) = Timers::new();
    timers.schedule(1, Duration::from_secs(1));
    timers.schedule(2, Duration::from_secs(2));
    timers.cancel_all();

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert!(rx.try_recv().is_err());
    assert_eq!(timers.len(), 0);
  }
}
