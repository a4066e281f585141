//! [`Terminal`] — one coordinator per terminal instance.
//!
//! The coordinator owns the order book, the status-change table, the hidden
//! set, the active tab and every timer for its terminal. Its run loop is the
//! only consumer of push events, poll ticks, timer firings and operator
//! commands, so each of them is applied to a consistent state, one at a time.
//!
//! Actor actions always re-fetch the target order first, apply the transition
//! to that fresh copy, merge the result locally, and then save it.

mod handle;


use std::{collections::HashSet, sync::Arc};

use notice_core::{
  Error as CoreError,
  actor::Role,
  notify::NoticeNotifier,
  order::Order,
  status::OrderStatus,
  store::{ChangeEvent, ChangeFeed, ChangeKind, FeedMessage, OrderStore},
  transition::{Action, apply},
};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tokio::{
  sync::{mpsc, oneshot},
  time::{Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

pub use handle::TerminalHandle;

use crate::{
  Result, SyncClient, TerminalConfig,
  book::{Change, OrderBook},
  clock::{Clock, SystemClock},
  expiry::{RejectionExpiry, TimerAction},
  grouping::{TabSelector, group_by_server},
  notifier::StatusChangeNotifier,
  queue,
  timer::{Fired, Timers},
  view::{Alert, OrderCard, StatusNotification, Summary, Tab, TerminalView},
};

// ─── Kinds, commands, events ─────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TerminalKind {
  Diner,
  Server,
  Kitchen,
}

impl TerminalKind {
  /// The actor role this terminal acts as.
  pub fn role(self) -> Role {
    match self {
      Self::Diner => Role::Diner,
      Self::Server => Role::Server,
      Self::Kitchen => Role::Kitchen,
    }
  }
}

/// Operator input, delivered through a [`TerminalHandle`].
#[derive(Debug)]
pub enum Command {
  Refresh,
  Act {
    id:     Uuid,
    action: Action,
    reply:  oneshot::Sender<Result<Order>>,
  },
  /// The server's "approve" button: approve, then dispatch straight away.
  ApproveAndDispatch {
    id:    Uuid,
    reply: oneshot::Sender<Result<Order>>,
  },
  /// Diner only: save a prepared notice, then follow it.
  Submit {
    order: Box<Order>,
    reply: oneshot::Sender<Result<Order>>,
  },
  /// Diner only: follow a notice this device just submitted.
  Track(Box<Order>),
  /// Diner only: hide a notice from this device's list.
  Dismiss(Uuid),
  SelectTab(String),
  ShowCompleted(bool),
  View(oneshot::Sender<TerminalView>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TerminalEvent {
  Render(TerminalView),
  Notify(StatusNotification),
  Alert(Alert),
}

// ─── Terminal ────────────────────────────────────────────────────────────────

pub struct Terminal<S, N> {
  kind:           TerminalKind,
  sync:           SyncClient<S, N>,
  config:         TerminalConfig,
  clock:          Arc<dyn Clock>,
  diner_id:       Option<String>,
  book:           OrderBook,
  notifier:       StatusChangeNotifier,
  expiry:         RejectionExpiry,
  tabs:           TabSelector,
  show_completed: bool,
  tracked:        HashSet<Uuid>,
  dismissed:      HashSet<Uuid>,
  timers:         Timers<Uuid>,
  fired:          Option<mpsc::UnboundedReceiver<Fired<Uuid>>>,
  events:         mpsc::UnboundedSender<TerminalEvent>,
}

impl<S, N> Terminal<S, N>
where
  S: OrderStore + 'static,
  N: NoticeNotifier + 'static,
{
  /// A terminal and the stream of render/notification/alert events it emits.
  pub fn new(
    kind: TerminalKind,
    sync: SyncClient<S, N>,
    config: TerminalConfig,
  ) -> (Self, mpsc::UnboundedReceiver<TerminalEvent>) {
    let (events, rx) = mpsc::unbounded_channel();
    let (timers, fired) = Timers::new();
    let terminal = Self {
      kind,
      sync,
      expiry: RejectionExpiry::new(config.rejection_delay()),
      config,
      clock: Arc::new(SystemClock),
      diner_id: None,
      book: OrderBook::new(),
      notifier: StatusChangeNotifier::new(),
      tabs: TabSelector::new(),
      show_completed: false,
      tracked: HashSet::new(),
      dismissed: HashSet::new(),
      timers,
      fired: Some(fired),
      events,
    };
    (terminal, rx)
  }

  pub fn with_clock(mut self, clock: impl Clock) -> Self {
    self.clock = Arc::new(clock);
    self
  }

  /// Diner only: also follow every notice raised by this diner profile.
  pub fn with_diner(mut self, diner_id: impl Into<String>) -> Self {
    self.diner_id = Some(diner_id.into());
    self
  }

  /// Run on a new task until `shutdown` is cancelled or every handle is
  /// dropped.
  pub fn spawn(self, shutdown: CancellationToken) -> TerminalHandle {
    let (commands, rx) = mpsc::channel(self.config.command_capacity.max(1));
    let task = tokio::spawn(self.run(rx, shutdown.clone()));
    TerminalHandle::new(commands, shutdown, task)
  }

  /// The event loop. Subscription failure degrades to polling alone.
  pub async fn run(mut self, mut commands: mpsc::Receiver<Command>, shutdown: CancellationToken) {
    let Some(mut fired) = self.fired.take() else {
      return;
    };
    tracing::info!(terminal = %self.kind, "terminal starting");

    self.refresh().await;
    let mut feed = match self.sync.subscribe().await {
      Ok(feed) => Some(feed),
      Err(e) => {
        tracing::warn!(terminal = %self.kind, error = %e, "push subscription failed; polling only");
        None
      }
    };

    let period = self.config.poll_interval();
    let mut poll = tokio::time::interval_at(Instant::now() + period, period);
    poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
      tokio::select! {
        biased;

        _ = shutdown.cancelled() => break,

        Some(f) = fired.recv() => self.on_timer(f),

        message = next_message(&mut feed) => match message {
          Some(FeedMessage::Change(event)) => self.on_change(event),
          Some(FeedMessage::Resync) => {
            tracing::info!(terminal = %self.kind, "change feed lagged; resyncing");
            self.refresh().await;
          }
          None => {
            tracing::warn!(terminal = %self.kind, "change feed closed; polling only");
            feed = None;
          }
        },

        command = commands.recv() => match command {
          Some(command) => self.handle(command).await,
          None => break,
        },

        _ = poll.tick(), if self.should_poll() => self.refresh().await,
      }
    }

    self.timers.cancel_all();
    if let Some(feed) = feed {
      feed.unsubscribe();
    }
    tracing::info!(terminal = %self.kind, "terminal stopped");
  }

  // ── Inputs ────────────────────────────────────────────────────────────

  async fn handle(&mut self, command: Command) {
    match command {
      Command::Refresh => self.refresh().await,
      Command::Act { id, action, reply } => {
        let result = self.act(id, action).await;
        let _ = reply.send(result);
      }
      Command::ApproveAndDispatch { id, reply } => {
        let result = match self.act(id, Action::Approve).await {
          Ok(_) => self.act(id, Action::Dispatch).await,
          Err(e) => Err(e),
        };
        let _ = reply.send(result);
      }
      Command::Submit { order, reply } => {
        let result = self.submit(*order).await;
        let _ = reply.send(result);
      }
      Command::Track(order) => {
        self.tracked.insert(order.id);
        self.merge(*order);
        self.render();
      }
      Command::Dismiss(id) => {
        self.dismissed.insert(id);
        self.render();
      }
      Command::SelectTab(key) => {
        self.tabs.select(key);
        self.render();
      }
      Command::ShowCompleted(on) => {
        self.show_completed = on;
        self.render();
      }
      Command::View(reply) => {
        let _ = reply.send(self.view());
      }
    }
  }

  /// Full fetch and reconcile.
  async fn refresh(&mut self) {
    let requested_at = self.clock.now();
    match self.sync.fetch().await {
      Ok(orders) => {
        let admitted: Vec<Order> = orders.into_iter().filter(|o| self.admits(o)).collect();
        let changes = self.book.apply_snapshot(admitted, requested_at);
        self.settle(changes);
      }
      Err(e) => {
        tracing::warn!(terminal = %self.kind, error = %e, "refresh failed");
        self.alert(format!("Could not refresh notices: {e}"), false);
      }
    }
    self.render();
  }

  fn on_change(&mut self, event: ChangeEvent) {
    let ChangeEvent { kind, order } = event;
    if !self.sync.scope().allows(order.restaurant_id) || !self.admits(&order) {
      return;
    }
    let change = match kind {
      ChangeKind::Insert | ChangeKind::Update => self.book.upsert(order),
      ChangeKind::Delete => self.book.remove(order.id, order.updated_at),
    };
    if let Some(change) = change {
      tracing::debug!(terminal = %self.kind, ?kind, ?change, "applied change event");
      self.settle([change]);
      self.render();
    }
  }

  fn on_timer(&mut self, fired: Fired<Uuid>) {
    if self.timers.take_fired(&fired) && self.expiry.expire(fired.key) {
      tracing::debug!(order_id = %fired.key, "rejected notice expired from queue");
      self.render();
    }
  }

  // ── Actions ───────────────────────────────────────────────────────────

  async fn act(&mut self, id: Uuid, action: Action) -> Result<Order> {
    let kind = action.kind();
    let result = self.perform(id, action).await;
    match &result {
      Ok(order) => {
        tracing::info!(terminal = %self.kind, order_id = %id, status = %order.status(), "{kind} applied");
      }
      Err(e) if e.is_precondition() => {
        tracing::info!(terminal = %self.kind, order_id = %id, error = %e, "{kind} refused");
        self.alert(e.to_string(), true);
      }
      Err(e) => {
        tracing::error!(terminal = %self.kind, order_id = %id, error = %e, "{kind} failed");
        self.alert(format!("Could not {kind} the notice: {e}"), false);
      }
    }
    result
  }

  async fn submit(&mut self, order: Order) -> Result<Order> {
    match self.sync.save(order, Some(OrderStatus::Draft)).await {
      Ok(saved) => {
        tracing::info!(terminal = %self.kind, order_id = %saved.id, "notice submitted");
        self.tracked.insert(saved.id);
        self.merge(saved.clone());
        self.render();
        Ok(saved)
      }
      Err(e) => {
        tracing::error!(terminal = %self.kind, error = %e, "submit failed");
        self.alert(format!("Could not submit the notice: {e}"), false);
        Err(e)
      }
    }
  }

  async fn perform(&mut self, id: Uuid, action: Action) -> Result<Order> {
    let fresh = self
      .sync
      .fetch_one(id)
      .await?
      .ok_or(CoreError::OrderNotFound(id))?;
    self.merge(fresh);
    let current = self
      .book
      .get(id)
      .cloned()
      .ok_or(CoreError::OrderNotFound(id))?;

    // Strictly newer than what it replaces, so the local merge accepts it.
    let at = self
      .clock
      .now()
      .max(current.updated_at + chrono::Duration::milliseconds(1));
    let next = apply(&current, self.kind.role(), &action, at)?;
    let before = current.status();

    // Announced only once the save lands.
    if let Some(change) = self.book.upsert(next.clone()) {
      self.reconcile([change], false);
    }
    self.render();

    match self.sync.save(next, Some(before)).await {
      Ok(saved) => {
        self.merge(saved.clone());
        if saved.status() != before && queue::is_relevant(self.kind, saved.status()) {
          let note = StatusNotification::new(self.kind, &saved, before);
          let _ = self.events.send(TerminalEvent::Notify(note));
        }
        Ok(saved)
      }
      Err(e) => {
        self.notifier.restore(id, before);
        let change = self.book.revert(current);
        self.settle([change]);
        self.refresh().await;
        Err(e)
      }
    }
  }

  // ── State ─────────────────────────────────────────────────────────────

  fn admits(&self, order: &Order) -> bool {
    match self.kind {
      TerminalKind::Diner => {
        self.tracked.contains(&order.id)
          || (self.diner_id.is_some() && order.diner_id == self.diner_id)
      }
      TerminalKind::Server | TerminalKind::Kitchen => true,
    }
  }

  fn merge(&mut self, order: Order) {
    if let Some(change) = self.book.upsert(order) {
      self.settle([change]);
    }
  }

  /// React to accepted merges: notifications, expiry timers, forgetting.
  fn settle(&mut self, changes: impl IntoIterator<Item = Change>) { self.reconcile(changes, true) }

  fn reconcile(&mut self, changes: impl IntoIterator<Item = Change>, announce: bool) {
    let now = self.clock.now();
    for change in changes {
      match change {
        Change::Upserted(id) => {
          let Some(order) = self.book.get(id) else {
            continue;
          };
          if let Some(t) = self.notifier.observe(order)
            && announce
            && queue::is_relevant(self.kind, t.to)
          {
            let note = StatusNotification::new(self.kind, order, t.from);
            let _ = self.events.send(TerminalEvent::Notify(note));
          }
          if self.kind == TerminalKind::Server {
            match self.expiry.observe(order, now) {
              TimerAction::Keep => {}
              TimerAction::Schedule(delay) => self.timers.schedule(id, delay),
              TimerAction::Cancel => {
                self.timers.cancel(&id);
              }
            }
          }
        }
        Change::Removed(id) => {
          self.notifier.forget(id);
          self.expiry.forget(id);
          self.timers.cancel(&id);
        }
      }
    }
  }

  fn should_poll(&self) -> bool {
    match self.kind {
      TerminalKind::Diner => self.book.iter().any(|o| {
        let status = o.status();
        status.is_submitted() && !status.is_terminal()
      }),
      TerminalKind::Server | TerminalKind::Kitchen => true,
    }
  }

  fn is_visible(&self, order: &Order) -> bool {
    let status = order.status();
    if !queue::is_relevant(self.kind, status) || self.dismissed.contains(&order.id) {
      return false;
    }
    self.show_completed
      || (!queue::is_completed(self.kind, status) && !self.expiry.is_hidden(order.id))
  }

  // ── Output ────────────────────────────────────────────────────────────

  fn view(&mut self) -> TerminalView {
    let kind = self.kind;
    let visible: Vec<&Order> = self.book.iter().filter(|o| self.is_visible(o)).collect();

    let count = |status: OrderStatus| visible.iter().filter(|o| o.status() == status).count();
    let summary = Summary {
      awaiting_approval: count(OrderStatus::SubmittedToServer),
      ready_to_dispatch: count(OrderStatus::QueuedForKitchen),
      with_kitchen:      count(OrderStatus::WithKitchen),
    };

    let (tabs, orders) = if kind == TerminalKind::Server {
      let groups = group_by_server(visible.iter().copied());
      let active = self.tabs.resolve(&groups).map(str::to_string);
      let tabs = groups
        .iter()
        .map(|g| Tab {
          key:    g.key.clone(),
          label:  g.label.clone(),
          count:  g.order_ids.len(),
          active: active.as_deref() == Some(g.key.as_str()),
        })
        .collect();
      let shown: HashSet<Uuid> = groups
        .iter()
        .find(|g| active.as_deref() == Some(g.key.as_str()))
        .map(|g| g.order_ids.iter().copied().collect())
        .unwrap_or_default();
      let orders = visible
        .iter()
        .filter(|o| shown.contains(&o.id))
        .map(|o| OrderCard::new(kind, o))
        .collect();
      (tabs, orders)
    } else {
      (Vec::new(), visible.iter().map(|o| OrderCard::new(kind, o)).collect())
    };

    TerminalView {
      kind,
      show_completed: self.show_completed,
      tabs,
      orders,
      summary,
    }
  }

  fn render(&mut self) {
    let view = self.view();
    let _ = self.events.send(TerminalEvent::Render(view));
  }

  fn alert(&self, message: String, blocking: bool) {
    let _ = self.events.send(TerminalEvent::Alert(Alert { message, blocking }));
  }
}

async fn next_message(feed: &mut Option<ChangeFeed>) -> Option<FeedMessage> {
  match feed {
    Some(feed) => feed.recv().await,
    None => std::future::pending().await,
  }
}
