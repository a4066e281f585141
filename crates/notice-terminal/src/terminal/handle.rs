//! [`TerminalHandle`] — the operator's side of a running terminal.

use chrono::{DateTime, Utc};
use notice_core::{
  actor::ChefIdentity,
  order::{Answer, Order},
  transition::Action,
};
use tokio::{
  sync::{mpsc, oneshot},
  task::JoinHandle,
};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::Command;
use crate::{Error, Result, composer::NoticeComposer, view::TerminalView};

pub struct TerminalHandle {
  commands: mpsc::Sender<Command>,
  shutdown: CancellationToken,
  task:     JoinHandle<()>,
}

impl TerminalHandle {
  pub(super) fn new(
    commands: mpsc::Sender<Command>,
    shutdown: CancellationToken,
    task: JoinHandle<()>,
  ) -> Self {
    Self { commands, shutdown, task }
  }

  async fn send(&self, command: Command) -> Result<()> {
    self.commands.send(command).await.map_err(|_| Error::Stopped)
  }

  async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
    let (tx, rx) = oneshot::channel();
    self.send(command(tx)).await?;
    rx.await.map_err(|_| Error::Stopped)
  }

  // ── Queue controls ────────────────────────────────────────────────────

  pub async fn refresh(&self) -> Result<()> { self.send(Command::Refresh).await }

  pub async fn show_completed(&self, on: bool) -> Result<()> {
    self.send(Command::ShowCompleted(on)).await
  }

  pub async fn select_tab(&self, key: impl Into<String>) -> Result<()> {
    self.send(Command::SelectTab(key.into())).await
  }

  /// The current render model.
  pub async fn view(&self) -> Result<TerminalView> { self.request(Command::View).await }

  // ── Actions ───────────────────────────────────────────────────────────

  pub async fn act(&self, id: Uuid, action: Action) -> Result<Order> {
    self
      .request(|reply| Command::Act { id, action, reply })
      .await?
  }

  /// Approve and immediately dispatch to the kitchen.
  pub async fn approve(&self, id: Uuid) -> Result<Order> {
    self
      .request(|reply| Command::ApproveAndDispatch { id, reply })
      .await?
  }

  pub async fn dispatch(&self, id: Uuid) -> Result<Order> { self.act(id, Action::Dispatch).await }

  pub async fn reject(&self, id: Uuid, reason: Option<String>) -> Result<Order> {
    self.act(id, Action::RejectByServer { reason }).await
  }

  pub async fn acknowledge(&self, id: Uuid, chef: ChefIdentity) -> Result<Order> {
    self.act(id, Action::Acknowledge { chef }).await
  }

  pub async fn ask(&self, id: Uuid, text: impl Into<String>) -> Result<Order> {
    self.act(id, Action::AskQuestion { text: text.into() }).await
  }

  pub async fn reject_by_kitchen(&self, id: Uuid, reason: Option<String>) -> Result<Order> {
    self.act(id, Action::RejectByKitchen { reason }).await
  }

  pub async fn answer(&self, id: Uuid, response: Answer) -> Result<Order> {
    self.act(id, Action::Answer { response }).await
  }

  pub async fn rescind(&self, id: Uuid) -> Result<Order> { self.act(id, Action::Rescind).await }

  // ── Diner ─────────────────────────────────────────────────────────────

  /// Submit the composer's notice through this terminal, which then polls
  /// it like any other tracked notice. The composer is cleared only once the
  /// save succeeds.
  pub async fn submit(&self, composer: &mut NoticeComposer, at: DateTime<Utc>) -> Result<Order> {
    let order = composer.prepare(at)?;
    let saved = self
      .request(|reply| Command::Submit { order: Box::new(order), reply })
      .await??;
    composer.submitted(&saved);
    Ok(saved)
  }

  pub async fn track(&self, order: Order) -> Result<()> {
    self.send(Command::Track(Box::new(order))).await
  }

  pub async fn dismiss(&self, id: Uuid) -> Result<()> { self.send(Command::Dismiss(id)).await }

  // ── Lifecycle ─────────────────────────────────────────────────────────

  /// Stop the terminal and wait for its task. Pending timers are cancelled
  /// and the push subscription is dropped.
  pub async fn shutdown(self) {
    self.shutdown.cancel();
    if let Err(e) = self.task.await {
      tracing::error!(error = %e, "terminal task failed");
    }
  }
}
