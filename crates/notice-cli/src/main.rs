//! `notice` — command-line terminal for the dining notice server.
//!
//! # Usage
//!
//! ```
//! notice --url http://localhost:8080 --restaurant <id> watch --terminal kitchen
//! notice --config ~/.config/notice/config.toml approve <order-id>
//! notice submit --dish "Pad Thai" --code A12307 --allergy peanut --watch
//! ```

mod client;
mod render;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use client::{ApiClient, ApiConfig};
use notice_core::{
  actor::ChefIdentity,
  order::{Answer, DiningMode, Order},
  store::{OrderStore, Scope},
};
use notice_terminal::{
  SyncClient, Terminal, TerminalConfig, TerminalEvent, TerminalHandle, TerminalKind,
  composer::{DinerProfile, NoticeComposer},
};
use serde::Deserialize;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_util::sync::CancellationToken;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

// ─── CLI args ────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "notice", about = "Terminal client for dining notices")]
struct Args {
  /// Path to a TOML config file.
  #[arg(short, long, value_name = "FILE", global = true)]
  config: Option<PathBuf>,

  /// Base URL of the notice server (default: http://localhost:8080).
  #[arg(long, env = "NOTICE_URL", global = true)]
  url: Option<String>,

  /// Restaurants this terminal serves (comma-separated).
  #[arg(
    long = "restaurant",
    env = "NOTICE_RESTAURANT_IDS",
    value_delimiter = ',',
    global = true
  )]
  restaurant_ids: Vec<Uuid>,

  /// Staff access across every restaurant when no restaurant is given.
  #[arg(long, env = "NOTICE_PRIVILEGED", global = true)]
  privileged: bool,

  /// Full-refresh period in milliseconds.
  #[arg(long, env = "NOTICE_POLL_INTERVAL_MS", global = true)]
  poll_interval_ms: Option<u64>,

  #[command(subcommand)]
  command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
  /// Follow a terminal's queue and print every change until interrupted.
  Watch {
    #[arg(long, default_value = "server")]
    terminal:       TerminalKind,
    /// Follow this diner profile's notices (diner terminal).
    #[arg(long, env = "NOTICE_DINER_ID")]
    diner_id:       Option<String>,
    #[arg(long)]
    show_completed: bool,
  },
  /// Print a terminal's queue once.
  List {
    #[arg(long, default_value = "server")]
    terminal:       TerminalKind,
    #[arg(long, env = "NOTICE_DINER_ID")]
    diner_id:       Option<String>,
    #[arg(long)]
    show_completed: bool,
    /// Server tab to show, by server id.
    #[arg(long)]
    tab:            Option<String>,
  },
  /// Approve a submitted notice and dispatch it to the kitchen.
  Approve { id: Uuid },
  /// Dispatch a queued notice to the kitchen.
  Dispatch { id: Uuid },
  /// Reject a submitted notice (server).
  Reject {
    id:     Uuid,
    #[arg(long)]
    reason: Option<String>,
  },
  /// Acknowledge a notice in the kitchen.
  Ack {
    id:        Uuid,
    #[arg(long, env = "NOTICE_CHEF_ID")]
    chef_id:   Option<String>,
    #[arg(long, env = "NOTICE_CHEF_NAME")]
    chef_name: Option<String>,
  },
  /// Send the diner a yes/no question.
  Ask { id: Uuid, text: String },
  /// Reject a notice from the kitchen.
  RejectKitchen {
    id:     Uuid,
    #[arg(long)]
    reason: Option<String>,
  },
  /// Answer the kitchen's question (diner).
  Answer { id: Uuid, reply: Reply },
  /// Withdraw a notice (diner).
  Rescind { id: Uuid },
  /// Compose and submit a new notice (diner).
  Submit {
    /// Defaults to the only configured restaurant.
    #[arg(long = "for")]
    restaurant: Option<Uuid>,
    #[arg(long = "dish", required = true)]
    dishes:     Vec<String>,
    /// Code shared by your server; required when dining in.
    #[arg(long)]
    code:       Option<String>,
    #[arg(long)]
    name:       Option<String>,
    #[arg(long = "allergy")]
    allergies:  Vec<String>,
    #[arg(long = "diet")]
    diets:      Vec<String>,
    #[arg(long)]
    notes:      Option<String>,
    #[arg(long)]
    delivery:   bool,
    #[arg(long, env = "NOTICE_DINER_ID")]
    diner_id:   Option<String>,
    /// Keep following the notice until interrupted.
    #[arg(long)]
    watch:      bool,
  },
  /// Remove a notice from the table (operator).
  Delete { id: Uuid },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Reply {
  Yes,
  No,
}

impl From<Reply> for Answer {
  fn from(reply: Reply) -> Self {
    match reply {
      Reply::Yes => Answer::Yes,
      Reply::No => Answer::No,
    }
  }
}

// ─── Config file ─────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
  url:            String,
  restaurant_ids: Vec<Uuid>,
  privileged:     bool,
  terminal:       TerminalConfig,
}

// ─── Session ─────────────────────────────────────────────────────────────────

struct Session {
  client:   Arc<ApiClient>,
  scope:    Scope,
  terminal: TerminalConfig,
}

impl Session {
  fn sync(&self) -> SyncClient<ApiClient, ApiClient> {
    SyncClient::new(Arc::clone(&self.client), Arc::clone(&self.client), self.scope.clone())
  }

  fn start(
    &self,
    kind: TerminalKind,
    diner_id: Option<String>,
  ) -> (TerminalHandle, UnboundedReceiver<TerminalEvent>) {
    let (terminal, events) = Terminal::new(kind, self.sync(), self.terminal.clone());
    let terminal = match diner_id {
      Some(id) => terminal.with_diner(id),
      None => terminal,
    };
    (terminal.spawn(CancellationToken::new()), events)
  }

  /// Run one action on a short-lived terminal of `kind`.
  async fn perform(
    &self,
    kind: TerminalKind,
    action: impl AsyncFnOnce(&TerminalHandle) -> notice_terminal::Result<Order>,
  ) -> Result<()> {
    let (handle, _events) = self.start(kind, None);
    let result = action(&handle).await;
    handle.shutdown().await;
    let order = result?;
    println!("{}  {}", order.id, order.status().server_descriptor().label);
    Ok(())
  }
}

// ─── Entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let base_url = args
    .url
    .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
    .unwrap_or_else(|| "http://localhost:8080".to_string());
  let restaurant_ids = if args.restaurant_ids.is_empty() {
    file_cfg.restaurant_ids
  } else {
    args.restaurant_ids
  };
  let mut terminal = file_cfg.terminal;
  if let Some(ms) = args.poll_interval_ms {
    terminal.poll_interval_ms = ms;
  }

  let ctx = Session {
    client: Arc::new(ApiClient::new(ApiConfig { base_url }).context("failed to build HTTP client")?),
    scope: Scope::new(restaurant_ids.iter().copied(), args.privileged || file_cfg.privileged),
    terminal,
  };

  match args.command {
    Cmd::Watch { terminal, diner_id, show_completed } => watch(&ctx, terminal, diner_id, show_completed).await,
    Cmd::List { terminal, diner_id, show_completed, tab } => {
      let (handle, _events) = ctx.start(terminal, diner_id);
      handle.show_completed(show_completed).await?;
      if let Some(tab) = tab {
        handle.select_tab(tab).await?;
      }
      let view = handle.view().await;
      handle.shutdown().await;
      for line in render::view_lines(&view?) {
        println!("{line}");
      }
      Ok(())
    }
    Cmd::Approve { id } => ctx.perform(TerminalKind::Server, async |h| h.approve(id).await).await,
    Cmd::Dispatch { id } => ctx.perform(TerminalKind::Server, async |h| h.dispatch(id).await).await,
    Cmd::Reject { id, reason } => {
      ctx.perform(TerminalKind::Server, async |h| h.reject(id, reason).await).await
    }
    Cmd::Ack { id, chef_id, chef_name } => {
      let fallback = ChefIdentity::default();
      let chef = ChefIdentity::new(
        chef_id.unwrap_or(fallback.chef_id),
        chef_name.unwrap_or(fallback.chef_name),
      );
      ctx.perform(TerminalKind::Kitchen, async |h| h.acknowledge(id, chef).await).await
    }
    Cmd::Ask { id, text } => ctx.perform(TerminalKind::Kitchen, async |h| h.ask(id, text).await).await,
    Cmd::RejectKitchen { id, reason } => {
      ctx
        .perform(TerminalKind::Kitchen, async |h| h.reject_by_kitchen(id, reason).await)
        .await
    }
    Cmd::Answer { id, reply } => {
      ctx.perform(TerminalKind::Diner, async |h| h.answer(id, reply.into()).await).await
    }
    Cmd::Rescind { id } => ctx.perform(TerminalKind::Diner, async |h| h.rescind(id).await).await,
    Cmd::Submit {
      restaurant,
      dishes,
      code,
      name,
      allergies,
      diets,
      notes,
      delivery,
      diner_id,
      watch,
    } => {
      let restaurant_id = match (restaurant, restaurant_ids.as_slice()) {
        (Some(id), _) => id,
        (None, [only]) => *only,
        (None, _) => return Err(anyhow!("pass --for <restaurant id>")),
      };
      let mut composer = NoticeComposer::new(restaurant_id, DinerProfile {
        diner_id: diner_id.clone(),
        name: None,
        allergies,
        diets,
      });
      for dish in dishes {
        composer.add_dish(dish);
      }
      composer.name = name.unwrap_or_default();
      composer.server_code = code.unwrap_or_default();
      composer.notes = notes.unwrap_or_default();
      if delivery {
        composer.dining_mode = DiningMode::Delivery;
      }
      // Submitting needs the target restaurant in scope.
      let ctx = Session { scope: Scope::single(restaurant_id), ..ctx };
      let (handle, events) = ctx.start(TerminalKind::Diner, diner_id);
      let order = match handle.submit(&mut composer, Utc::now()).await {
        Ok(order) => order,
        Err(e) => {
          handle.shutdown().await;
          return Err(e.into());
        }
      };
      println!("{}  {}", order.id, order.status().server_descriptor().label);
      if watch {
        follow(handle, events).await
      } else {
        handle.shutdown().await;
        Ok(())
      }
    }
    Cmd::Delete { id } => {
      if ctx.client.delete(id).await? {
        println!("deleted {id}");
        Ok(())
      } else {
        Err(anyhow!("order {id} not found"))
      }
    }
  }
}

// ─── Watch ───────────────────────────────────────────────────────────────────

async fn watch(
  ctx: &Session,
  kind: TerminalKind,
  diner_id: Option<String>,
  show_completed: bool,
) -> Result<()> {
  let (handle, events) = ctx.start(kind, diner_id);
  handle.show_completed(show_completed).await?;
  tracing::info!(terminal = %kind, "watching; press Ctrl-C to stop");
  follow(handle, events).await
}

/// Print renders and notifications until Ctrl-C or the terminal stops.
async fn follow(handle: TerminalHandle, mut events: UnboundedReceiver<TerminalEvent>) -> Result<()> {
  let mut last_render = None;
  loop {
    tokio::select! {
      signal = tokio::signal::ctrl_c() => {
        signal.context("listening for Ctrl-C")?;
        break;
      }
      event = events.recv() => {
        let Some(event) = event else { break };
        match &event {
          TerminalEvent::Render(view) => {
            // Only print when the queue looks different.
            let lines = render::view_lines(view);
            if last_render.as_ref() != Some(&lines) {
              println!("──");
              for line in &lines {
                println!("{line}");
              }
              last_render = Some(lines);
            }
          }
          other => {
            if let Some(line) = render::event_line(other) {
              println!("{line}");
            }
          }
        }
      }
    }
  }

  handle.shutdown().await;
  Ok(())
}
