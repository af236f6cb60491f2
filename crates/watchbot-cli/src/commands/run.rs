use crate::output::Output;
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use watchbot_config::{Config, PathManager};
use watchbot_core::{Dispatcher, InMemorySessionStore, SessionStore};
use watchbot_sources::{Catalog, ChatTransport, TelegramClient, TmdbClient};
use watchbot_store::Database;

/// Delay between failed polls, doubling per consecutive failure up to `max`.
#[derive(Debug, Clone, Copy)]
pub struct Backoff {
    pub base: Duration,
    pub max: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            base: Duration::from_secs(1),
            max: Duration::from_secs(30),
        }
    }
}

impl Backoff {
    pub fn delay(&self, consecutive_failures: u32) -> Duration {
        let exponent = consecutive_failures.saturating_sub(1).min(16);
        self.base.saturating_mul(1 << exponent).min(self.max)
    }
}

pub async fn run_bot(config_path: &Path, output: &Output) -> Result<()> {
    let config = Config::load(config_path).map_err(|e| eyre!("{:#}", e))?;

    let paths = PathManager::default();
    let db_path = config.database_path(&paths);
    let store = Database::open(&db_path)
        .map_err(|e| eyre!("Failed to open the watch store: {:#}", e))?;

    let catalog =
        TmdbClient::from_config(&config.tmdb).wrap_err("Failed to create the TMDB client")?;
    let mut transport = TelegramClient::from_config(&config.telegram)
        .wrap_err("Failed to create the Telegram client")?;

    let dispatcher =
        Dispatcher::new(Arc::new(catalog), Arc::new(store), InMemorySessionStore::new());

    info!(
        operation = "bot_started",
        database = %db_path.display(),
        poll_timeout_secs = config.telegram.poll_timeout_secs,
        "Bot started"
    );
    output.success("Watchbot is running. Press Ctrl-C to stop.");

    run_loop(&mut transport, &dispatcher, Backoff::default(), shutdown_signal()).await;

    output.info("Watchbot stopped.");
    Ok(())
}

/// Poll, dispatch every message in order, send every reply. Returns once
/// `shutdown` resolves; a batch already being handled is finished first.
pub async fn run_loop<T, C, S, F>(
    transport: &mut T,
    dispatcher: &Dispatcher<C, S>,
    backoff: Backoff,
    shutdown: F,
) where
    T: ChatTransport,
    C: Catalog,
    S: SessionStore,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut failures = 0u32;

    loop {
        let polled = tokio::select! {
            _ = &mut shutdown => break,
            polled = transport.poll() => polled,
        };

        let messages = match polled {
            Ok(messages) => {
                failures = 0;
                messages
            }
            Err(e) => {
                failures += 1;
                let delay = backoff.delay(failures);
                warn!(
                    operation = "poll",
                    error = %e,
                    failures,
                    retry_in_ms = delay.as_millis() as u64,
                    "Polling failed"
                );
                tokio::select! {
                    _ = &mut shutdown => break,
                    _ = tokio::time::sleep(delay) => {}
                }
                continue;
            }
        };

        for message in messages {
            let replies = dispatcher.handle(&message).await;
            for reply in &replies {
                if let Err(e) = transport.send(message.chat_id, reply).await {
                    error!(
                        chat_id = message.chat_id,
                        operation = "send",
                        error = %e,
                        "Failed to send reply"
                    );
                }
            }
        }
    }

    info!(operation = "bot_stopped", "Shutting down");
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C"),
                    _ = sigterm.recv() => info!("Received SIGTERM"),
                }
            }
            Err(e) => {
                warn!(error = %e, "Could not install SIGTERM handler, waiting for Ctrl+C only");
                ctrl_c.await.ok();
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C");
    }
}
