//! Review Sentinel - homework review status poller
//!
//! Polls the Practicum homework status API, detects review status changes,
//! and forwards them to a Telegram chat.

pub mod config;
pub mod detector;
pub mod engine;
pub mod error;
pub mod io;
pub mod notifier;
pub mod practicum;
pub mod state;
pub mod status;
pub mod telegram;
pub mod validator;

pub use config::{load_config, load_dotenv, Config, Credentials};
pub use error::{Result, ReviewError};

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::engine::PollLoop;
use crate::io::ReqwestHttpClient;
use crate::notifier::NotificationSink;
use crate::practicum::PracticumClient;
use crate::status::{Cursor, StatusFetcher};
use crate::telegram::TelegramNotifier;

/// Run the poller with the given configuration until Ctrl-C
pub async fn run(config: Config, credentials: Credentials) -> Result<()> {
    config.validate()?;

    let http: Arc<dyn io::HttpClient> =
        Arc::new(ReqwestHttpClient::new(config.polling.request_timeout())?);

    let fetcher: Arc<dyn StatusFetcher> = Arc::new(PracticumClient::new(
        &config.practicum.endpoint,
        &credentials.practicum_token,
        Arc::clone(&http),
    )?);

    let sink: Arc<dyn NotificationSink> = Arc::new(TelegramNotifier::new(
        &config.telegram.api_url,
        &credentials.telegram_token,
        &credentials.telegram_chat_id,
        Arc::clone(&http),
    ));

    let cancel = CancellationToken::new();

    // Setup shutdown handler
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
            return;
        }
        tracing::info!("Shutdown signal received");
        cancel_for_signal.cancel();
    });

    let mut poll_loop = PollLoop::new(
        fetcher,
        sink,
        Cursor::now(),
        config.polling.interval(),
        cancel,
    );

    poll_loop.run().await;

    Ok(())
}
