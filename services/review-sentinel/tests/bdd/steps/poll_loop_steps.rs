//! BDD step definitions for poll loop feature

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use cucumber::{given, then, when};
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use review_sentinel::engine::PollLoop;
use review_sentinel::notifier::NotificationSink;
use review_sentinel::status::{Cursor, StatusFetcher};
use review_sentinel::ReviewError;

use crate::world::ReviewWorld;

// --- Test doubles ---

/// A scripted fetch result
#[derive(Debug)]
enum Reply {
    Json(Value),
    Status(u16),
    Unreachable,
}

/// A fetcher that replays scripted replies and records requested cursors
#[derive(Debug, Default)]
pub struct ScriptedFetcher {
    replies: RwLock<VecDeque<Reply>>,
    pub cursors: RwLock<Vec<Cursor>>,
}

#[async_trait::async_trait]
impl StatusFetcher for ScriptedFetcher {
    async fn fetch(&self, cursor: Cursor) -> review_sentinel::Result<Value> {
        self.cursors.write().await.push(cursor);
        match self.replies.write().await.pop_front() {
            Some(Reply::Json(value)) => Ok(value),
            Some(Reply::Status(status)) => Err(ReviewError::Upstream {
                status,
                body: String::new(),
            }),
            Some(Reply::Unreachable) | None => {
                Err(ReviewError::Transport("connection refused".to_string()))
            }
        }
    }
}

/// A sink that records every message and can be switched to failing
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub failing: RwLock<bool>,
    pub messages: RwLock<Vec<String>>,
}

#[async_trait::async_trait]
impl NotificationSink for RecordingSink {
    fn type_name(&self) -> &str {
        "recording"
    }

    async fn send(&self, message: &str) -> review_sentinel::Result<()> {
        self.messages.write().await.push(message.to_string());
        if *self.failing.read().await {
            Err(ReviewError::Delivery("chat unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

fn fetcher(world: &ReviewWorld) -> &ScriptedFetcher {
    world.fetcher.as_deref().expect("poll loop not set up")
}

fn sink(world: &ReviewWorld) -> &RecordingSink {
    world.recording_sink.as_deref().expect("poll loop not set up")
}

async fn script(world: &ReviewWorld, reply: Reply) {
    fetcher(world).replies.write().await.push_back(reply);
}

#[given(expr = "a poll loop starting at cursor {int}")]
fn poll_loop_at(world: &mut ReviewWorld, cursor: i64) {
    let fetcher = Arc::new(ScriptedFetcher::default());
    let sink = Arc::new(RecordingSink::default());
    world.poll_loop = Some(PollLoop::new(
        Arc::clone(&fetcher) as Arc<dyn StatusFetcher>,
        Arc::clone(&sink) as Arc<dyn NotificationSink>,
        Cursor(cursor),
        Duration::from_millis(10),
        CancellationToken::new(),
    ));
    world.fetcher = Some(fetcher);
    world.recording_sink = Some(sink);
}

#[given(expr = "the status API returns homework {string} with status {string} at {int}")]
async fn api_returns_homework(world: &mut ReviewWorld, name: String, status: String, date: i64) {
    let body = json!({
        "homeworks": [{"homework_name": name, "status": status}],
        "current_date": date
    });
    script(world, Reply::Json(body)).await;
}

#[given(expr = "the status API returns no homeworks at {int}")]
async fn api_returns_nothing(world: &mut ReviewWorld, date: i64) {
    script(world, Reply::Json(json!({"homeworks": [], "current_date": date}))).await;
}

#[given(expr = "the status API returns HTTP {int}")]
async fn api_returns_status(world: &mut ReviewWorld, status: u16) {
    script(world, Reply::Status(status)).await;
}

#[given("the status API is unreachable")]
async fn api_unreachable(world: &mut ReviewWorld) {
    script(world, Reply::Unreachable).await;
}

#[given("the Telegram chat is failing")]
async fn chat_failing(world: &mut ReviewWorld) {
    *sink(world).failing.write().await = true;
}

#[when(expr = "{int} poll cycle(s) run(s)")]
async fn run_cycles(world: &mut ReviewWorld, count: usize) {
    let poll_loop = world.poll_loop.as_mut().expect("poll loop not set up");
    for _ in 0..count {
        let outcome = poll_loop.tick().await;
        world.outcomes.push(outcome);
    }
}

#[then(expr = "{int} message(s) should have been delivered")]
async fn messages_delivered(world: &mut ReviewWorld, count: usize) {
    let messages = sink(world).messages.read().await;
    assert_eq!(messages.len(), count, "{messages:?}");
}

#[then(expr = "the last delivered message should start with {string}")]
async fn last_message_starts_with(world: &mut ReviewWorld, prefix: String) {
    let messages = sink(world).messages.read().await;
    let last = messages.last().expect("no messages delivered");
    assert!(last.starts_with(&prefix), "{last}");
}

#[then(expr = "the cursor should be {int}")]
fn cursor_is(world: &mut ReviewWorld, cursor: i64) {
    let poll_loop = world.poll_loop.as_ref().expect("poll loop not set up");
    assert_eq!(poll_loop.cursor(), Cursor(cursor));
}

#[then(expr = "the fetches should have used cursors {string}")]
async fn fetch_cursors(world: &mut ReviewWorld, expected: String) {
    let expected: Vec<Cursor> = expected
        .split(',')
        .map(|c| Cursor(c.trim().parse().expect("cursor is an integer")))
        .collect();
    assert_eq!(*fetcher(world).cursors.read().await, expected);
}

#[then("the last cycle should have failed")]
fn last_cycle_failed(world: &mut ReviewWorld) {
    let outcome = world.outcomes.last().expect("no cycles run");
    assert!(!outcome.is_success(), "{outcome:?}");
}
