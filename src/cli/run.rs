//! `run`: coordinate a stream of events.
//!
//! Events arrive as newline-delimited JSON on stdin. Each one is observed,
//! planned and printed as a single JSON line on stdout. With `--post`, every
//! planned reply waits out its stagger delay, backs off if its thread moved
//! on in the meantime, and otherwise posts a placeholder acknowledgement.
//! The reviver runs alongside until stdin closes or Ctrl+C.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::channels::{MessagingClient, Placement, SlackClient};
use crate::config::Config;
use crate::coordination::{
    ConversationState, Coordinator, PlannedReply, ReviveHook, Reviver, ThreadFreshness,
    WorkingHours,
};
use crate::error::Error;

use super::route::parse_event;

/// Text posted when the channel has gone quiet.
const NUDGE_TEXT: &str = "It's been quiet here. Anything blocked or waiting on a decision?";

/// Options for [`run_coordinator`].
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Post acknowledgements to Slack.
    pub post: bool,
    /// Responders to consider; empty means every responder in the roster.
    pub responders: Vec<String>,
}

/// Revival hook that nudges the channel, optionally only in working hours.
pub struct NudgeHook {
    hours: Option<WorkingHours>,
    client: Option<Arc<dyn MessagingClient>>,
}

impl NudgeHook {
    pub fn new(hours: Option<WorkingHours>, client: Option<Arc<dyn MessagingClient>>) -> Self {
        Self { hours, client }
    }

    pub fn should_nudge(&self, now: DateTime<Utc>) -> bool {
        self.hours.is_none_or(|hours| hours.contains(now))
    }
}

#[async_trait]
impl ReviveHook for NudgeHook {
    async fn revive(&self) -> Result<(), Error> {
        if !self.should_nudge(Utc::now()) {
            tracing::info!("Channel quiet outside working hours, not nudging");
            return Ok(());
        }
        match &self.client {
            Some(client) => {
                let ts = client.post_message(NUDGE_TEXT, &Placement::channel()).await?;
                tracing::info!(ts = %ts, "Posted revival nudge");
            }
            None => tracing::info!("Channel quiet, would post: {}", NUDGE_TEXT),
        }
        Ok(())
    }
}

/// Post one planned reply to the message `event_ts` after its delay, unless
/// the thread moved past that message.
async fn deliver(
    coordinator: Arc<Coordinator>,
    client: Arc<dyn MessagingClient>,
    placement: Placement,
    event_ts: String,
    reply: PlannedReply,
) {
    tokio::time::sleep(std::time::Duration::from_secs_f64(reply.delay_secs)).await;

    if let Some(thread_ts) = placement.thread_ts.as_deref() {
        let freshness = ThreadFreshness::new(Arc::clone(&client));
        if freshness.has_message_after(thread_ts, &event_ts).await {
            tracing::info!(
                responder = %reply.responder,
                thread = %thread_ts,
                "Thread moved on, dropping reply"
            );
            return;
        }
    }

    // Cooldown or turn limit may have changed during the delay.
    let verdict = coordinator.verdict(&reply.responder, &placement);
    if !verdict.is_permitted() {
        tracing::info!(responder = %reply.responder, ?verdict, "Reply no longer permitted");
        return;
    }

    let text = format!("[{}] acknowledged", reply.responder);
    match client.post_message(&text, &placement).await {
        Ok(ts) => {
            coordinator.record(&reply.responder, &placement);
            tracing::info!(responder = %reply.responder, ts = %ts, "Posted reply");
        }
        Err(e) => {
            tracing::warn!(responder = %reply.responder, error = %e, "Failed to post reply");
        }
    }
}

/// Run the coordinator over stdin until EOF or Ctrl+C.
pub async fn run_coordinator(config: Config, options: RunOptions) -> anyhow::Result<()> {
    let responders = if options.responders.is_empty() {
        config.roster.responders()
    } else {
        options.responders
    };

    let client: Option<Arc<dyn MessagingClient>> = if options.post {
        let slack = config.require_slack()?;
        Some(Arc::new(SlackClient::new(slack.clone())))
    } else {
        None
    };

    let state = Arc::new(ConversationState::new(
        config.coordination.cooldown,
        config.coordination.max_turns_per_thread,
    ));
    state.mark_activity();
    let coordinator = Arc::new(Coordinator::from_config(&config, Arc::clone(&state)));

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let reviver_handle = if config.reviver.enabled {
        let hours = config
            .reviver
            .working_hours_only
            .then(|| WorkingHours::with_offset(config.reviver.utc_offset_hours));
        let hook = Arc::new(NudgeHook::new(hours, client.clone()));
        Some(Reviver::new(Arc::clone(&state), config.reviver.clone(), hook).spawn(shutdown_rx))
    } else {
        tracing::info!("Reviver disabled");
        None
    };

    tracing::info!(
        responders = %responders.join(","),
        post = options.post,
        "Coordinator ready, reading events from stdin"
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut deliveries: Vec<JoinHandle<()>> = Vec::new();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
        };
        let Some(line) = line else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let event = match parse_event(&line) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed event");
                continue;
            }
        };

        coordinator.observe(&event);
        let plan = coordinator.plan(&event, &responders);
        println!("{}", serde_json::to_string(&plan)?);

        match &client {
            Some(client) => {
                for reply in plan.replies {
                    deliveries.push(tokio::spawn(deliver(
                        Arc::clone(&coordinator),
                        Arc::clone(client),
                        plan.placement.clone(),
                        event.ts.clone(),
                        reply,
                    )));
                }
            }
            None => {
                for reply in &plan.replies {
                    coordinator.record(&reply.responder, &plan.placement);
                }
            }
        }
    }

    for delivery in deliveries {
        if let Err(e) = delivery.await {
            tracing::warn!(error = %e, "Reply task failed");
        }
    }

    let _ = shutdown_tx.send(());
    if let Some(handle) = reviver_handle {
        let _ = handle.await;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::channels::{IncomingEvent, ThreadMessage};
    use crate::testing::StubMessaging;

    fn at(h: u32) -> DateTime<Utc> {
        // 2024-06-05 is a Wednesday.
        Utc.with_ymd_and_hms(2024, 6, 5, h, 0, 0).unwrap()
    }

    #[test]
    fn test_nudge_gated_by_working_hours() {
        let hook = NudgeHook::new(Some(WorkingHours::default()), None);
        // 14:00 UTC is 10:00 at UTC-4.
        assert!(hook.should_nudge(at(14)));
        // 03:00 UTC is 23:00 the previous evening.
        assert!(!hook.should_nudge(at(3)));
    }

    #[test]
    fn test_ungated_nudge_always_allowed() {
        let hook = NudgeHook::new(None, None);
        assert!(hook.should_nudge(at(3)));
    }

    #[tokio::test]
    async fn test_nudge_posts_to_channel() {
        let stub = Arc::new(StubMessaging::new());
        let hook = NudgeHook::new(None, Some(stub.clone()));
        hook.revive().await.unwrap();

        let posted = stub.posted();
        assert_eq!(posted.len(), 1);
        assert_eq!(posted[0].0, NUDGE_TEXT);
        assert_eq!(posted[0].1, Placement::channel());
    }

    #[tokio::test]
    async fn test_nudge_post_failure_surfaces() {
        let stub = Arc::new(StubMessaging::new());
        stub.set_failing(true);
        let hook = NudgeHook::new(None, Some(stub));
        assert!(hook.revive().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_deliver_records_and_then_drops_stale_thread() {
        let stub = Arc::new(StubMessaging::new());
        let state = Arc::new(ConversationState::new(std::time::Duration::from_secs(30), 3));
        let coordinator = Arc::new(Coordinator::from_config(&Config::default(), state.clone()));
        let placement = Placement::thread("7.0");
        let reply = |name: &str| PlannedReply {
            responder: name.to_string(),
            delay_secs: 1.5,
            handoffs: Vec::new(),
        };

        deliver(
            coordinator.clone(),
            stub.clone(),
            placement.clone(),
            "7.0".to_string(),
            reply("isla"),
        )
        .await;
        assert_eq!(state.turns("isla", "7.0"), 1);

        // The thread now has a reply newer than its root.
        deliver(
            coordinator,
            stub.clone(),
            placement,
            "7.0".to_string(),
            reply("elena"),
        )
        .await;
        assert_eq!(state.turns("elena", "7.0"), 0);
        assert_eq!(stub.posted().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deliver_answers_message_already_in_thread() {
        let stub = Arc::new(StubMessaging::new());
        let message = |ts: &str| ThreadMessage {
            ts: ts.to_string(),
            text: "earlier".to_string(),
            ..Default::default()
        };
        stub.set_thread("7.0", vec![message("7.0"), message("7.5")]);

        let state = Arc::new(ConversationState::new(std::time::Duration::from_secs(30), 3));
        let coordinator = Arc::new(Coordinator::from_config(&Config::default(), state.clone()));
        let event = IncomingEvent::new("found a bug", "7.5").in_thread("7.0");
        let plan = coordinator.plan(&event, &["isla"]);
        assert_eq!(plan.placement, Placement::thread("7.0"));
        assert_eq!(plan.replies.len(), 1);

        for reply in plan.replies {
            deliver(
                coordinator.clone(),
                stub.clone(),
                plan.placement.clone(),
                event.ts.clone(),
                reply,
            )
            .await;
        }

        assert_eq!(stub.posted().len(), 1);
        assert_eq!(state.turns("isla", "7.0"), 1);
    }
}
