//! `route`: placement for a single event.

use std::io::Read;

use anyhow::Context;

use crate::channels::IncomingEvent;
use crate::config::Config;
use crate::coordination::{ResponseRouter, RouteDecision};

/// Parse one event from JSON.
pub(crate) fn parse_event(json: &str) -> anyhow::Result<IncomingEvent> {
    serde_json::from_str(json.trim()).context("invalid event JSON")
}

pub(crate) fn route_event(config: &Config, json: &str) -> anyhow::Result<RouteDecision> {
    let event = parse_event(json)?;
    let router = ResponseRouter::from_config(&config.roster, &config.routing);
    Ok(router.route_with_rule(&event))
}

/// Run the route command. Reads the event from stdin when none is given.
pub fn run_route_command(config: &Config, event: Option<String>) -> anyhow::Result<()> {
    let json = match event {
        Some(json) => json,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read event from stdin")?;
            buf
        }
    };

    let decision = route_event(config, &json)?;
    println!("{}", serde_json::to_string(&decision)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::Placement;

    #[test]
    fn test_route_event_from_json() {
        let decision = route_event(
            &Config::default(),
            r#"{"text": "roadmap review", "ts": "1.5", "user": "U1"}"#,
        )
        .unwrap();
        assert_eq!(decision.rule, "strategic");
        assert_eq!(decision.placement, Placement::channel());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let err = route_event(&Config::default(), "not json").unwrap_err();
        assert!(err.to_string().contains("invalid event JSON"));
    }
}
