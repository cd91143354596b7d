//! Configuration and readiness CLI command.
//!
//! Prints the resolved settings. Secrets are only reported as set or unset.

use std::fmt::Write as _;

use crate::config::Config;

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}

/// Render the status report.
pub fn render_status(config: &Config) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Crosstalk Status");
    let _ = writeln!(out, "================\n");
    let _ = writeln!(
        out,
        "  Version:     {} v{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    // Slack
    match &config.slack {
        Some(slack) => {
            let _ = writeln!(
                out,
                "  Slack:       configured (channel {}, token set)",
                slack.channel_id
            );
        }
        None => {
            let _ = writeln!(out, "  Slack:       not configured (set SLACK_BOT_TOKEN)");
        }
    }

    // LLM
    let key = if config.llm.api_key.is_some() {
        "key set"
    } else {
        "no key"
    };
    let _ = writeln!(
        out,
        "  LLM:         {} at {} ({})",
        config.llm.model, config.llm.base_url, key
    );

    // Coordination
    let c = &config.coordination;
    let _ = writeln!(
        out,
        "  Turns:       cooldown {}s, max {} per thread",
        c.cooldown.as_secs(),
        c.max_turns_per_thread
    );
    let _ = writeln!(
        out,
        "  Stagger:     {:.1}s to {:.1}s",
        c.stagger_min_secs, c.stagger_max_secs
    );

    // Reviver
    let r = &config.reviver;
    if r.enabled {
        let _ = writeln!(
            out,
            "  Reviver:     every {}s after {}s idle{}",
            r.check_interval.as_secs(),
            r.lookback.as_secs(),
            if r.working_hours_only {
                format!(", working hours only (UTC{:+})", r.utc_offset_hours)
            } else {
                String::new()
            }
        );
    } else {
        let _ = writeln!(out, "  Reviver:     disabled");
    }

    // Roster
    let roster = &config.roster;
    let _ = writeln!(
        out,
        "  Founder:     {}",
        roster.founder_id.as_deref().unwrap_or("(unset)")
    );
    let _ = writeln!(out, "  Fallback:    {}", roster.fallback_responder);
    let _ = writeln!(out, "  Responders:  {}", join_or_none(&roster.responders()));
    for (responder, targets) in &roster.handoffs {
        let _ = writeln!(out, "    {responder} hands off to {}", targets.join(", "));
    }

    out
}

/// Run the status command, printing the resolved configuration.
pub fn run_status_command(config: &Config) -> anyhow::Result<()> {
    print!("{}", render_status(config));
    Ok(())
}
