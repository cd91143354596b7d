//! CLI command handling.
//!
//! Provides subcommands for:
//! - Coordinating a stream of events (`run`)
//! - Routing a single event (`route`)
//! - Summarizing a thread (`summarize`)
//! - Checking a thread for newer messages (`check-thread`)
//! - Showing the resolved configuration (`status`)

mod route;
mod run;
pub mod status;
mod thread;

pub use route::run_route_command;
pub use run::{NudgeHook, RunOptions, run_coordinator};
pub use status::run_status_command;
pub use thread::{run_check_thread_command, run_summarize_command};

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "crosstalk")]
#[command(about = "Coordinates several automated responders sharing one Slack channel")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Read newline-delimited event JSON from stdin and print a turn plan
    /// per event (default if no subcommand given)
    Run {
        /// Post acknowledgements to Slack after each responder's delay
        #[arg(long)]
        post: bool,

        /// Responders to consider, comma separated (defaults to the roster)
        #[arg(long, value_delimiter = ',')]
        responders: Vec<String>,
    },

    /// Print where a reply to one event would be placed
    Route {
        /// Event JSON; read from stdin when omitted
        event: Option<String>,
    },

    /// Summarize a Slack thread
    Summarize {
        /// Timestamp of the thread's root message
        thread_ts: String,
    },

    /// Check whether a thread has a message newer than its root
    CheckThread {
        /// Timestamp of the thread's root message
        thread_ts: String,
    },

    /// Show the resolved configuration
    Status,
}

impl Cli {
    /// The command to run; `run` when none was given.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Run {
            post: false,
            responders: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_runs() {
        let cli = Cli::try_parse_from(["crosstalk"]).unwrap();
        assert!(matches!(
            cli.command(),
            Command::Run { post: false, ref responders } if responders.is_empty()
        ));
    }

    #[test]
    fn test_run_flags() {
        let cli =
            Cli::try_parse_from(["crosstalk", "run", "--post", "--responders", "isla,elena"])
                .unwrap();
        match cli.command() {
            Command::Run { post, responders } => {
                assert!(post);
                assert_eq!(responders, vec!["isla", "elena"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_thread_commands_take_ts() {
        let cli = Cli::try_parse_from(["crosstalk", "check-thread", "1712.0001"]).unwrap();
        assert!(matches!(
            cli.command(),
            Command::CheckThread { ref thread_ts } if thread_ts == "1712.0001"
        ));
        assert!(Cli::try_parse_from(["crosstalk", "summarize"]).is_err());
    }
}
