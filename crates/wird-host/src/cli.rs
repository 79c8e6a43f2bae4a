use clap::{Parser, Subcommand, ValueEnum};
use wird_scheduler::Trigger;

/// wird - daily reminders armed once a day, every day
#[derive(Parser)]
#[command(name = "wird", version, about = "Daily reminder host")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, env = "WIRD_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Schedule today's reminders and deliver them until Ctrl-C
    Run {
        /// What started the host
        #[arg(short, long, value_enum, default_value = "boot")]
        trigger: StartTrigger,
    },

    /// Print the planned daily schedule
    List {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the persisted epoch and timer capability
    Status,

    /// Forget the last scheduled day so the next start re-arms everything
    ClearEpoch,
}

/// Start-up triggers a host may report. The daily rescheduler is internal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StartTrigger {
    Boot,
    PackageReplaced,
    AppStart,
}

impl From<StartTrigger> for Trigger {
    fn from(t: StartTrigger) -> Self {
        match t {
            StartTrigger::Boot => Trigger::Boot,
            StartTrigger::PackageReplaced => Trigger::PackageReplaced,
            StartTrigger::AppStart => Trigger::AppStart,
        }
    }
}
