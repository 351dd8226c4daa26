use std::io::Write;
use std::time::{Duration, Instant};

use clap::{Args, Subcommand};
use pomotrack_core::notify::{offer, LogDispatcher, NotificationDispatcher};
use pomotrack_core::{Clock, Config, Event, Phase, SessionCycleController};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run the cycle in real time, ticking once per second
    Run {
        #[command(flatten)]
        start: StartArgs,
        /// Stop after this many automatic phase changes
        #[arg(long)]
        transitions: Option<u64>,
        /// Print events as JSON lines instead of text
        #[arg(long)]
        json: bool,
    },
    /// Drive the cycle with synthetic ticks and print every event as JSON
    Simulate {
        #[command(flatten)]
        start: StartArgs,
        /// Number of automatic phase changes to simulate
        #[arg(long, default_value_t = 8)]
        transitions: u64,
        /// Seconds per synthetic tick
        #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(i64).range(1..))]
        tick: i64,
    },
    /// Print the configured cycle's initial state as JSON
    Status,
}

/// Where the first phase starts.
#[derive(Args)]
pub struct StartArgs {
    /// Remaining seconds handed over from another view
    #[arg(long, requires = "total")]
    remaining: Option<u64>,
    /// Total seconds of the handed-over phase
    #[arg(long, requires = "remaining")]
    total: Option<u64>,
    /// Begin in this phase (work, short-break, long-break)
    #[arg(long)]
    phase: Option<Phase>,
}

impl StartArgs {
    fn build(&self, config: &Config) -> Result<SessionCycleController, Box<dyn std::error::Error>> {
        let mut controller = SessionCycleController::from_config(config);
        if let Some(phase) = self.phase {
            controller.select_phase(phase)?;
        }
        let handoff = self.remaining.zip(self.total);
        if handoff.is_some() {
            controller = controller.with_clock(Clock::from_handoff(handoff)?);
        }
        controller.start();
        Ok(controller)
    }
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();

    match action {
        TimerAction::Run {
            start,
            transitions,
            json,
        } => {
            let controller = start.build(&config)?;
            run_realtime(controller, &config, transitions, json)?;
        }
        TimerAction::Simulate {
            start,
            transitions,
            tick,
        } => {
            let mut controller = start.build(&config)?;
            let mut changes = 0;
            while changes < transitions {
                if let Some(event) = controller.tick(tick)? {
                    changes += 1;
                    println!("{}", serde_json::to_string(&event)?);
                    // Without auto-advance the next phase waits; a simulation
                    // starts it immediately.
                    if !controller.clock().is_running() {
                        tracing::debug!(phase = %controller.phase(), "starting waiting phase");
                        controller.start();
                    }
                }
            }
            println!("{}", serde_json::to_string(&controller.snapshot())?);
        }
        TimerAction::Status => {
            let controller = SessionCycleController::from_config(&config);
            println!("{}", serde_json::to_string_pretty(&controller.snapshot())?);
        }
    }
    Ok(())
}

/// The external tick source: measures wall time and feeds whole seconds.
fn run_realtime(
    mut controller: SessionCycleController,
    config: &Config,
    limit: Option<u64>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut dispatcher = LogDispatcher;
    let mut bell = |event: &Event| {
        dispatcher.dispatch(event);
        eprint!("\x07");
    };
    let mut changes = 0u64;
    let mut last = Instant::now();
    let mut carry = Duration::ZERO;

    while limit.map_or(true, |max| changes < max) {
        std::thread::sleep(Duration::from_millis(250));
        let now = Instant::now();
        carry += now - last;
        last = now;
        let delta = carry.as_secs();
        if delta == 0 {
            continue;
        }
        carry -= Duration::from_secs(delta);

        if let Some(event) = controller.tick(delta as i64)? {
            changes += 1;
            offer(&mut bell, &config.notifications, &event);
            if json {
                println!("{}", serde_json::to_string(&event)?);
            } else {
                println!("\r{}", describe(&event));
            }
            if !controller.clock().is_running() {
                tracing::debug!(phase = %controller.phase(), "auto advance off, stopping");
                eprintln!(
                    "{} is ready; run `pomotrack timer run --phase {}` to start it",
                    controller.phase().label(),
                    phase_arg(controller.phase())
                );
                return Ok(());
            }
        }
        if !json {
            let clock = controller.clock();
            print!(
                "\r{:<12} {}  ({} done)   ",
                controller.phase().label(),
                format_mmss(clock.remaining_seconds()),
                controller.completed_work_intervals()
            );
            std::io::stdout().flush()?;
        }
    }
    if !json {
        println!();
    }
    Ok(())
}

fn describe(event: &Event) -> String {
    match event {
        Event::PhaseChanged {
            from,
            to,
            completed_work_intervals,
        } => format!("{from} finished -> {to} ({completed_work_intervals} completed)"),
        other => format!("{other:?}"),
    }
}

/// Spelling accepted by `--phase`.
fn phase_arg(phase: Phase) -> &'static str {
    match phase {
        Phase::Work => "work",
        Phase::ShortBreak => "short-break",
        Phase::LongBreak => "long-break",
    }
}

fn format_mmss(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
