use std::error::Error;
use std::time::Duration;

use pomodoro_core::{format_remaining, Event, Mode};
use tokio::time::{interval_at, Instant};

use crate::common::{print_outcome, Context, Engine};

pub enum TimerAction {
    Start,
    Pause,
    Skip,
    Tick { seconds: u64 },
    Mode { mode: Mode },
}

pub fn status(ctx: &Context) -> Result<(), Box<dyn Error>> {
    let engine = ctx.reader()?;
    println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
    Ok(())
}

pub fn run(ctx: &Context, action: TimerAction) -> Result<(), Box<dyn Error>> {
    let mut engine = ctx.engine()?;
    let outcome = match action {
        TimerAction::Start => engine.start(),
        TimerAction::Pause => engine.pause(),
        TimerAction::Skip => engine.finish_cycle(),
        TimerAction::Tick { seconds } => engine.advance(seconds),
        TimerAction::Mode { mode } => engine.switch_mode(mode),
    };
    print_outcome(&engine, &outcome)
}

pub fn reset(ctx: &Context, confirmed: bool) -> Result<(), Box<dyn Error>> {
    if !confirmed {
        return Err("refusing to reset without --yes".into());
    }
    let mut engine = ctx.engine()?;
    let outcome = engine.reset_all();
    print_outcome(&engine, &outcome)
}

/// Tick once per second until interrupted (or, with `once`, until the
/// current interval finishes). Ctrl-C pauses before exiting.
///
/// Holds the run lock for its whole lifetime: other mutating commands are
/// refused until it exits.
pub fn foreground(ctx: &Context, once: bool) -> Result<(), Box<dyn Error>> {
    let (_lock, mut engine) = ctx.lock_run()?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(drive(&mut engine, once))
}

async fn drive(engine: &mut Engine, once: bool) -> Result<(), Box<dyn Error>> {
    for warning in engine.start().warnings {
        eprintln!("warning: state not saved: {warning}");
    }
    let period = Duration::from_secs(1);
    let mut ticker = interval_at(Instant::now() + period, period);
    print_line(engine);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let outcome = engine.advance_one_second();
                for warning in &outcome.warnings {
                    eprintln!("warning: state not saved: {warning}");
                }
                let finished = outcome
                    .events
                    .iter()
                    .any(|e| matches!(e, Event::CycleCompleted { .. }));
                for event in &outcome.events {
                    println!("{}", serde_json::to_string(event)?);
                }
                print_line(engine);
                if finished && (once || !engine.state().timer.running) {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                let outcome = engine.pause();
                for event in &outcome.events {
                    println!("{}", serde_json::to_string(event)?);
                }
                break;
            }
        }
    }
    Ok(())
}

fn print_line(engine: &Engine) {
    let timer = &engine.state().timer;
    println!(
        "{} {} (round {})",
        format_remaining(timer.remaining_seconds),
        timer.mode.label(),
        timer.round
    );
}
