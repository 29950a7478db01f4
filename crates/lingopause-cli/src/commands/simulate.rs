use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use lingopause_core::{
    Config, Event, LearningController, LearningSession, ManualClock, PanelState, SimulatedPlayer,
};

use super::read_json;

#[derive(Args)]
pub struct SimulateArgs {
    /// Path to a session JSON file
    session: PathBuf,
    /// Seconds of video (and wall clock) that pass between ticks
    #[arg(long, default_value = "0.25")]
    step: f64,
    /// Ticks spent practicing before the practice is completed
    #[arg(long, default_value = "4")]
    practice_ticks: u32,
    /// Give up after this many ticks
    #[arg(long, default_value = "100000")]
    max_ticks: u32,
}

fn emit(events: &[Event]) -> Result<(), Box<dyn std::error::Error>> {
    for event in events {
        println!("{}", serde_json::to_string(event)?);
    }
    Ok(())
}

pub fn run(args: SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    if !(args.step > 0.0 && args.step <= 1.0) {
        return Err("--step must be in (0, 1] seconds".into());
    }
    let session: LearningSession = read_json(&args.session)?;
    let config = Config::load_or_default();

    // Leave some tail after the last word so its trigger is reachable.
    let player = SimulatedPlayer::new().with_duration(session.session_end_time + 5.0);
    let clock = ManualClock::new();
    let mut controller =
        LearningController::new(session, player.clone(), clock.clone(), config.playback);

    emit(&controller.start_watching()?)?;
    if !controller.is_watching() {
        return Err("scheduler did not start: no schedulable words in session".into());
    }

    let step = Duration::from_secs_f64(args.step);
    let mut practicing = 0;
    for _ in 0..args.max_ticks {
        clock.advance(step);
        player.advance(args.step);
        emit(&controller.tick())?;

        if controller.panel_state() == PanelState::Focus {
            practicing += 1;
            if practicing >= args.practice_ticks {
                practicing = 0;
                emit(&controller.complete_practice()?)?;
            }
        }
        if controller.panel_state() == PanelState::Summary {
            break;
        }
    }

    println!("{}", serde_json::to_string(&controller.view())?);
    Ok(())
}
