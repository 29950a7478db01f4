//! # Lingopause Core Library
//!
//! This library provides the playback core of Lingopause: learners watch a
//! captioned video and playback pauses at each scheduled focus word for a
//! short practice interaction. The CLI binary exercises the same core for
//! scripted runs.
//!
//! ## Architecture
//!
//! - **Scheduler**: a caller-driven state machine that watches video time and
//!   pauses at each focus word's end time; the caller invokes `tick()`
//! - **Panel**: the `preview -> cruising -> focus -> summary` state machine
//!   that reacts to scheduler events and user actions
//! - **Player**: the five-method widget capability trait and an adapter that
//!   absorbs widget failures
//! - **Driver**: an optional tokio polling loop around a shared controller
//!
//! ## Key Components
//!
//! - [`LearningController`]: wires scheduler, panel and stats together
//! - [`MicroPauseScheduler`]: the micro-pause state machine
//! - [`LearningPanel`]: the panel state machine
//! - [`VideoPlayer`]: trait for embeddable video widgets
//! - [`Config`]: application configuration management

pub mod clock;
pub mod config;
pub mod controller;
pub mod driver;
pub mod error;
pub mod events;
pub mod panel;
pub mod player;
pub mod scheduler;
pub mod session;
pub mod words;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Config, PlaybackConfig, SessionConfig};
pub use controller::{LearningController, PanelListener};
pub use driver::PollingLoop;
pub use error::{ConfigError, CoreError, TransitionError, ValidationError};
pub use events::Event;
pub use panel::{LearningPanel, PanelAction, PanelState, PanelView};
pub use player::{PlayerAdapter, PlayerError, PlayerState, SimulatedPlayer, VideoPlayer};
pub use scheduler::{MicroPauseScheduler, SchedulerState};
pub use session::{plan_sessions, LearningSession, SessionStats};
pub use words::{CefrLevel, FocusWord, ScheduledWord};
