#![cfg_attr(not(test), no_std)]

//! Hardware independent part of the servo sweep demo.
//!
//! Everything here is plain integer math and runs on the host, the drivers
//! crate only has to provide [`LevelSink`] and [`Pause`] implementations.

pub mod config;
pub mod demo;
pub mod output;
pub mod pulse;
pub mod sweep;
pub mod timing;

pub use config::{ConfigError, DemoConfig};
pub use demo::{DemoSequence, Frame, Phase, Pose, ServoDemo};
pub use output::{LevelSink, Pause};
pub use pulse::{map_pulse_to_duty, PulseMapper, PulseRange};
pub use sweep::{Direction, SweepGenerator, SweepState, SweepStep};
pub use timing::{PwmTiming, TimingError};

pub use embedded_time;
