// The demo program as a tick-driven state machine.
//
// The servo first visits three fixed poses (~180°, ~90°, ~0°), each held for
// the pose hold time, then sweeps smoothly between the range bounds forever.
// Every frame carries the servo pulse, the indicator duty derived from it and
// how long the outputs stay unchanged afterwards.

// Licensed under the Apache License, Version 2.0
// Copyright 2024 Anton Khrustalev, creapunk.com

use embedded_time::duration::Milliseconds;

use crate::config::DemoConfig;
use crate::output::{LevelSink, Pause};
use crate::pulse::PulseMapper;
use crate::sweep::SweepGenerator;

/// Fixed servo positions of the preamble
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pose {
    Max,
    Center,
    Min,
}

impl Pose {
    /// Preamble order
    pub const SEQUENCE: [Pose; 3] = [Pose::Max, Pose::Center, Pose::Min];

    /// Nominal angle, for logging
    pub fn degrees(self) -> u16 {
        match self {
            Pose::Max => 180,
            Pose::Center => 90,
            Pose::Min => 0,
        }
    }

    pub fn pulse(self, config: &DemoConfig) -> u16 {
        match self {
            Pose::Max => config.range().max(),
            Pose::Center => config.center_us(),
            Pose::Min => config.range().min(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    Pose(Pose),
    Sweep,
}

/// One set of output levels and how long to hold them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub phase: Phase,
    /// Set on the first frame of a pose or of the sweep
    pub starts_phase: bool,
    pub servo_us: u16,
    pub indicator_duty: u16,
    pub hold: Milliseconds<u32>,
}

/// Produces the frames of the demo, endlessly.
pub struct DemoSequence {
    config: DemoConfig,
    mapper: PulseMapper,
    sweep: SweepGenerator,
    pose_idx: usize,
    sweeping: bool,
}

impl DemoSequence {
    pub fn new(config: DemoConfig) -> Self {
        Self {
            mapper: config.mapper(),
            sweep: SweepGenerator::with_step(config.range(), config.step()),
            config,
            pose_idx: 0,
            sweeping: false,
        }
    }

    pub fn config(&self) -> &DemoConfig {
        &self.config
    }

    /// Returns the next frame and advances.
    pub fn next_frame(&mut self) -> Frame {
        if let Some(&pose) = Pose::SEQUENCE.get(self.pose_idx) {
            self.pose_idx += 1;
            return self.frame(Phase::Pose(pose), true, pose.pulse(&self.config));
        }

        let starts_phase = !self.sweeping;
        self.sweeping = true;

        // Emit the current pulse first, so the sweep starts at the lower bound
        let pulse = self.sweep.pulse();
        self.sweep.next_pulse();
        self.frame(Phase::Sweep, starts_phase, pulse)
    }

    /// Goes back to the first pose.
    pub fn restart(&mut self) {
        self.pose_idx = 0;
        self.sweeping = false;
        self.sweep.reset();
    }

    fn frame(&self, phase: Phase, starts_phase: bool, pulse: u16) -> Frame {
        let servo_us = self.config.range().clamp(pulse);
        let hold = match phase {
            Phase::Pose(_) => self.config.pose_hold(),
            Phase::Sweep => self.config.sweep_tick(),
        };
        Frame {
            phase,
            starts_phase,
            servo_us,
            indicator_duty: self.mapper.duty(servo_us),
            hold,
        }
    }
}

/// Main loop: pushes every frame of a [`DemoSequence`] to the outputs.
///
/// `I` is usually an `Option` so boards without a PWM-capable indicator can
/// pass `None`.
pub struct ServoDemo<S, I, P> {
    sequence: DemoSequence,
    servo: S,
    indicator: I,
    pause: P,
}

impl<S, I, P> ServoDemo<S, I, P>
where
    S: LevelSink,
    I: LevelSink,
    P: Pause,
{
    pub fn new(config: DemoConfig, servo: S, indicator: I, pause: P) -> Self {
        Self {
            sequence: DemoSequence::new(config),
            servo,
            indicator,
            pause,
        }
    }

    /// Writes one frame to the outputs and waits for its hold time.
    pub fn step(&mut self) -> Frame {
        let frame = self.sequence.next_frame();
        if frame.starts_phase {
            Self::announce(&frame);
        }

        self.servo.set_level(frame.servo_us);
        self.indicator.set_level(frame.indicator_duty);
        self.pause.pause(frame.hold);
        frame
    }

    /// Runs until reset.
    pub fn run(&mut self) -> ! {
        loop {
            self.step();
        }
    }

    #[cfg(feature = "defmt")]
    fn announce(frame: &Frame) {
        match frame.phase {
            Phase::Pose(pose) => defmt::info!(
                "SERVO: ~{} degrees ({} us), indicator {}",
                pose.degrees(),
                frame.servo_us,
                frame.indicator_duty
            ),
            Phase::Sweep => defmt::info!("SERVO: smooth sweep, indicator follows pulse"),
        }
    }

    #[cfg(not(feature = "defmt"))]
    fn announce(_frame: &Frame) {}

    /// Hands the outputs back, e.g. to park the servo.
    pub fn release(self) -> (S, I, P) {
        (self.servo, self.indicator, self.pause)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MIN_PULSE_US;
    use crate::pulse::PulseRange;

    #[derive(Default)]
    struct Recorder {
        levels: Vec<u16>,
    }

    impl LevelSink for Recorder {
        fn set_level(&mut self, ticks: u16) {
            self.levels.push(ticks);
        }
    }

    #[derive(Default)]
    struct RecordingPause {
        waits: Vec<u32>,
    }

    impl Pause for RecordingPause {
        fn pause(&mut self, duration: Milliseconds<u32>) {
            self.waits.push(duration.0);
        }
    }

    #[test]
    fn preamble_visits_three_poses() {
        let mut seq = DemoSequence::new(DemoConfig::default());
        let frames = [seq.next_frame(), seq.next_frame(), seq.next_frame()];

        assert_eq!(frames[0].phase, Phase::Pose(Pose::Max));
        assert_eq!(frames[1].phase, Phase::Pose(Pose::Center));
        assert_eq!(frames[2].phase, Phase::Pose(Pose::Min));

        let pulses: Vec<u16> = frames.iter().map(|f| f.servo_us).collect();
        let duties: Vec<u16> = frames.iter().map(|f| f.indicator_duty).collect();
        assert_eq!(pulses, [2400, 1470, 500]);
        assert_eq!(duties, [1000, 510, 0]);
        assert!(frames.iter().all(|f| f.hold.0 == 5_000 && f.starts_phase));
    }

    #[test]
    fn sweep_starts_at_lower_bound() {
        let mut seq = DemoSequence::new(DemoConfig::default());
        for _ in 0..3 {
            seq.next_frame();
        }

        let first = seq.next_frame();
        assert_eq!(first.phase, Phase::Sweep);
        assert!(first.starts_phase);
        assert_eq!(first.servo_us, MIN_PULSE_US);
        assert_eq!(first.indicator_duty, 0);
        assert_eq!(first.hold, Milliseconds(10u32));

        let second = seq.next_frame();
        assert!(!second.starts_phase);
        assert_eq!(second.servo_us, 505);
        assert_eq!(second.indicator_duty, 2);
    }

    #[test]
    fn sweep_follows_triangle_wave() {
        let mut seq = DemoSequence::new(DemoConfig::default());
        for _ in 0..3 {
            seq.next_frame();
        }

        let mut reference = SweepGenerator::new(PulseRange::DEFAULT, 5).unwrap();
        let mapper = PulseMapper::DEFAULT;
        let mut expected = MIN_PULSE_US;
        for _ in 0..2_000 {
            let frame = seq.next_frame();
            assert_eq!(frame.servo_us, expected);
            assert_eq!(frame.indicator_duty, mapper.duty(expected));
            expected = reference.next_pulse();
        }
    }

    #[test]
    fn custom_config_is_honoured() {
        let range = PulseRange::new(1000, 2000).unwrap();
        let config =
            DemoConfig::new(range, 3000, 100, 250, Milliseconds(20), Milliseconds(1_000)).unwrap();
        let mut seq = DemoSequence::new(config);

        let max = seq.next_frame();
        assert_eq!((max.servo_us, max.indicator_duty, max.hold.0), (2000, 100, 1_000));
        // center outside the range is clamped like any servo pulse
        let center = seq.next_frame();
        assert_eq!((center.servo_us, center.indicator_duty), (2000, 100));
        seq.next_frame();

        let sweep: Vec<u16> = (0..9).map(|_| seq.next_frame().servo_us).collect();
        assert_eq!(sweep, [1000, 1250, 1500, 1750, 2000, 1750, 1500, 1250, 1000]);
    }

    #[test]
    fn restart_replays_preamble() {
        let mut seq = DemoSequence::new(DemoConfig::default());
        for _ in 0..10 {
            seq.next_frame();
        }
        seq.restart();

        assert_eq!(seq.next_frame().phase, Phase::Pose(Pose::Max));
        for _ in 0..2 {
            seq.next_frame();
        }
        let frame = seq.next_frame();
        assert!(frame.starts_phase);
        assert_eq!(frame.servo_us, MIN_PULSE_US);
    }

    #[test]
    fn demo_drives_both_outputs() {
        let mut demo = ServoDemo::new(
            DemoConfig::default(),
            Recorder::default(),
            Some(Recorder::default()),
            RecordingPause::default(),
        );
        for _ in 0..5 {
            demo.step();
        }

        let (servo, indicator, pause) = demo.release();
        assert_eq!(servo.levels, [2400, 1470, 500, 500, 505]);
        assert_eq!(indicator.unwrap().levels, [1000, 510, 0, 0, 2]);
        assert_eq!(pause.waits, [5_000, 5_000, 5_000, 10, 10]);
    }

    #[test]
    fn missing_indicator_only_drives_servo() {
        let mut demo = ServoDemo::new(
            DemoConfig::default(),
            Recorder::default(),
            None::<Recorder>,
            RecordingPause::default(),
        );
        let frame = demo.step();
        assert_eq!(frame.indicator_duty, 1000);

        let (servo, indicator, _) = demo.release();
        assert_eq!(servo.levels, [2400]);
        assert!(indicator.is_none());
    }

    #[test]
    fn borrowed_outputs_work() {
        let mut servo = Recorder::default();
        let mut pause = RecordingPause::default();
        {
            let mut demo = ServoDemo::new(DemoConfig::default(), &mut servo, None::<Recorder>, &mut pause);
            demo.step();
            demo.step();
        }
        assert_eq!(servo.levels, [2400, 1470]);
        assert_eq!(pause.waits, [5_000, 5_000]);
    }
}
