// Triangle wave generator for the servo pulse width.
//
// Each tick moves the pulse by a fixed step toward the current bound. When the
// step reaches or crosses a bound the pulse is clamped to it and the direction
// flips in the same tick, so every bound is emitted exactly once per half-cycle.

// Licensed under the Apache License, Version 2.0
// Copyright 2024 Anton Khrustalev, creapunk.com

use crate::config::{ConfigError, SWEEP_STEP_US};
use crate::pulse::PulseRange;

/// Sweep direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    #[inline(always)]
    pub fn reversed(self) -> Self {
        match self {
            Direction::Ascending => Direction::Descending,
            Direction::Descending => Direction::Ascending,
        }
    }
}

/// Pulse increment per tick, `1..=span` of the range it was validated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SweepStep(u16);

impl SweepStep {
    /// 5 us per tick
    pub const DEFAULT: SweepStep = SweepStep(SWEEP_STEP_US);

    /// Validates `step` against the range it will sweep.
    pub const fn new(step: u16, range: &PulseRange) -> Result<Self, ConfigError> {
        let span = range.span();
        if step == 0 || step > span {
            return Err(ConfigError::StepOutOfRange { step, span });
        }
        Ok(Self(step))
    }

    #[inline(always)]
    pub const fn get(&self) -> u16 {
        self.0
    }
}

/// Current pulse and heading of the sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SweepState {
    pub pulse: u16,
    pub direction: Direction,
}

impl SweepState {
    /// Start of a sweep: lower bound, heading up
    pub const fn start(range: &PulseRange) -> Self {
        Self {
            pulse: range.min(),
            direction: Direction::Ascending,
        }
    }

    /// Pure transition: advances the pulse by `step` and flips at the bounds.
    ///
    /// Arithmetic saturates, so any state (even one outside `range`) yields a
    /// pulse within `range`. `step` is never zero, so the pulse always moves
    /// unless it already sits on the bound it is heading to.
    pub fn tick(self, step: SweepStep, range: &PulseRange) -> Self {
        let step = step.get();
        match self.direction {
            Direction::Ascending => {
                let next = self.pulse.saturating_add(step);
                if next >= range.max() {
                    Self {
                        pulse: range.max(),
                        direction: self.direction.reversed(),
                    }
                } else {
                    Self {
                        pulse: range.clamp(next),
                        direction: self.direction,
                    }
                }
            }
            Direction::Descending => {
                let next = self.pulse.saturating_sub(step);
                if next <= range.min() {
                    Self {
                        pulse: range.min(),
                        direction: self.direction.reversed(),
                    }
                } else {
                    Self {
                        pulse: range.clamp(next),
                        direction: self.direction,
                    }
                }
            }
        }
    }
}

/// Owns a sweep state together with its range and step.
pub struct SweepGenerator {
    state: SweepState,
    range: PulseRange,
    step: SweepStep,
}

impl SweepGenerator {
    /// Creates a generator at the lower bound, heading up.
    ///
    /// # Arguments
    /// * `range` - Sweep bounds
    /// * `step` - Increment per tick, in microseconds
    pub fn new(range: PulseRange, step: u16) -> Result<Self, ConfigError> {
        let step = SweepStep::new(step, &range)?;
        Ok(Self::with_step(range, step))
    }

    /// Creates a generator from an already validated step.
    ///
    /// The step is re-checked against `range`; a step wider than the range
    /// degrades to a single bound-to-bound jump per tick.
    pub fn with_step(range: PulseRange, step: SweepStep) -> Self {
        let step = match SweepStep::new(step.get(), &range) {
            Ok(step) => step,
            Err(_) => SweepStep(range.span()),
        };
        Self {
            state: SweepState::start(&range),
            range,
            step,
        }
    }

    /// Pulse the generator currently sits at
    #[inline(always)]
    pub fn pulse(&self) -> u16 {
        self.state.pulse
    }

    #[inline(always)]
    pub fn state(&self) -> SweepState {
        self.state
    }

    #[inline(always)]
    pub fn range(&self) -> PulseRange {
        self.range
    }

    /// Advances one tick and returns the new pulse.
    pub fn next_pulse(&mut self) -> u16 {
        let next = self.state.tick(self.step, &self.range);
        if next.direction != self.state.direction {
            #[cfg(feature = "defmt")]
            defmt::trace!("SWEEP: reversed at {} us, now {}", next.pulse, next.direction);
        }
        self.state = next;
        self.state.pulse
    }

    /// Restarts from the lower bound, heading up.
    pub fn reset(&mut self) {
        self.state = SweepState::start(&self.range);
    }
}

/// Endless triangle wave, yields the pulse after each tick.
impl Iterator for SweepGenerator {
    type Item = u16;

    fn next(&mut self) -> Option<u16> {
        Some(self.next_pulse())
    }
}
