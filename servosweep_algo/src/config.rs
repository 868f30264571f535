//! Compile-time defaults for the servo sweep demo.
//!
//! All pulse widths are in microseconds, one PWM tick is one microsecond.

use core::fmt;

use embedded_time::duration::Milliseconds;

use crate::pulse::{PulseMapper, PulseRange};
use crate::sweep::SweepStep;

/// Pulse for ~0°
pub const MIN_PULSE_US: u16 = 500;
/// Pulse for ~90°, trimmed on the bench (linear midpoint would be 1450)
pub const CENTER_PULSE_US: u16 = 1470;
/// Pulse for ~180°
pub const MAX_PULSE_US: u16 = 2400;

/// Full servo travel in degrees
pub const MAX_DEGREES: u16 = 180;

/// Servo frame period, 50 Hz
pub const SERVO_PERIOD_US: u16 = 20_000;
/// Indicator PWM period, 1 kHz. Also the indicator's full-scale duty.
pub const INDICATOR_WRAP: u16 = 1_000;

/// Timer tick rate every channel is configured for (1 tick = 1 us)
pub const TICK_HZ: u32 = 1_000_000;

/// Sweep increment per tick
pub const SWEEP_STEP_US: u16 = 5;
/// Delay between sweep ticks
pub const SWEEP_TICK: Milliseconds<u32> = Milliseconds(10);
/// How long each preamble pose is held
pub const POSE_HOLD: Milliseconds<u32> = Milliseconds(5_000);

/// Rejected configuration values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Pulse range with `min >= max`
    EmptyRange { min: u16, max: u16 },
    /// Sweep step of zero or wider than the range it sweeps
    StepOutOfRange { step: u16, span: u16 },
    /// Indicator wrap of zero
    ZeroWrap,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyRange { min, max } => {
                write!(f, "pulse range {}..{} us is empty", min, max)
            }
            ConfigError::StepOutOfRange { step, span } => {
                write!(f, "sweep step {} us outside 1..={} us", step, span)
            }
            ConfigError::ZeroWrap => write!(f, "indicator wrap must be non-zero"),
        }
    }
}

/// Everything the demo needs to know, validated as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoConfig {
    range: PulseRange,
    center_us: u16,
    indicator_wrap: u16,
    step: SweepStep,
    sweep_tick: Milliseconds<u32>,
    pose_hold: Milliseconds<u32>,
}

impl DemoConfig {
    /// Builds a configuration, checking the step against this range and the wrap.
    ///
    /// # Arguments
    /// * `range` - Servo pulse bounds, also the sweep bounds
    /// * `center_us` - Pulse of the ~90° pose, clamped into `range` when used
    /// * `indicator_wrap` - Full-scale indicator duty
    /// * `step_us` - Sweep increment per tick
    /// * `sweep_tick` - Delay between sweep ticks
    /// * `pose_hold` - How long each preamble pose is held
    pub fn new(
        range: PulseRange,
        center_us: u16,
        indicator_wrap: u16,
        step_us: u16,
        sweep_tick: Milliseconds<u32>,
        pose_hold: Milliseconds<u32>,
    ) -> Result<Self, ConfigError> {
        let step = SweepStep::new(step_us, &range)?;
        if indicator_wrap == 0 {
            return Err(ConfigError::ZeroWrap);
        }
        Ok(Self {
            range,
            center_us,
            indicator_wrap,
            step,
            sweep_tick,
            pose_hold,
        })
    }

    #[inline(always)]
    pub fn range(&self) -> PulseRange {
        self.range
    }

    #[inline(always)]
    pub fn center_us(&self) -> u16 {
        self.center_us
    }

    #[inline(always)]
    pub fn indicator_wrap(&self) -> u16 {
        self.indicator_wrap
    }

    /// Sweep step, always valid for [`Self::range`]
    #[inline(always)]
    pub fn step(&self) -> SweepStep {
        self.step
    }

    #[inline(always)]
    pub fn sweep_tick(&self) -> Milliseconds<u32> {
        self.sweep_tick
    }

    #[inline(always)]
    pub fn pose_hold(&self) -> Milliseconds<u32> {
        self.pose_hold
    }

    /// Builds the mapper from the configured range to the indicator wrap.
    pub fn mapper(&self) -> PulseMapper {
        PulseMapper::from_parts(self.range, self.indicator_wrap)
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            range: PulseRange::DEFAULT,
            center_us: CENTER_PULSE_US,
            indicator_wrap: INDICATOR_WRAP,
            step: SweepStep::DEFAULT,
            sweep_tick: SWEEP_TICK,
            pose_hold: POSE_HOLD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_constants() {
        let cfg = DemoConfig::default();
        assert_eq!(cfg.range().min(), MIN_PULSE_US);
        assert_eq!(cfg.range().max(), MAX_PULSE_US);
        assert_eq!(cfg.step().get(), SWEEP_STEP_US);
        assert_eq!(cfg.mapper().wrap(), INDICATOR_WRAP);
        assert_eq!(cfg.pose_hold(), Milliseconds(5_000u32));
    }

    #[test]
    fn new_matches_default() {
        let cfg = DemoConfig::new(
            PulseRange::DEFAULT,
            CENTER_PULSE_US,
            INDICATOR_WRAP,
            SWEEP_STEP_US,
            SWEEP_TICK,
            POSE_HOLD,
        );
        assert_eq!(cfg, Ok(DemoConfig::default()));
    }

    #[test]
    fn step_is_checked_against_own_range() {
        // 5 us is the default step, but it does not fit a 2 us range
        let narrow = PulseRange::new(1000, 1002).unwrap();
        assert_eq!(
            DemoConfig::new(narrow, 1001, INDICATOR_WRAP, SWEEP_STEP_US, SWEEP_TICK, POSE_HOLD),
            Err(ConfigError::StepOutOfRange { step: 5, span: 2 })
        );
        assert_eq!(
            DemoConfig::new(PulseRange::DEFAULT, CENTER_PULSE_US, INDICATOR_WRAP, 0, SWEEP_TICK, POSE_HOLD),
            Err(ConfigError::StepOutOfRange { step: 0, span: 1900 })
        );
        assert_eq!(
            DemoConfig::new(PulseRange::DEFAULT, CENTER_PULSE_US, 0, SWEEP_STEP_US, SWEEP_TICK, POSE_HOLD),
            Err(ConfigError::ZeroWrap)
        );

        let cfg = DemoConfig::new(narrow, 1001, INDICATOR_WRAP, 2, SWEEP_TICK, POSE_HOLD).unwrap();
        assert_eq!(cfg.step().get(), 2);
    }

    #[test]
    fn errors_render_readable_messages() {
        let err = ConfigError::EmptyRange { min: 2400, max: 500 };
        assert_eq!(err.to_string(), "pulse range 2400..500 us is empty");

        let err = ConfigError::StepOutOfRange { step: 0, span: 1900 };
        assert_eq!(err.to_string(), "sweep step 0 us outside 1..=1900 us");
    }
}
