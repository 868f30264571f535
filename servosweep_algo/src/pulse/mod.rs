// Maps a servo pulse width onto the duty level of a secondary output.
//
// A servo angle is encoded as the high time of a 50 Hz frame, 500 us for ~0°
// up to 2400 us for ~180°. The indicator runs on its own PWM channel with a
// different period, so the pulse is rescaled linearly onto 0..=wrap ticks of
// that channel. Inputs outside the servo range saturate at the nearest bound.

// Licensed under the Apache License, Version 2.0
// Copyright 2024 Anton Khrustalev, creapunk.com

use crate::config::{ConfigError, INDICATOR_WRAP, MAX_DEGREES, MAX_PULSE_US, MIN_PULSE_US};

/// Inclusive servo pulse range in microseconds, `min < max` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PulseRange {
    min: u16,
    max: u16,
}

impl PulseRange {
    /// 500..=2400 us
    pub const DEFAULT: PulseRange = PulseRange {
        min: MIN_PULSE_US,
        max: MAX_PULSE_US,
    };

    /// Creates a range, rejecting empty or inverted bounds.
    pub const fn new(min: u16, max: u16) -> Result<Self, ConfigError> {
        if min >= max {
            return Err(ConfigError::EmptyRange { min, max });
        }
        Ok(Self { min, max })
    }

    #[inline(always)]
    pub const fn min(&self) -> u16 {
        self.min
    }

    #[inline(always)]
    pub const fn max(&self) -> u16 {
        self.max
    }

    /// Distance between the bounds, never zero
    #[inline(always)]
    pub const fn span(&self) -> u16 {
        self.max - self.min
    }

    /// Pulls `pulse` into the range
    #[inline(always)]
    pub const fn clamp(&self, pulse: u16) -> u16 {
        if pulse < self.min {
            self.min
        } else if pulse > self.max {
            self.max
        } else {
            pulse
        }
    }

    /// Converts an angle in degrees (0..=180) to a pulse width.
    ///
    /// # Arguments
    /// * `degrees` - Commanded angle, saturated at 180
    ///
    /// # Returns
    /// Pulse width in microseconds, truncated toward `min`
    pub const fn angle_to_pulse(&self, degrees: u16) -> u16 {
        let degrees = if degrees > MAX_DEGREES { MAX_DEGREES } else { degrees };
        let offset = (degrees as u32 * self.span() as u32) / MAX_DEGREES as u32;
        self.min + offset as u16
    }

    /// Converts a pulse width back to degrees, truncated. Saturates like [`Self::clamp`].
    pub const fn pulse_to_angle(&self, pulse: u16) -> u16 {
        let offset = (self.clamp(pulse) - self.min) as u32;
        ((offset * MAX_DEGREES as u32) / self.span() as u32) as u16
    }
}

impl Default for PulseRange {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Linear pulse width to duty level converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PulseMapper {
    range: PulseRange,
    wrap: u16,
}

impl PulseMapper {
    /// 500..=2400 us onto 0..=1000
    pub const DEFAULT: PulseMapper = PulseMapper {
        range: PulseRange::DEFAULT,
        wrap: INDICATOR_WRAP,
    };

    /// Creates a mapper onto `0..=wrap`, rejecting a zero wrap.
    pub const fn new(range: PulseRange, wrap: u16) -> Result<Self, ConfigError> {
        if wrap == 0 {
            return Err(ConfigError::ZeroWrap);
        }
        Ok(Self { range, wrap })
    }

    /// Same as [`Self::new`] without the wrap check. A zero wrap maps everything to 0.
    pub(crate) const fn from_parts(range: PulseRange, wrap: u16) -> Self {
        Self { range, wrap }
    }

    #[inline(always)]
    pub const fn range(&self) -> PulseRange {
        self.range
    }

    #[inline(always)]
    pub const fn wrap(&self) -> u16 {
        self.wrap
    }

    /// Maps a pulse width to a duty level.
    ///
    /// # Arguments
    /// * `pulse_us` - Servo pulse width, any value (saturated into the range)
    ///
    /// # Returns
    /// `floor((pulse - min) * wrap / (max - min))`, always within `0..=wrap`
    pub const fn duty(&self, pulse_us: u16) -> u16 {
        let offset = (self.range.clamp(pulse_us) - self.range.min) as u32;
        // offset <= span, so the quotient never exceeds wrap
        ((offset * self.wrap as u32) / self.range.span() as u32) as u16
    }
}

impl Default for PulseMapper {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Maps a servo pulse to the indicator duty using the default range and wrap.
#[inline(always)]
pub const fn map_pulse_to_duty(pulse_us: u16) -> u16 {
    PulseMapper::DEFAULT.duty(pulse_us)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_map_to_zero_and_wrap() {
        assert_eq!(map_pulse_to_duty(500), 0);
        assert_eq!(map_pulse_to_duty(2400), 1000);
    }

    #[test]
    fn center_pose_truncates() {
        // 970 * 1000 / 1900 = 510.5...
        assert_eq!(map_pulse_to_duty(1470), 510);
        // 1895 * 1000 / 1900 = 997.3...
        assert_eq!(map_pulse_to_duty(2395), 997);
    }

    #[test]
    fn out_of_range_saturates() {
        assert_eq!(map_pulse_to_duty(0), map_pulse_to_duty(500));
        assert_eq!(map_pulse_to_duty(499), 0);
        assert_eq!(map_pulse_to_duty(2401), 1000);
        assert_eq!(map_pulse_to_duty(u16::MAX), 1000);
    }

    #[test]
    fn monotonic_over_range() {
        let mut prev = 0;
        for pulse in 0..=3000u16 {
            let duty = map_pulse_to_duty(pulse);
            assert!(duty >= prev, "duty dropped at {} us", pulse);
            assert!(duty <= 1000);
            prev = duty;
        }
    }

    #[test]
    fn wide_wrap_does_not_overflow() {
        let mapper = PulseMapper::new(PulseRange::new(0, u16::MAX).unwrap(), u16::MAX).unwrap();
        assert_eq!(mapper.duty(u16::MAX), u16::MAX);
        assert_eq!(mapper.duty(u16::MAX / 2), u16::MAX / 2);
    }

    #[test]
    fn rejects_bad_configuration() {
        assert_eq!(
            PulseRange::new(2400, 500),
            Err(ConfigError::EmptyRange { min: 2400, max: 500 })
        );
        assert!(PulseRange::new(1000, 1000).is_err());
        assert_eq!(
            PulseMapper::new(PulseRange::DEFAULT, 0),
            Err(ConfigError::ZeroWrap)
        );
    }

    #[test]
    fn angle_conversion() {
        let range = PulseRange::DEFAULT;
        assert_eq!(range.angle_to_pulse(0), 500);
        assert_eq!(range.angle_to_pulse(90), 1450);
        assert_eq!(range.angle_to_pulse(180), 2400);
        assert_eq!(range.angle_to_pulse(360), 2400);

        assert_eq!(range.pulse_to_angle(500), 0);
        assert_eq!(range.pulse_to_angle(1470), 91);
        assert_eq!(range.pulse_to_angle(2400), 180);
        assert_eq!(range.pulse_to_angle(100), 0);
    }
}
