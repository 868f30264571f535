// Licensed under the Apache License, Version 2.0
// Copyright 2024 Anton Khrustalev, creapunk.com

use core::fmt;

use crate::config::TICK_HZ;

/// Largest divisor a 16-bit prescaler can hold (PSC = divisor - 1)
const MAX_DIVISOR: u32 = u16::MAX as u32 + 1;

/// Reasons a channel period cannot be produced from the timer clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimingError {
    /// Timer clock is not a whole multiple of the 1 MHz tick
    ClockNotDivisible { clock_hz: u32 },
    /// Divisor is zero or does not fit the prescaler
    DivisorOutOfRange { divisor: u32 },
    /// Period of zero ticks
    PeriodOutOfRange,
}

impl fmt::Display for TimingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimingError::ClockNotDivisible { clock_hz } => {
                write!(f, "timer clock {} Hz is not a multiple of {} Hz", clock_hz, TICK_HZ)
            }
            TimingError::DivisorOutOfRange { divisor } => {
                write!(f, "clock divisor {} outside 1..={}", divisor, MAX_DIVISOR)
            }
            TimingError::PeriodOutOfRange => write!(f, "PWM period must be at least 1 us"),
        }
    }
}

/// Divisor and wrap of a PWM channel running at one tick per microsecond.
///
/// `clock_hz / divisor == 1 MHz` and `wrap == period_us`, so a level written to
/// the channel is directly the high time in microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PwmTiming {
    clock_hz: u32,
    divisor: u32,
    wrap: u16,
}

impl PwmTiming {
    /// Computes the timing for a channel.
    ///
    /// # Arguments
    /// * `clock_hz` - Timer kernel clock, e.g. 125 MHz or 170 MHz
    /// * `period_us` - Signal period, 20000 for a 50 Hz servo frame
    pub fn new(clock_hz: u32, period_us: u16) -> Result<Self, TimingError> {
        if clock_hz % TICK_HZ != 0 {
            return Err(TimingError::ClockNotDivisible { clock_hz });
        }
        let divisor = clock_hz / TICK_HZ;
        if divisor == 0 || divisor > MAX_DIVISOR {
            return Err(TimingError::DivisorOutOfRange { divisor });
        }
        if period_us == 0 {
            return Err(TimingError::PeriodOutOfRange);
        }
        Ok(Self {
            clock_hz,
            divisor,
            wrap: period_us,
        })
    }

    #[inline(always)]
    pub fn divisor(&self) -> u32 {
        self.divisor
    }

    /// Counter ticks per period, also the highest meaningful level
    #[inline(always)]
    pub fn wrap(&self) -> u16 {
        self.wrap
    }

    /// Register value for the prescaler (counts from zero)
    #[inline(always)]
    pub fn prescaler(&self) -> u16 {
        (self.divisor - 1) as u16
    }

    /// Register value for the auto-reload (counts from zero)
    #[inline(always)]
    pub fn auto_reload(&self) -> u32 {
        self.wrap as u32 - 1
    }

    /// Output frequency in Hz, truncated
    pub fn frequency_hz(&self) -> u32 {
        self.clock_hz / self.divisor / self.wrap as u32
    }

    /// Limits a level to the channel's wrap
    #[inline(always)]
    pub fn clamp_level(&self, level: u16) -> u16 {
        level.min(self.wrap)
    }
}
