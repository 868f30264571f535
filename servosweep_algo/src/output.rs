// Licensed under the Apache License, Version 2.0
// Copyright 2024 Anton Khrustalev, creapunk.com

use embedded_time::duration::Milliseconds;

/// Something that accepts a PWM level in timer ticks.
pub trait LevelSink {
    /// Sets the high time of the channel. Implementations saturate at their wrap.
    fn set_level(&mut self, ticks: u16);
}

/// An absent output swallows every level.
impl<S: LevelSink> LevelSink for Option<S> {
    #[inline(always)]
    fn set_level(&mut self, ticks: u16) {
        if let Some(sink) = self {
            sink.set_level(ticks);
        }
    }
}

impl<S: LevelSink + ?Sized> LevelSink for &mut S {
    #[inline(always)]
    fn set_level(&mut self, ticks: u16) {
        (**self).set_level(ticks);
    }
}

/// Blocking wait between output updates.
pub trait Pause {
    fn pause(&mut self, duration: Milliseconds<u32>);
}

impl<P: Pause + ?Sized> Pause for &mut P {
    #[inline(always)]
    fn pause(&mut self, duration: Milliseconds<u32>) {
        (**self).pause(duration);
    }
}
