use cortex_m::delay::Delay;
use servosweep_algo::embedded_time::duration::Milliseconds;
use servosweep_algo::Pause;

/// SysTick based busy wait between frames.
pub struct SysPause {
    delay: Delay,
}

impl SysPause {
    pub fn new(delay: Delay) -> Self {
        SysPause { delay }
    }
}

impl Pause for SysPause {
    #[inline(always)]
    fn pause(&mut self, duration: Milliseconds<u32>) {
        self.delay.delay_ms(duration.0);
    }
}
