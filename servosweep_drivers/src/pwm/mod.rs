use hal::{
    clocks::Clocks,
    pac::{self, TIM15, TIM2},
    timer::{OutputCompare, TimChannel, Timer, TimerConfig},
};

use servosweep_algo::{LevelSink, PwmTiming, TimingError};

use super::pinout;

/// Edge aligned, preloaded auto-reload so period changes land on an update event
fn timer_config() -> TimerConfig {
    TimerConfig {
        one_pulse_mode: false,
        auto_reload_preload: true,
        ..Default::default()
    }
}

/// Servo output on TIM2 channel 1, one tick per microsecond.
pub struct ServoPwm {
    tim: Timer<TIM2>,
    timing: PwmTiming,
}

impl ServoPwm {
    /// Sets up TIM2 so that `period_us` ticks make one servo frame.
    pub fn new(tim2: TIM2, clock_cfg: &Clocks, period_us: u16) -> Result<Self, TimingError> {
        let timing = PwmTiming::new(clock_cfg.apb1_timer(), period_us)?;

        // The frequency passed here is overridden by the explicit divisor and wrap below
        let mut timer = Timer::new_tim2(tim2, timing.frequency_hz() as f32, timer_config(), clock_cfg);
        timer.set_prescaler(timing.prescaler());
        timer.set_auto_reload(timing.auto_reload());
        timer.reinitialize();

        defmt::debug!(
            "PWM: servo divisor {}, wrap {} ({} Hz)",
            timing.divisor(),
            timing.wrap(),
            timing.frequency_hz()
        );

        Ok(ServoPwm { tim: timer, timing })
    }

    /// Routes the pin to the timer and starts it with the output held low.
    pub fn begin(&mut self) {
        self.tim
            .enable_pwm_output(TimChannel::C1, OutputCompare::Pwm1, 0.0);
        self.tim.set_duty(TimChannel::C1, 0);

        pinout::servo::PWM.init();
        self.tim.enable();
    }

    pub fn timing(&self) -> PwmTiming {
        self.timing
    }
}

impl LevelSink for ServoPwm {
    fn set_level(&mut self, ticks: u16) {
        let level = self.timing.clamp_level(ticks);
        self.tim.set_duty(TimChannel::C1, level as u32);
    }
}

/// Indicator LED on TIM15 channel 1.
///
/// The LED is lit while the pin is low, so the channel runs in PWM mode 2 and a
/// higher level means a brighter LED.
pub struct IndicatorPwm {
    tim: Timer<TIM15>,
    timing: PwmTiming,
}

impl IndicatorPwm {
    pub fn new(tim15: TIM15, clock_cfg: &Clocks, wrap: u16) -> Result<Self, TimingError> {
        let timing = PwmTiming::new(clock_cfg.apb2_timer(), wrap)?;

        let mut timer = Timer::new_tim15(tim15, timing.frequency_hz() as f32, timer_config(), clock_cfg);
        timer.set_prescaler(timing.prescaler());
        timer.set_auto_reload(timing.auto_reload());
        timer.reinitialize();

        defmt::debug!(
            "PWM: indicator divisor {}, wrap {} ({} Hz)",
            timing.divisor(),
            timing.wrap(),
            timing.frequency_hz()
        );

        Ok(IndicatorPwm { tim: timer, timing })
    }

    /// Routes the pin to the timer and starts it with the LED dark.
    pub fn begin(&mut self) {
        self.tim
            .enable_pwm_output(TimChannel::C1, OutputCompare::Pwm2, 0.0);
        self.tim.set_duty(TimChannel::C1, 0);

        // TIM15 has a break unit: OC1 stays off until the main output enable is set
        unsafe { (*pac::TIM15::ptr()).bdtr.modify(|_, w| w.moe().set_bit()) };

        pinout::led::GRN_PWM.init();
        self.tim.enable();
    }

    pub fn timing(&self) -> PwmTiming {
        self.timing
    }
}

impl LevelSink for IndicatorPwm {
    fn set_level(&mut self, ticks: u16) {
        let level = self.timing.clamp_level(ticks);
        self.tim.set_duty(TimChannel::C1, level);
    }
}
