#![no_main]
#![no_std]

use cortex_m::delay::Delay;
use cortex_m_rt::entry;

use defmt_rtt as _;
use panic_probe as _;

use hal::{self, clocks::Clocks, pac};

use servosweep_algo::{config, DemoConfig, ServoDemo};
use servosweep_drivers::{
    delay::SysPause,
    pinout,
    pwm::{IndicatorPwm, ServoPwm},
};

/// Boards without a PWM capable indicator pin set this to false, the servo runs alone then
const INDICATOR_PWM: bool = true;

#[entry]
fn main() -> ! {
    // Set up CPU peripherals
    let cp = cortex_m::Peripherals::take().unwrap();
    // Set up microcontroller peripherals
    let dp = pac::Peripherals::take().unwrap();

    let clock_cfg = Clocks::default();
    clock_cfg.setup().unwrap();
    defmt::debug!("SYSTEM: Clock frequency is {} MHz", clock_cfg.sysclk() / 1_000_000);

    // Red and blue stay dark, green is the indicator
    pinout::led::RED.init().set_high();
    pinout::led::BLU.init().set_high();

    let demo_cfg = DemoConfig::default();

    // 1 tick = 1 us, 20000 us frame = 50 Hz
    let mut servo = ServoPwm::new(dp.TIM2, &clock_cfg, config::SERVO_PERIOD_US).unwrap();
    servo.begin();

    // 1 tick = 1 us, 1000 us period = 1 kHz
    let indicator = if INDICATOR_PWM {
        let mut led = IndicatorPwm::new(dp.TIM15, &clock_cfg, demo_cfg.indicator_wrap()).unwrap();
        led.begin();
        Some(led)
    } else {
        None
    };

    let pause = SysPause::new(Delay::new(cp.SYST, clock_cfg.systick()));

    let mut demo = ServoDemo::new(demo_cfg, servo, indicator, pause);
    demo.run()
}

// same panicking *behavior* as `panic-probe` but doesn't print a panic message
// this prevents the panic message being printed *twice* when `defmt::panic` is invoked
#[defmt::panic_handler]
fn panic() -> ! {
    cortex_m::asm::udf()
}
