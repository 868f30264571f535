//! Servo signal output.
use super::PinDef;
use super::{PinMode, Port};

/// Servo control line, TIM2_CH1
pub const PWM: PinDef = PinDef {
    port: Port::A,
    pin: 0,
    mode: PinMode::Alt(1),
};
