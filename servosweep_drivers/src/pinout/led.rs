//! On-board RGB LED, all three cathodes are driven low to light up.
use super::PinDef;
use super::{PinMode, Port};

pub const RED: PinDef = PinDef {
    port: Port::B,
    pin: 15,
    mode: PinMode::Output,
};

/// Green doubles as the PWM indicator, TIM15_CH1
pub const GRN_PWM: PinDef = PinDef {
    port: Port::B,
    pin: 14,
    mode: PinMode::Alt(1),
};

pub const BLU: PinDef = PinDef {
    port: Port::B,
    pin: 13,
    mode: PinMode::Output,
};
