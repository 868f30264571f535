#![no_std]

//! STM32G4 side of the servo sweep demo: pin assignments, the two PWM
//! channels and the blocking delay used between frames.

pub mod delay;
pub mod pinout;
pub mod pwm;
