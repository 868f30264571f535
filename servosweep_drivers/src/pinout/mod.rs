use hal::gpio::{Pin, PinMode, Port};

pub mod led;
pub mod servo;

/// Represents the definition of a GPIO pin.
pub struct PinDef {
    /// The port to which the pin belongs (e.g., Port::A, Port::B).
    port: Port,
    /// The pin number within the port.
    pin: u8,
    /// The mode of the pin (e.g., Output, Input, Alternate function).
    mode: PinMode,
}

impl PinDef {
    /// Configures the pin and returns it. Useful for predefined pin configurations.
    /// # Example
    /// ```ignore
    /// let mut led_red = led::RED.init();
    /// led_red.set_high();
    /// ```
    pub fn init(&self) -> Pin {
        Pin::new(self.port, self.pin, self.mode)
    }
}
