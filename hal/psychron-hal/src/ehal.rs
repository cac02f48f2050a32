//! Adapters for `embedded-hal` 1.0 implementations
//!
//! Wraps ecosystem HAL types so they satisfy this crate's traits. Pin
//! adapters require infallible pins, which is what on-chip GPIO provides
//! on every supported platform; a pin behind a fallible I/O expander
//! needs its own [`OutputPin`]/[`InputPin`] implementation instead.

use core::convert::Infallible;

use crate::delay::DelayUs;
use crate::gpio::{InputPin, OutputPin};
use crate::i2c::I2cBus;

/// [`I2cBus`] adapter over an `embedded_hal::i2c::I2c` implementation
pub struct EhalI2c<T>(pub T);

impl<T: embedded_hal::i2c::I2c> I2cBus for EhalI2c<T> {
    type Error = T::Error;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.0.write(address, data)
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.0.read(address, buf)
    }
}

/// [`OutputPin`] adapter over an infallible `embedded_hal` output pin
pub struct EhalOutputPin<P>(pub P);

impl<P> OutputPin for EhalOutputPin<P>
where
    P: embedded_hal::digital::OutputPin<Error = Infallible>,
{
    fn set_high(&mut self) {
        let _ = self.0.set_high();
    }

    fn set_low(&mut self) {
        let _ = self.0.set_low();
    }
}

/// [`InputPin`] adapter over an infallible `embedded_hal` input pin
pub struct EhalInputPin<P>(pub P);

impl<P> InputPin for EhalInputPin<P>
where
    P: embedded_hal::digital::InputPin<Error = Infallible>,
{
    fn is_high(&mut self) -> bool {
        match self.0.is_high() {
            Ok(level) => level,
            Err(e) => match e {},
        }
    }
}

/// [`DelayUs`] adapter over an `embedded_hal::delay::DelayNs` implementation
pub struct EhalDelay<D>(pub D);

impl<D: embedded_hal::delay::DelayNs> DelayUs for EhalDelay<D> {
    fn delay_us(&mut self, us: u32) {
        self.0.delay_us(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0.delay_ms(ms);
    }
}
