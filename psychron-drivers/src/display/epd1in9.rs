//! 1.9" segment e-ink panel driver (I2C)
//!
//! The panel exposes 92 segments through a 120-segment driver IC and is
//! addressed over two fixed I2C addresses: single-byte commands go to
//! one, frame data bytes to the other. A refresh cycle is:
//!
//! 1. Leave sleep, power the high-voltage rail
//! 2. Load the 15-byte segment frame plus a screen-select byte into RAM
//! 3. Trigger the refresh and poll the busy line (low while working)
//! 4. Power down and re-enter sleep
//!
//! Which waveform the refresh uses is a separate, sticky selection: the
//! GC waveform redraws everything (slow, clears ghosting), the DU
//! waveform only drives changed segments (fast), and the 5S waveform is
//! the boot/blanking waveform. Cold panels additionally need a longer
//! frame time, configured through the frame-time compensation sequence.

use psychron_core::encode::{self, DisplayState, Region, Unit};
use psychron_core::frame::SegmentFrame;
use psychron_core::state::{Phase, PhaseEvent, RefreshMode};
use psychron_hal::{DelayUs, I2cBus, InputPin, OutputPin};

/// Command interface I2C address
pub const ADDR_COMMAND: u8 = 0x3C;
/// Data interface I2C address
pub const ADDR_DATA: u8 = 0x3D;

/// Panel command set
///
/// Single-byte commands written to the command address.
mod cmd {
    /// Power on the high-voltage rail
    pub const POWER_ON: u8 = 0x2B;
    /// Power off the high-voltage rail
    pub const POWER_OFF: u8 = 0x28;
    /// Enable the booster
    pub const BOOST: u8 = 0xA7;
    /// Enable the internal temperature sensor
    pub const TSON: u8 = 0xE0;
    /// Leave sleep mode
    pub const SLEEP_OFF: u8 = 0xAC;
    /// Enter deep sleep
    pub const SLEEP_IN: u8 = 0xAD;
    /// Set the RAM write address
    pub const WRITE_RAM: u8 = 0x40;
    /// Open the first SRAM bank
    pub const SRAM1_ON: u8 = 0xA9;
    /// Close the first SRAM bank
    pub const SRAM1_OFF: u8 = 0xA8;
    /// Open the second SRAM bank
    pub const SRAM2_ON: u8 = 0xAB;
    /// Close the second SRAM bank
    pub const SRAM2_OFF: u8 = 0xAA;
    /// Start the refresh
    pub const DISPLAY_ON: u8 = 0xAF;
    /// Stop driving the panel
    pub const DISPLAY_OFF: u8 = 0xAE;
    /// Frame-time value follows in the next command byte
    pub const FRAME_TIME: u8 = 0xE7;
    /// Power trim for panels below 10 °C
    pub const POWER_TRIM_COLD: u8 = 0x7E;
    /// Power trim for panels at or above 10 °C
    pub const POWER_TRIM_WARM: u8 = 0x7B;
    /// Trim sequence tail, first byte
    pub const TRIM_1: u8 = 0x81;
    /// Trim sequence tail, second byte
    pub const TRIM_2: u8 = 0xB4;
}

/// Waveform (LUT) command sequences, 7 bytes each
mod lut {
    /// DU waveform: drives only changed segments
    pub const DU: [u8; 7] = [0x82, 0x80, 0x00, 0xC0, 0x80, 0x80, 0x62];
    /// GC waveform: complete redraw
    pub const GC: [u8; 7] = [0x82, 0x20, 0x00, 0xA0, 0x80, 0x40, 0x63];
    /// 5S waveform: boot/blanking, strongest ghosting suppression
    pub const S5: [u8; 7] = [0x82, 0x28, 0x20, 0xA8, 0xA0, 0x50, 0x65];
}

/// Screen-select data byte trailing the frame: render the frame as sent
const SCREEN_WHITE: u8 = 0x00;
/// Screen-select data byte: drive the inverse plane (used when flashing
/// the panel black during the ghosting-removal cycle)
const SCREEN_BLACK: u8 = 0x03;

/// Errors from the display controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError<E> {
    /// Underlying bus transfer failed
    Bus(E),
    /// Busy line never deasserted during init - panel disconnected or
    /// miswired
    InitTimeout,
    /// Busy line never deasserted after a refresh; the controller stays
    /// usable and the caller may retry
    RefreshTimeout,
    /// Value outside the displayable range
    OutOfRange,
}

impl<E> From<encode::EncodeError> for DisplayError<E> {
    fn from(e: encode::EncodeError) -> Self {
        match e {
            encode::EncodeError::OutOfRange => DisplayError::OutOfRange,
        }
    }
}

/// Waveform currently loaded into the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Waveform {
    Du,
    Gc,
    S5,
}

impl Waveform {
    fn sequence(self) -> &'static [u8; 7] {
        match self {
            Waveform::Du => &lut::DU,
            Waveform::Gc => &lut::GC,
            Waveform::S5 => &lut::S5,
        }
    }

    fn for_mode(mode: RefreshMode) -> Self {
        match mode {
            RefreshMode::Full => Waveform::Gc,
            RefreshMode::Partial => Waveform::Du,
        }
    }
}

/// Frame-time compensation band
///
/// E-ink switches slower in the cold; the panel's frame time has to be
/// stretched accordingly. Bands follow the vendor's table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameTimeBand {
    Below5,
    Below10,
    Below15,
    Below20,
    Warm,
}

impl FrameTimeBand {
    fn for_temperature(x10: i16) -> Self {
        if x10 < 50 {
            FrameTimeBand::Below5
        } else if x10 < 100 {
            FrameTimeBand::Below10
        } else if x10 < 150 {
            FrameTimeBand::Below15
        } else if x10 < 200 {
            FrameTimeBand::Below20
        } else {
            FrameTimeBand::Warm
        }
    }

    fn power_trim(self) -> u8 {
        match self {
            FrameTimeBand::Below5 | FrameTimeBand::Below10 => cmd::POWER_TRIM_COLD,
            _ => cmd::POWER_TRIM_WARM,
        }
    }

    /// Frame-time command argument; the panel runs (n+1) × 20 ms frames
    fn frame_time(self) -> u8 {
        match self {
            FrameTimeBand::Below5 => 0x31,  // 1000 ms
            FrameTimeBand::Below10 => 0x22, // 700 ms
            FrameTimeBand::Below15 => 0x18, // 500 ms
            FrameTimeBand::Below20 => 0x13, // 400 ms
            FrameTimeBand::Warm => 0x0E,    // 300 ms
        }
    }
}

/// Display controller configuration
///
/// Defaults carry the vendor addresses and timings; override them only
/// for unusual wiring or to tighten test timeouts.
#[derive(Debug, Clone)]
pub struct Epd1in9Config {
    /// Command interface I2C address
    pub command_address: u8,
    /// Data interface I2C address
    pub data_address: u8,
    /// Duration of each high phase of the reset pulse in ms
    pub reset_high_ms: u32,
    /// Duration of the low phase of the reset pulse in ms
    pub reset_low_ms: u32,
    /// Settle time after the reset pulse in ms
    pub settle_ms: u32,
    /// Pause after every command/data byte in µs
    pub write_gap_us: u32,
    /// Busy-line polling interval in µs
    pub busy_poll_us: u32,
    /// Bound on busy-waits during init in ms
    pub init_timeout_ms: u32,
    /// Bound on busy-waits during refresh and sleep in ms
    pub refresh_timeout_ms: u32,
}

impl Default for Epd1in9Config {
    fn default() -> Self {
        Self {
            command_address: ADDR_COMMAND,
            data_address: ADDR_DATA,
            reset_high_ms: 200,
            reset_low_ms: 20,
            settle_ms: 100,
            write_gap_us: 1_000,
            busy_poll_us: 1_000,
            init_timeout_ms: 500,
            refresh_timeout_ms: 3_000,
        }
    }
}

/// 1.9" segment e-ink display controller
///
/// Owns the display state and sequences every hardware interaction. The
/// bus, pins, and delay are borrowed capabilities handed over at
/// construction; [`release`](Self::release) gives them back. The
/// controller is not internally synchronized - a multithreaded host
/// must wrap it in its own lock.
///
/// Call [`init`](Self::init) once after power-on before the first
/// refresh operation.
pub struct Epd1in9<I2C, RST, BUSY, D> {
    i2c: I2C,
    rst: RST,
    busy: BUSY,
    delay: D,
    config: Epd1in9Config,
    state: DisplayState,
    mode: RefreshMode,
    phase: Phase,
    applied_waveform: Option<Waveform>,
    applied_band: Option<FrameTimeBand>,
}

impl<I2C, RST, BUSY, D> Epd1in9<I2C, RST, BUSY, D>
where
    I2C: I2cBus,
    RST: OutputPin,
    BUSY: InputPin,
    D: DelayUs,
{
    /// Create a controller with the vendor default configuration
    pub fn new(i2c: I2C, rst: RST, busy: BUSY, delay: D) -> Self {
        Self::with_config(i2c, rst, busy, delay, Epd1in9Config::default())
    }

    /// Create a controller with an explicit configuration
    pub fn with_config(i2c: I2C, rst: RST, busy: BUSY, delay: D, config: Epd1in9Config) -> Self {
        Self {
            i2c,
            rst,
            busy,
            delay,
            config,
            state: DisplayState::default(),
            mode: RefreshMode::default(),
            phase: Phase::default(),
            applied_waveform: None,
            applied_band: None,
        }
    }

    /// Hand back the borrowed bus, pins, and delay
    pub fn release(self) -> (I2C, RST, BUSY, D) {
        (self.i2c, self.rst, self.busy, self.delay)
    }

    /// Perform the power-on handshake
    ///
    /// Drives the reset pulse, powers the panel, configures the frame
    /// time for the ambient temperature (20 °C is assumed until the
    /// first reading is stored), and loads the waveform for the
    /// configured refresh mode. Fails with
    /// [`DisplayError::InitTimeout`] if the busy line never deasserts
    /// within the configured bound.
    pub fn init(&mut self) -> Result<(), DisplayError<I2C::Error>> {
        self.reset();
        self.delay.delay_ms(self.config.settle_ms);

        self.command(cmd::POWER_ON)?;
        self.delay.delay_ms(10);
        self.command(cmd::BOOST)?;
        self.command(cmd::TSON)?;
        self.delay.delay_ms(10);

        let band = FrameTimeBand::for_temperature(self.state.temperature_x10.unwrap_or(200));
        self.apply_frame_time(band, self.config.init_timeout_ms, DisplayError::InitTimeout)?;

        self.apply_waveform(Waveform::for_mode(self.mode))?;

        if !self.wait_for_idle(self.config.init_timeout_ms) {
            return Err(DisplayError::InitTimeout);
        }
        self.phase = self.phase.transition(PhaseEvent::InitComplete);
        Ok(())
    }

    /// Drive the vendor reset pulse on the reset line
    pub fn reset(&mut self) {
        self.rst.set_high();
        self.delay.delay_ms(self.config.reset_high_ms);
        self.rst.set_low();
        self.delay.delay_ms(self.config.reset_low_ms);
        self.rst.set_high();
        self.delay.delay_ms(self.config.reset_high_ms);
    }

    /// Select the refresh mode for subsequent updates
    ///
    /// Takes effect on the next [`update`](Self::update); no hardware
    /// access happens here.
    pub fn update_mode(&mut self, full: bool) {
        self.mode = if full {
            RefreshMode::Full
        } else {
            RefreshMode::Partial
        };
    }

    /// Currently configured refresh mode
    pub fn refresh_mode(&self) -> RefreshMode {
        self.mode
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Stored display state
    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    /// Store a temperature reading for the next update
    ///
    /// Rejects values outside −99.9..=199.9 after rounding to tenths;
    /// the stored state is unchanged on rejection. No hardware access.
    pub fn set_temperature(&mut self, value: f32) -> Result<(), DisplayError<I2C::Error>> {
        let x10 = encode::temperature_x10(value)?;
        self.state.temperature_x10 = Some(x10);
        self.state.temperature_fault = false;
        Ok(())
    }

    /// Store a humidity reading for the next update
    ///
    /// Rejects values outside 0.0..=99.9 after rounding to tenths; the
    /// stored state is unchanged on rejection. No hardware access.
    pub fn set_humidity(&mut self, value: f32) -> Result<(), DisplayError<I2C::Error>> {
        let x10 = encode::humidity_x10(value)?;
        self.state.humidity_x10 = Some(x10);
        self.state.humidity_fault = false;
        Ok(())
    }

    /// Select the unit glyph rendered beside the temperature
    pub fn set_unit(&mut self, unit: Unit) {
        self.state.unit = unit;
    }

    /// Show or hide the Bluetooth icon
    pub fn show_bluetooth(&mut self, visible: bool) {
        self.state.icons.bluetooth = visible;
    }

    /// Show or hide the power icon
    pub fn show_power(&mut self, visible: bool) {
        self.state.icons.power = visible;
    }

    /// Replace a region's digits with `Err` on the next update
    ///
    /// For surfacing a failed sensor read on the panel. Cleared by the
    /// next successful [`set_temperature`](Self::set_temperature) /
    /// [`set_humidity`](Self::set_humidity) for that region.
    pub fn show_error(&mut self, region: Region) {
        match region {
            Region::Temperature => self.state.temperature_fault = true,
            Region::Humidity => self.state.humidity_fault = true,
        }
    }

    /// Encode the current state and refresh the panel
    ///
    /// Re-issues frame-time compensation if the stored reading moved
    /// into a new band, reloads the waveform if the configured mode's
    /// one is not on the panel, then transfers the frame and runs one
    /// refresh cycle. Fails with [`DisplayError::Bus`] if a write
    /// fails and [`DisplayError::RefreshTimeout`] if the busy line
    /// never deasserts; after either, the controller is ready for a
    /// retry.
    pub fn update(&mut self) -> Result<(), DisplayError<I2C::Error>> {
        let frame = encode::encode(&self.state)?;

        if let Some(t) = self.state.temperature_x10 {
            let band = FrameTimeBand::for_temperature(t);
            if self.applied_band != Some(band) {
                self.apply_frame_time(
                    band,
                    self.config.refresh_timeout_ms,
                    DisplayError::RefreshTimeout,
                )?;
            }
        }

        let wanted = Waveform::for_mode(self.mode);
        if self.applied_waveform != Some(wanted) {
            self.apply_waveform(wanted)?;
        }

        self.transfer(&frame, SCREEN_WHITE)
    }

    /// Blank the panel
    ///
    /// Runs the boot waveform - a full refresh regardless of the
    /// configured mode - with an all-zero frame. The configured mode's
    /// waveform is reloaded automatically on the next update. The
    /// stored display state is untouched.
    pub fn clear(&mut self) -> Result<(), DisplayError<I2C::Error>> {
        self.apply_waveform(Waveform::S5)?;
        self.transfer(&SegmentFrame::new(), SCREEN_WHITE)?;
        self.delay.delay_ms(100);
        Ok(())
    }

    /// Ghosting-removal cycle
    ///
    /// Flashes every segment black with the GC waveform, then blanks
    /// the panel. Noticeably slow; run it occasionally, not per update.
    pub fn clean(&mut self) -> Result<(), DisplayError<I2C::Error>> {
        self.apply_waveform(Waveform::Gc)?;
        self.transfer(&SegmentFrame::filled(0xFF), SCREEN_BLACK)?;
        self.delay.delay_ms(1_000);
        self.transfer(&SegmentFrame::new(), SCREEN_WHITE)?;
        self.delay.delay_ms(100);
        Ok(())
    }

    /// Power down into deep sleep
    ///
    /// The panel keeps its segments. The next [`update`](Self::update)
    /// wakes it again; no re-init is needed.
    pub fn sleep(&mut self) -> Result<(), DisplayError<I2C::Error>> {
        self.command(cmd::POWER_OFF)?;
        if !self.wait_for_idle(self.config.refresh_timeout_ms) {
            return Err(DisplayError::RefreshTimeout);
        }
        self.command(cmd::SLEEP_IN)?;
        Ok(())
    }

    /// Push a frame to panel RAM and run one refresh cycle
    fn transfer(
        &mut self,
        frame: &SegmentFrame,
        screen: u8,
    ) -> Result<(), DisplayError<I2C::Error>> {
        self.phase = self.phase.transition(PhaseEvent::RefreshStarted);
        let result = self.run_refresh(frame, screen);
        self.phase = self.phase.transition(PhaseEvent::RefreshFinished);
        result
    }

    fn run_refresh(
        &mut self,
        frame: &SegmentFrame,
        screen: u8,
    ) -> Result<(), DisplayError<I2C::Error>> {
        self.command(cmd::SLEEP_OFF)?;
        self.command(cmd::POWER_ON)?;
        self.command(cmd::WRITE_RAM)?;
        self.command(cmd::SRAM1_ON)?;
        self.command(cmd::SRAM1_OFF)?;

        for &byte in frame.as_bytes() {
            self.data(byte)?;
        }
        self.data(screen)?;

        self.command(cmd::SRAM2_ON)?;
        self.command(cmd::SRAM2_OFF)?;
        self.command(cmd::DISPLAY_ON)?;

        if !self.wait_for_idle(self.config.refresh_timeout_ms) {
            return Err(DisplayError::RefreshTimeout);
        }

        self.command(cmd::DISPLAY_OFF)?;
        self.command(cmd::POWER_OFF)?;
        self.command(cmd::SLEEP_IN)?;
        Ok(())
    }

    /// Issue the frame-time compensation sequence for a band
    fn apply_frame_time(
        &mut self,
        band: FrameTimeBand,
        timeout_ms: u32,
        on_timeout: DisplayError<I2C::Error>,
    ) -> Result<(), DisplayError<I2C::Error>> {
        self.command(band.power_trim())?;
        self.command(cmd::TRIM_1)?;
        self.command(cmd::TRIM_2)?;
        if !self.wait_for_idle(timeout_ms) {
            return Err(on_timeout);
        }
        self.command(cmd::FRAME_TIME)?;
        self.command(band.frame_time())?;
        self.applied_band = Some(band);
        Ok(())
    }

    /// Send a waveform sequence and remember it as loaded
    fn apply_waveform(&mut self, waveform: Waveform) -> Result<(), DisplayError<I2C::Error>> {
        for &byte in waveform.sequence() {
            self.command(byte)?;
        }
        self.applied_waveform = Some(waveform);
        Ok(())
    }

    /// Write a single command byte
    fn command(&mut self, byte: u8) -> Result<(), DisplayError<I2C::Error>> {
        self.i2c
            .write(self.config.command_address, &[byte])
            .map_err(DisplayError::Bus)?;
        self.delay.delay_us(self.config.write_gap_us);
        Ok(())
    }

    /// Write a single data byte
    fn data(&mut self, byte: u8) -> Result<(), DisplayError<I2C::Error>> {
        self.i2c
            .write(self.config.data_address, &[byte])
            .map_err(DisplayError::Bus)?;
        self.delay.delay_us(self.config.write_gap_us);
        Ok(())
    }

    /// Poll the busy line until idle or until `bound_ms` elapses
    ///
    /// The line reads low while the panel works. Returns `true` if the
    /// panel went idle within the bound.
    fn wait_for_idle(&mut self, bound_ms: u32) -> bool {
        let bound_us = bound_ms.saturating_mul(1_000);
        let mut waited_us: u32 = 0;
        while self.busy.is_low() {
            if waited_us >= bound_us {
                return false;
            }
            self.delay.delay_us(self.config.busy_poll_us);
            waited_us = waited_us.saturating_add(self.config.busy_poll_us);
        }
        // Margin after the line releases
        self.delay.delay_ms(10);
        true
    }
}
