//! Implement the `Lines` trait for FT2232H-based adapters in MPSSE mode.
//! The control lines and the clock are driven on the low-byte GPIO pins;
//! the status lines are read back on the high-byte GPIO pins.
use crate::lines::{Input, Lines, Output};

use libftd2xx::{Ft2232h, Ftdi, FtdiMpsse, MpsseCmdBuilder, MpsseCmdExecutor};

// Lower pins
const PIN_CLK: u8 = 1;
const PIN_RUN: u8 = 1 << 1;
const PIN_STEP: u8 = 1 << 2;
const PIN_LOAD: u8 = 1 << 3;
const PIN_DUMP: u8 = 1 << 4;
const PIN_SHIFT_IN: u8 = 1 << 5;
const PIN_SELECT0: u8 = 1 << 6;
const PIN_SELECT1: u8 = 1 << 7;
const LOWER_OUTPUT_PINS: u8 = 0xff;

// Upper pins, all inputs
const PIN_STATUS: u8 = 1;
const PIN_SHIFT_OUT: u8 = 1 << 1;

pub struct Mpsse<T> {
    ft: T,
    // Shadow of the low-byte pin levels so single-line updates don't
    // disturb their neighbors
    low: u8,
}

impl<T: FtdiMpsse + MpsseCmdExecutor> Mpsse<T>
    where <T as MpsseCmdExecutor>::Error: std::fmt::Debug
{
    pub fn new(mut ft: T, clock: u32) -> Self {
        ft.initialize_mpsse_default().expect("init");
        ft.set_clock(clock).expect("set clock");

        let builder = MpsseCmdBuilder::new()
            .set_gpio_lower(0, LOWER_OUTPUT_PINS)
            .set_gpio_upper(0, 0);
        ft.send(builder.as_slice()).expect("send");

        Self {
            ft,
            low: 0,
        }
    }

    fn line_mask(line: Input) -> u8 {
        match line {
            Input::Run => PIN_RUN,
            Input::Step => PIN_STEP,
            Input::Load => PIN_LOAD,
            Input::Dump => PIN_DUMP,
            Input::ShiftIn => PIN_SHIFT_IN,
            Input::Select0 => PIN_SELECT0,
            Input::Select1 => PIN_SELECT1,
        }
    }
}

impl Mpsse<Ft2232h> {
    /// Open an FT2232H by its USB description string.  FT2232-based
    /// adapters have both an "A" interface and a "B" interface; pass the
    /// description of the one wired to the target.
    pub fn open(description: &str, clock: u32) -> Self {
        let ft = Ftdi::with_description(description).expect("new");
        let ft = Ft2232h::try_from(ft).expect("try");
        Mpsse::new(ft, clock)
    }
}

impl<T: FtdiMpsse + MpsseCmdExecutor> Lines for Mpsse<T>
    where <T as MpsseCmdExecutor>::Error: std::fmt::Debug
{
    fn set(&mut self, line: Input, level: bool) {
        let mask = Self::line_mask(line);
        if level {
            self.low |= mask;
        } else {
            self.low &= !mask;
        }
        let builder = MpsseCmdBuilder::new()
            .set_gpio_lower(self.low, LOWER_OUTPUT_PINS);
        self.ft.send(builder.as_slice()).expect("send");
    }

    fn get(&mut self, line: Output) -> bool {
        let builder = MpsseCmdBuilder::new()
            .gpio_upper()
            .send_immediate();
        let mut buf = [0; 1];
        self.ft.xfer(builder.as_slice(), &mut buf).expect("xfer");
        let mask = match line {
            Output::Status => PIN_STATUS,
            Output::ShiftOut => PIN_SHIFT_OUT,
        };
        buf[0] & mask != 0
    }

    fn advance(&mut self) {
        let builder = MpsseCmdBuilder::new()
            .set_gpio_lower(self.low | PIN_CLK, LOWER_OUTPUT_PINS)
            .set_gpio_lower(self.low, LOWER_OUTPUT_PINS);
        self.ft.send(builder.as_slice()).expect("send");
    }
}
