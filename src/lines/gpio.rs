use embedded_hal::{delay::DelayNs, digital::{InputPin, OutputPin, PinState}};

use crate::lines::{Input, Lines, Output};

/// Bit-bang the target's signal lines over individual GPIO pins.  The seven
/// control lines and the clock are push-pull outputs; the two status lines
/// are inputs.
pub struct Gpio<O, I, D> where O: OutputPin, I: InputPin, D: DelayNs {
    half_period: u32,
    delay: D,
    clock: O,
    run: O,
    step: O,
    load: O,
    dump: O,
    shift_in: O,
    select0: O,
    select1: O,
    status: I,
    shift_out: I,
}

impl<O, I, D> Gpio<O, I, D> where O: OutputPin, I: InputPin, D: DelayNs {
    pub fn new(freq_khz: u32, clock: O, run: O, step: O, load: O, dump: O,
               shift_in: O, select0: O, select1: O, status: I, shift_out: I,
               delay: D) -> Gpio<O, I, D> {
        let period_ns = 1_000_000 / freq_khz;
        let half_period = period_ns / 2;
        Gpio {
            half_period,
            delay,
            clock,
            run,
            step,
            load,
            dump,
            shift_in,
            select0,
            select1,
            status,
            shift_out,
        }
    }
}

impl<O, I, D> Lines for Gpio<O, I, D> where O: OutputPin, I: InputPin, D: DelayNs {
    fn set(&mut self, line: Input, level: bool) {
        let pin = match line {
            Input::Run => &mut self.run,
            Input::Step => &mut self.step,
            Input::Load => &mut self.load,
            Input::Dump => &mut self.dump,
            Input::ShiftIn => &mut self.shift_in,
            Input::Select0 => &mut self.select0,
            Input::Select1 => &mut self.select1,
        };
        pin.set_state(PinState::from(level)).unwrap();
    }

    fn get(&mut self, line: Output) -> bool {
        let pin = match line {
            Output::Status => &mut self.status,
            Output::ShiftOut => &mut self.shift_out,
        };
        pin.is_high().unwrap()
    }

    fn advance(&mut self) {
        // clock starts low
        self.clock.set_high().unwrap();
        self.delay.delay_ns(self.half_period);
        self.clock.set_low().unwrap();
        self.delay.delay_ns(self.half_period);
    }
}
