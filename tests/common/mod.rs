//! In-memory doubles standing in for the target circuit.

use cpu_probe::driver::Register;
use cpu_probe::lines::{Input, Lines, Output};

/// Behavioral model of the target: an 8-bit input shifter, the four
/// addressable registers, a data stack, and program memory that only the
/// store instruction can write.  Runs and injected instructions keep the
/// status line high for `busy_clocks` pulses.
pub struct SimTarget {
    run: bool,
    step: bool,
    load: bool,
    dump: bool,
    shift_in: bool,
    select0: bool,
    select1: bool,

    shreg: u8,
    out: u8,
    shift_out: bool,

    pub pc: u8,
    pub sp: u8,
    pub last_opcode: u8,
    pub stack: [u8; 256],
    pub progmem: [u8; 256],
    /// Each store instruction appends (address, value) here
    pub store_log: Vec<(u8, u8)>,

    busy: u32,
    pub busy_clocks: u32,
    /// When set, the status line never settles back to stopped
    pub stuck: bool,
    pub running_windows: u32,
    pub clocks: u32,
}

impl SimTarget {
    pub fn new() -> Self {
        SimTarget {
            run: false,
            step: false,
            load: false,
            dump: false,
            shift_in: false,
            select0: false,
            select1: false,
            shreg: 0,
            out: 0,
            shift_out: false,
            pc: 0,
            sp: 0,
            last_opcode: 0,
            stack: [0; 256],
            progmem: [0; 256],
            store_log: Vec::new(),
            busy: 0,
            busy_clocks: 4,
            stuck: false,
            running_windows: 0,
            clocks: 0,
        }
    }

    pub fn stuck() -> Self {
        let mut target = Self::new();
        target.stuck = true;
        target
    }

    fn selector(&self) -> u8 {
        u8::from(self.select0) | (u8::from(self.select1) << 1)
    }

    fn pop(&mut self) -> u8 {
        self.sp = self.sp.wrapping_sub(1);
        self.stack[usize::from(self.sp)]
    }

    fn exec(&mut self, opcode: u8) {
        if opcode == b'!' {
            let address = self.pop();
            let value = self.pop();
            self.progmem[usize::from(address)] = value;
            self.store_log.push((address, value));
        }
        self.busy = self.busy_clocks;
        self.running_windows += 1;
    }
}

impl Lines for SimTarget {
    fn set(&mut self, line: Input, level: bool) {
        match line {
            Input::Run => self.run = level,
            Input::Step => self.step = level,
            Input::Load => self.load = level,
            Input::Dump => self.dump = level,
            Input::ShiftIn => self.shift_in = level,
            Input::Select0 => self.select0 = level,
            Input::Select1 => self.select1 = level,
        }
    }

    fn get(&mut self, line: Output) -> bool {
        match line {
            Output::Status => self.stuck || self.busy > 0,
            Output::ShiftOut => self.shift_out,
        }
    }

    fn advance(&mut self) {
        self.clocks += 1;
        if self.busy > 0 && !self.stuck {
            self.busy -= 1;
        }

        if self.load {
            let value = self.shreg;
            match self.selector() {
                0 => self.pc = value,
                1 => self.sp = value,
                2 => {
                    self.last_opcode = value;
                    self.exec(value);
                }
                _ => {
                    self.stack[usize::from(self.sp)] = value;
                    self.sp = self.sp.wrapping_add(1);
                }
            }
        } else if self.dump {
            self.out = match self.selector() {
                0 => self.pc,
                1 => self.sp,
                2 => self.last_opcode,
                _ => self.stack[usize::from(self.sp.wrapping_sub(1))],
            };
        } else {
            self.shreg = (self.shreg << 1) | u8::from(self.shift_in);
            self.shift_out = self.out & 0x80 != 0;
            self.out <<= 1;
        }

        if self.run {
            self.busy = if self.step { 1 } else { self.busy_clocks };
            self.running_windows += 1;
        }
    }
}

/// Raw line activity as seen by a `Lines` implementation.
#[derive(Clone,PartialEq,Debug)]
pub enum Event {
    Set(Input, bool),
    Advance,
}

/// Records every line edge and clock pulse.  The status line reads a fixed
/// level; the shift-out line replays a scripted bit sequence.
pub struct RecordingLines {
    pub events: Vec<Event>,
    pub shift_out_bits: Vec<bool>,
    pub status: bool,
}

impl RecordingLines {
    pub fn new() -> Self {
        RecordingLines {
            events: Vec::new(),
            shift_out_bits: Vec::new(),
            status: false,
        }
    }
}

impl Lines for RecordingLines {
    fn set(&mut self, line: Input, level: bool) {
        self.events.push(Event::Set(line, level));
    }

    fn get(&mut self, line: Output) -> bool {
        match line {
            Output::Status => self.status,
            Output::ShiftOut => {
                if self.shift_out_bits.is_empty() {
                    false
                } else {
                    self.shift_out_bits.remove(0)
                }
            }
        }
    }

    fn advance(&mut self) {
        self.events.push(Event::Advance);
    }
}

/// Append the event sequence a register write drives onto the lines.
pub fn expect_write_reg(events: &mut Vec<Event>, reg: Register, value: u8) {
    for i in 0..8 {
        events.push(Event::Set(Input::ShiftIn, value & (0x80 >> i) != 0));
        events.push(Event::Advance);
    }
    events.push(Event::Set(Input::Select0, reg as u8 & 1 != 0));
    events.push(Event::Set(Input::Select1, reg as u8 & 2 != 0));
    events.push(Event::Set(Input::Load, true));
    events.push(Event::Advance);
    events.push(Event::Set(Input::Load, false));
    events.push(Event::Advance);
}
