//! A convenience wrapper over the `Driver` that names the target's
//! registers and data stack, and loads programs.  The target offers no
//! direct write path into program memory, so `Cpu` writes each word by
//! pushing a value and an address and then dispatching the target's own
//! store instruction.
use core::ops::DerefMut;

use crate::driver::{Driver, Error, Opcode, Register};
use crate::lines::Lines;

/// The target's store instruction: pops an address, then a value, and
/// writes the value into program memory at that address.
pub const STORE_OPCODE: Opcode = Opcode(b'!');

pub struct Cpu<T> {
    pub drv: Driver<T>,
}

impl<T, U> Cpu<T>
    where T: DerefMut<Target=U>,
          U: Lines + ?Sized
{
    /// Create a handle using an existing `Driver`
    pub fn new(drv: Driver<T>) -> Self {
        Self {
            drv,
        }
    }

    /// Read the value on top of the data stack
    pub fn read_stack_top(&mut self) -> u8 {
        self.drv.read_reg(Register::StackTop)
    }

    /// Push `value` onto the data stack.  The target defines a write to the
    /// stack-top register as a push, not an overwrite.
    pub fn push(&mut self, value: u8) -> Result<(), Error> {
        self.drv.ensure_stopped()?;
        self.drv.write_reg(Register::StackTop, value);
        Ok(())
    }

    /// Read the program counter
    pub fn read_pc(&mut self) -> u8 {
        self.drv.read_reg(Register::ProgramCounter)
    }

    /// Set the program counter
    pub fn set_pc(&mut self, value: u8) {
        self.drv.write_reg(Register::ProgramCounter, value)
    }

    /// Read the stack pointer
    pub fn read_sp(&mut self) -> u8 {
        self.drv.read_reg(Register::StackPointer)
    }

    /// Set the stack pointer
    pub fn set_sp(&mut self, value: u8) {
        self.drv.write_reg(Register::StackPointer, value)
    }

    /// Inspect an arbitrary stack slot by repointing the stack pointer at
    /// it and reading the stack top.  Clobbers the stack pointer.
    pub fn peek_at(&mut self, index: u8) -> u8 {
        self.set_sp(index);
        self.read_stack_top()
    }

    /// Write one word into program memory by driving the target through a
    /// store instruction: push the value, push the address, dispatch the
    /// store opcode.
    pub fn write_word(&mut self, address: u8, value: u8) -> Result<(), Error> {
        self.push(value)?;
        self.push(address)?;
        self.drv.dispatch(STORE_OPCODE)
    }

    /// Load `opcodes` into program memory at `base`, one word at a time in
    /// ascending address order.  The target is back in its stopped state
    /// between words.
    pub fn load_program(&mut self, opcodes: &[u8], base: u8) -> Result<(), Error> {
        for (index, &opcode) in opcodes.iter().enumerate() {
            let address = usize::from(base) + index;
            let address = u8::try_from(address)
                .map_err(|_| Error::ValueOutOfRange(address as u32))?;
            self.write_word(address, opcode)?;
        }
        Ok(())
    }
}
