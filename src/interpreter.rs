//! The interpreter: registers, memory, call stack, timers, keypad and framebuffer,
//! and the fetch-decode-execute cycle over them.
//!
//! The interpreter never calls out to its collaborators. A host feeds it key
//! state, calls [`step`](Interpreter::step) at the instruction rate and
//! [`tick_timers`](Interpreter::tick_timers) at 60 Hz, and reads back the
//! [`framebuffer`](Interpreter::framebuffer) and
//! [`is_sound_active`](Interpreter::is_sound_active).

use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::display::Framebuffer;
use crate::error::ChipError;
use crate::font;
use crate::memory::{Memory, PROGRAM_START_ADDRESS};
use crate::opcodes::{Opcode, OpcodeWord};
use crate::registers::Registers;

const PROGRAM_COUNTER_INCREMENT: u16 = 0x2;
const LEAST_SIGNIFICANT_BIT_MASK: u8 = 0x1;
const MOST_SIGNIFICANT_BIT_MASK: u8 = 0x80;
pub const KEY_COUNT: usize = 16;
pub const STACK_DEPTH: usize = 16;

pub struct Interpreter {
    memory: Memory,
    registers: Registers,
    register_i: u16,
    program_counter: u16,
    stack: Vec<u16>,
    delay_timer: u8,
    sound_timer: u8,
    keys: [bool; KEY_COUNT],
    framebuffer: Framebuffer,
    rng: StdRng
}

impl Interpreter {
    /// Returns an interpreter in its power-on state with an entropy-seeded random source.
    #[must_use]
    pub fn new() -> Interpreter {
        Interpreter::with_rng(StdRng::from_entropy())
    }

    /// Returns an interpreter whose `CXNN` results are reproducible for a given `seed`.
    #[must_use]
    pub fn with_seed(seed: u64) -> Interpreter {
        Interpreter::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Interpreter {
        Interpreter {
            memory: Memory::new(),
            registers: Registers::new(),
            register_i: 0,
            program_counter: PROGRAM_START_ADDRESS,
            stack: Vec::with_capacity(STACK_DEPTH),
            delay_timer: 0,
            sound_timer: 0,
            keys: [false; KEY_COUNT],
            framebuffer: Framebuffer::new(),
            rng
        }
    }

    /// Returns everything except the random source to its power-on state.
    pub fn reset(&mut self) {
        debug!("Resetting interpreter");
        self.memory = Memory::new();
        self.registers = Registers::new();
        self.register_i = 0;
        self.program_counter = PROGRAM_START_ADDRESS;
        self.stack.clear();
        self.delay_timer = 0;
        self.sound_timer = 0;
        self.keys = [false; KEY_COUNT];
        self.framebuffer.clear();
    }

    /// Places `program` in memory at `0x200`.
    ///
    /// # Errors
    ///
    /// Returns `RomTooLarge` if the program is longer than 3584 bytes, in which case memory is untouched.
    pub fn load(&mut self, program: &[u8]) -> Result<(), ChipError> {
        self.memory.load_program(program)?;
        debug!("Loaded {} byte program", program.len());
        Ok(())
    }

    /// Returns to the power-on state with `program` at `0x200`.
    ///
    /// # Errors
    ///
    /// Returns `RomTooLarge` if the program is longer than 3584 bytes, in which case
    /// nothing is reset and the current program keeps its state.
    pub fn reload(&mut self, program: &[u8]) -> Result<(), ChipError> {
        let mut memory = Memory::new();
        memory.load_program(program)?;
        self.reset();
        self.memory = memory;
        debug!("Reloaded with {} byte program", program.len());
        Ok(())
    }

    /// Runs one fetch-decode-execute cycle.
    ///
    /// The program counter moves past the fetched instruction before it executes,
    /// so an unknown opcode leaves it pointing at the next one.
    ///
    /// # Errors
    ///
    /// * `UnknownOpcode` if the fetched word is not an instruction. Execution may continue.
    /// * `StackUnderflow` or `StackOverflow` on an unbalanced return or too deep a call.
    /// * `OutOfBounds` if the fetch or an instruction touches memory past `0xFFF`.
    pub fn step(&mut self) -> Result<(), ChipError> {
        let address = self.program_counter;
        let word = OpcodeWord::from_bytes(self.memory.read_word(usize::from(address))?);
        self.program_counter = self.program_counter.wrapping_add(PROGRAM_COUNTER_INCREMENT);
        trace!("{address:03X}: {word}");

        match word.decode() {
            Ok(opcode) => self.handle_opcode(opcode),
            Err(error) => {
                warn!("Skipping {word} at {address:03X}: {error}");
                Err(error)
            }
        }
    }

    /// Counts both timers one step toward zero.
    pub fn tick_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }

    /// Records whether hexadecimal key `key` is held down. Keys past `0xF` are ignored.
    pub fn set_key_state(&mut self, key: usize, pressed: bool) {
        match self.keys.get_mut(key) {
            Some(state) => *state = pressed,
            None => warn!("Ignoring state of nonexistent key {key:#X}")
        }
    }

    /// Replaces the state of the whole keypad.
    pub fn set_keys(&mut self, keys: [bool; KEY_COUNT]) {
        self.keys = keys;
    }

    #[must_use]
    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    /// Returns whether a tone should currently be playing.
    #[must_use]
    pub fn is_sound_active(&self) -> bool {
        self.sound_timer > 0
    }

    #[must_use]
    pub fn program_counter(&self) -> u16 {
        self.program_counter
    }

    #[must_use]
    pub fn index(&self) -> u16 {
        self.register_i
    }

    #[must_use]
    pub fn register(&self, register: usize) -> u8 {
        self.registers.get(register)
    }

    #[must_use]
    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    #[must_use]
    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    #[must_use]
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    #[must_use]
    pub fn memory(&self) -> &[u8] {
        self.memory.as_slice()
    }

    fn handle_opcode(&mut self, opcode: Opcode) -> Result<(), ChipError> {
        match opcode {
            Opcode::System(_) => {}
            Opcode::ClearScreen => self.framebuffer.clear(),
            Opcode::Return => self.return_from_subroutine()?,
            Opcode::Jump(address) => self.jump(address),
            Opcode::Call(address) => self.call(address)?,
            Opcode::SkipIfEqualValue(register, value) => self.skip_if(self.registers.get(register) == value),
            Opcode::SkipIfNotEqualValue(register, value) => self.skip_if(self.registers.get(register) != value),
            Opcode::SkipIfRegistersEqual(first, second) => self.skip_if(self.registers.get(first) == self.registers.get(second)),
            Opcode::SetValue(register, value) => self.registers.set(register, value),
            Opcode::AddValue(register, value) => self.registers.set(register, self.registers.get(register).wrapping_add(value)),
            Opcode::Copy(first, second) => self.registers.set(first, self.registers.get(second)),
            Opcode::Or(first, second) => self.registers.set(first, self.registers.get(first) | self.registers.get(second)),
            Opcode::And(first, second) => self.registers.set(first, self.registers.get(first) & self.registers.get(second)),
            Opcode::Xor(first, second) => self.registers.set(first, self.registers.get(first) ^ self.registers.get(second)),
            Opcode::AddRegisters(first, second) => self.add_registers(first, second),
            Opcode::Subtract(first, second) => self.subtract(first, second, first),
            Opcode::ShiftRight(register, _) => self.shift_right(register),
            Opcode::SubtractReversed(first, second) => self.subtract(second, first, first),
            Opcode::ShiftLeft(register, _) => self.shift_left(register),
            Opcode::SkipIfRegistersNotEqual(first, second) => self.skip_if(self.registers.get(first) != self.registers.get(second)),
            Opcode::SetIndex(address) => self.register_i = address,
            Opcode::JumpOffset(address) => self.jump(address + u16::from(self.registers.get(0x0))),
            Opcode::Random(register, mask) => self.random(register, mask),
            Opcode::Draw(x_register, y_register, height) => self.draw(x_register, y_register, height)?,
            Opcode::SkipIfKeyPressed(register) => self.skip_if(self.is_key_pressed(register)),
            Opcode::SkipIfKeyNotPressed(register) => self.skip_if(!self.is_key_pressed(register)),
            Opcode::ReadDelayTimer(register) => self.registers.set(register, self.delay_timer),
            Opcode::WaitForKey(register) => self.wait_for_key(register),
            Opcode::SetDelayTimer(register) => self.delay_timer = self.registers.get(register),
            Opcode::SetSoundTimer(register) => self.sound_timer = self.registers.get(register),
            Opcode::AddToIndex(register) => self.register_i = self.register_i.wrapping_add(u16::from(self.registers.get(register))),
            Opcode::FontGlyph(register) => self.register_i = font::glyph_address(self.registers.get(register)),
            Opcode::BinaryCodedDecimal(register) => self.binary_coded_decimal(register)?,
            Opcode::StoreRegisters(register) => self.store_registers(register)?,
            Opcode::LoadRegisters(register) => self.load_registers(register)?
        }

        Ok(())
    }

    fn jump(&mut self, address: u16) {
        self.program_counter = address;
    }

    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.program_counter = self.program_counter.wrapping_add(PROGRAM_COUNTER_INCREMENT);
        }
    }

    fn call(&mut self, address: u16) -> Result<(), ChipError> {
        if self.stack.len() >= STACK_DEPTH {
            return Err(ChipError::StackOverflow { depth: STACK_DEPTH });
        }
        self.stack.push(self.program_counter);
        self.program_counter = address;
        Ok(())
    }

    fn return_from_subroutine(&mut self) -> Result<(), ChipError> {
        self.program_counter = self.stack.pop().ok_or(ChipError::StackUnderflow)?;
        Ok(())
    }

    fn add_registers(&mut self, first: usize, second: usize) {
        let (sum, carry) = self.registers.get(first).overflowing_add(self.registers.get(second));
        self.registers.set(first, sum);
        self.registers.set_flag(carry);
    }

    /// VF is 1 only when the minuend is strictly greater, so equal operands give 0.
    fn subtract(&mut self, minuend: usize, subtrahend: usize, result: usize) {
        let (minuend, subtrahend) = (self.registers.get(minuend), self.registers.get(subtrahend));
        self.registers.set(result, minuend.wrapping_sub(subtrahend));
        self.registers.set_flag(minuend > subtrahend);
    }

    fn shift_right(&mut self, register: usize) {
        let value = self.registers.get(register);
        self.registers.set(register, value >> 1);
        self.registers.set_flag(value & LEAST_SIGNIFICANT_BIT_MASK != 0);
    }

    fn shift_left(&mut self, register: usize) {
        let value = self.registers.get(register);
        self.registers.set(register, value << 1);
        self.registers.set_flag(value & MOST_SIGNIFICANT_BIT_MASK != 0);
    }

    fn random(&mut self, register: usize, mask: u8) {
        let random_byte: u8 = self.rng.gen();
        self.registers.set(register, random_byte & mask);
    }

    fn draw(&mut self, x_register: usize, y_register: usize, height: u8) -> Result<(), ChipError> {
        let x = usize::from(self.registers.get(x_register));
        let y = usize::from(self.registers.get(y_register));
        let rows = Framebuffer::visible_rows(y, usize::from(height));

        let collision = {
            let sprite = self.memory.slice(usize::from(self.register_i), rows)?;
            self.framebuffer.draw_sprite(x, y, sprite)
        };
        self.registers.set_flag(collision);
        Ok(())
    }

    fn is_key_pressed(&self, register: usize) -> bool {
        let key = usize::from(self.registers.get(register));
        self.keys.get(key).copied().unwrap_or(false)
    }

    /// Stalls by pointing the program counter back at this instruction until a key is held.
    fn wait_for_key(&mut self, register: usize) {
        match self.keys.iter().position(|&pressed| pressed) {
            #[allow(clippy::cast_possible_truncation)]
            Some(key) => self.registers.set(register, key as u8),
            None => {
                debug!("Waiting for a key press into V{register:X}");
                self.program_counter = self.program_counter.wrapping_sub(PROGRAM_COUNTER_INCREMENT);
            }
        }
    }

    fn binary_coded_decimal(&mut self, register: usize) -> Result<(), ChipError> {
        let value = self.registers.get(register);
        let digits = self.memory.slice_mut(usize::from(self.register_i), 3)?;
        digits.copy_from_slice(&[value / 100, value / 10 % 10, value % 10]);
        Ok(())
    }

    fn store_registers(&mut self, register: usize) -> Result<(), ChipError> {
        let values = self.registers.up_to(register);
        self.memory.slice_mut(usize::from(self.register_i), values.len())?.copy_from_slice(values);
        Ok(())
    }

    fn load_registers(&mut self, register: usize) -> Result<(), ChipError> {
        let values = self.memory.slice(usize::from(self.register_i), register + 1)?;
        self.registers.up_to_mut(register).copy_from_slice(values);
        Ok(())
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new()
    }
}
