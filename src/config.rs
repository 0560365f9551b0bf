//! Command line options for the SDL host.

use clap::{Parser, ValueEnum};

pub const DEFAULT_CYCLES_PER_FRAME: u32 = 12;
pub const DEFAULT_SCALE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum, Default)]
pub enum KeyLayout {
    #[default]
    Qwerty,
    Azerty
}

/// A CHIP-8 interpreter.
#[derive(Debug, Parser)]
#[command(name = "octo-vip", version, about)]
pub struct Config {
    /// Path to a CHIP-8 game (.ch8 or .chip8). One can also be dropped on the window or picked with L.
    pub rom: Option<String>,

    /// Instructions executed per 60 Hz frame; each frame also ticks the timers once.
    #[arg(short, long, default_value_t = DEFAULT_CYCLES_PER_FRAME, value_parser = clap::value_parser!(u32).range(1..))]
    pub cycles_per_frame: u32,

    /// Window pixels per CHIP-8 pixel.
    #[arg(short, long, default_value_t = DEFAULT_SCALE, value_parser = clap::value_parser!(u32).range(1..=40))]
    pub scale: u32,

    /// Host keyboard layout used for the hexadecimal keypad.
    #[arg(short, long, value_enum, default_value_t = KeyLayout::Qwerty)]
    pub layout: KeyLayout,

    /// Seed for the random number instruction.
    #[arg(long)]
    pub seed: Option<u64>
}
