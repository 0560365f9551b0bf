//! # `octo_vip`
//!
//! `octo_vip` is a CHIP-8 interpreter written in Rust.
//! The [`Interpreter`](interpreter::Interpreter) is a self-contained virtual machine that a host
//! steps, ticks and feeds with key state; [`run`] is such a host built on SDL2.

use std::{fs, io, time::{Duration, Instant}};
use std::io::ErrorKind;

use log::{debug, error, info, warn};
use rfd::FileDialog;
use sdl2::{event::Event, keyboard::Keycode, pixels::Color, rect::Rect, render::Canvas, video::Window};

use audio::Beeper;
use config::Config;
use display::{Framebuffer, DISPLAY_HEIGHT, DISPLAY_WIDTH};
use interpreter::Interpreter;
use keymap::KeyMap;

pub mod audio;
pub mod config;
pub mod display;
pub mod error;
pub mod font;
pub mod interpreter;
pub mod keymap;
pub mod memory;
pub mod opcodes;
pub mod registers;

const FRAME_DURATION: Duration = Duration::from_nanos(1_000_000_000 / 60);
const BACKGROUND_COLOR: Color = Color::RGB(0, 0, 0);
const PIXEL_COLOR: Color = Color::RGB(255, 255, 255);

/// Runs the actual emulator.
/// Returns either an `OK` signifying the process ended successfully or an `Err` containing a `String` which mentions the issue.
///
/// Each 60 Hz frame runs `config.cycles_per_frame` instructions, ticks the timers once,
/// updates the tone and redraws the window.
///
/// # Errors
///
/// Returns an `Err` if:
/// * The game file given on the command line cannot be found or read.
/// * Any SDL system cannot be initialized.
pub fn run(config: &Config) -> Result<(), String> {
    // Initialize SDL
    let sdl_context = sdl2::init()?;
    let video_subsystem = sdl_context.video()?;

    // Create the window
    #[allow(clippy::cast_possible_truncation)]
    let (width, height) = (DISPLAY_WIDTH as u32 * config.scale, DISPLAY_HEIGHT as u32 * config.scale);
    let window = video_subsystem.window("octo-vip", width, height)
        .position_centered()
        .build()
        .map_err(|window_build_error| window_build_error.to_string())?;

    // Prepare the canvas
    let mut canvas = window.into_canvas()
        .build()
        .map_err(|integer_or_sdl_error| integer_or_sdl_error.to_string())?;

    let audio_subsystem = sdl_context.audio()?;
    let beeper = Beeper::open(&audio_subsystem)?;

    let mut event_pump = sdl_context.event_pump()?;

    let mut interpreter = match config.seed {
        Some(seed) => Interpreter::with_seed(seed),
        None => Interpreter::new()
    };
    let keymap = KeyMap::for_layout(&config.layout);

    // Nothing runs until a game is in memory
    let mut running = false;
    if let Some(path) = &config.rom {
        running = load_game_file(&mut interpreter, path)?;
    }

    'game_loop: loop {
        let frame_start = Instant::now();

        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. } |
                Event::KeyDown { keycode: Some(Keycode::Escape), .. } => {
                    break 'game_loop;
                },
                Event::KeyDown { keycode: Some(Keycode::L), .. } => {
                    let path = FileDialog::new()
                        .add_filter("CHIP-8", &["ch8", "chip8"])
                        .set_directory("games")
                        .pick_file();
                    if let Some(path) = path.as_ref().and_then(|path| path.to_str()) {
                        running = load_picked_game(&mut interpreter, path) || running;
                    }
                },
                Event::KeyDown { keycode: Some(keycode), .. } => {
                    if let Some(key) = keymap.logical_key(keycode) {
                        interpreter.set_key_state(key, true);
                    }
                },
                Event::KeyUp { keycode: Some(keycode), .. } => {
                    if let Some(key) = keymap.logical_key(keycode) {
                        interpreter.set_key_state(key, false);
                    }
                },
                Event::DropFile { filename, .. } => {
                    running = load_picked_game(&mut interpreter, &filename) || running;
                },
                _ => {}
            }
        }

        if running {
            running = run_frame(&mut interpreter, config.cycles_per_frame);
        }
        beeper.update(running && interpreter.is_sound_active());

        draw_framebuffer(&mut canvas, interpreter.framebuffer(), config.scale)?;

        // Hold the loop, and with it the timers, at 60 Hz
        if let Some(remaining) = FRAME_DURATION.checked_sub(frame_start.elapsed()) {
            std::thread::sleep(remaining);
        }
    }

    Ok(())
}

/// Runs one frame's worth of instructions then ticks the timers.
/// Returns whether the program can keep running; a fatal error stops it.
fn run_frame(interpreter: &mut Interpreter, cycles_per_frame: u32) -> bool {
    for _ in 0..cycles_per_frame {
        if let Err(e) = interpreter.step() {
            if e.is_fatal() {
                error!("Stopping at {:03X}: {e}", interpreter.program_counter());
                return false;
            }
        }
    }
    interpreter.tick_timers();
    true
}

/// Paints every lit pixel of `framebuffer` as a `scale`-sized square.
fn draw_framebuffer(canvas: &mut Canvas<Window>, framebuffer: &Framebuffer, scale: u32) -> Result<(), String> {
    canvas.set_draw_color(BACKGROUND_COLOR);
    canvas.clear();
    canvas.set_draw_color(PIXEL_COLOR);

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    let pixels: Vec<Rect> = framebuffer.lit_pixels()
        .map(|(x, y)| Rect::new(x as i32 * scale as i32, y as i32 * scale as i32, scale, scale))
        .collect();
    canvas.fill_rects(&pixels)?;
    canvas.present();
    Ok(())
}

/// Resets the emulator and loads the game at the provided path if possible, or returns an `Err` containing a `String` if the file could not be read.
/// Returns whether a game was loaded. A file of the wrong type (see [`read_game_file`](read_game_file)) or one too large to fit
/// is logged and leaves the emulator as it was.
///
/// # Errors
///
/// Returns the forwarded `Err` from [`read_game_file`](read_game_file) if the file fails to be read.
fn load_game_file(interpreter: &mut Interpreter, path: &str) -> Result<bool, String> {
    let game_data = match read_game_file(path) {
        Ok(game_data) => game_data,
        Err(ref e) if e.kind() == ErrorKind::Unsupported => {
            warn!("{e}");
            return Ok(false);
        },
        Err(e) => return Err(e.to_string())
    };

    if let Err(e) = interpreter.reload(&game_data) {
        warn!("Not loading {path}: {e}");
        return Ok(false);
    }
    info!("Loaded {path}");
    Ok(true)
}

/// Loads a game chosen while the window is open. Any failure is logged and the current game carries on.
fn load_picked_game(interpreter: &mut Interpreter, path: &str) -> bool {
    match load_game_file(interpreter, path) {
        Ok(loaded) => loaded,
        Err(e) => {
            warn!("Could not load {path}: {e}");
            false
        }
    }
}

/// Returns the byte contents of the provided game file, or an `io::Error` if the read fails.
///
/// # Errors
///
/// Returns an `Err` if the file fails to be read.
fn read_game_file(path: &str) -> io::Result<Vec<u8>> {
    if !std::path::Path::new(path)
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("ch8") || ext.eq_ignore_ascii_case("chip8")) {
        return Err(io::Error::new(ErrorKind::Unsupported, format!("Invalid file found at {path}. Only CHIP-8 files (.ch8 or .chip8) are valid.")));
    }

    debug!("Reading {path}");
    fs::read(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;

    const NON_EXISTENT_GAME_PATH: &str = "games/FAKE.chip8";
    const INVALID_GAME_PATH: &str = "Cargo.toml";

    /// Writes `contents` to a uniquely named file in the temporary directory.
    fn temporary_game(name: &str, contents: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(format!("octo_vip_{}_{name}", std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn read_existing_game_file() {
        let path = temporary_game("read.ch8", &[0x00, 0xE0]);
        assert_eq!(read_game_file(path.to_str().unwrap()).unwrap(), vec![0x00, 0xE0], "Valid game file was not read.");
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn read_non_existent_game_file() {
        assert_ne!(read_game_file(NON_EXISTENT_GAME_PATH).unwrap_err().kind(), ErrorKind::Unsupported, "Wrong error returned for non-existent game file.");
    }

    #[test]
    fn read_invalid_game_file() {
        assert_eq!(read_game_file(INVALID_GAME_PATH).unwrap_err().kind(), ErrorKind::Unsupported, "Wrong error returned for invalid game file.");
    }

    #[test]
    fn load_existing_game_file() {
        let mut interpreter = Interpreter::with_seed(1);
        interpreter.set_key_state(0x1, true);
        interpreter.step().unwrap();

        let path = temporary_game("load.CH8", &[0x60, 0x2A]);
        assert_eq!(load_game_file(&mut interpreter, path.to_str().unwrap()), Ok(true), "Valid game file was not loaded.");
        assert_eq!(interpreter.program_counter(), 0x200, "Interpreter not reset before loading.");

        interpreter.step().unwrap();
        assert_eq!(interpreter.register(0x0), 0x2A, "Loaded game did not run.");
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn load_oversized_game_file() {
        let mut interpreter = Interpreter::with_seed(1);
        let path = temporary_game("large.chip8", &[0x12; memory::MAX_PROGRAM_SIZE + 1]);

        assert_eq!(load_game_file(&mut interpreter, path.to_str().unwrap()), Ok(false), "Oversized game file was loaded.");
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn load_non_existent_game_file() {
        let mut interpreter = Interpreter::with_seed(1);

        assert!(load_game_file(&mut interpreter, NON_EXISTENT_GAME_PATH).is_err(), "Non-existent game file was loaded successfully.");
    }

    #[test]
    fn load_invalid_game_file() {
        let mut interpreter = Interpreter::with_seed(1);

        assert_eq!(load_game_file(&mut interpreter, INVALID_GAME_PATH), Ok(false), "Invalid game file error was not swallowed.");
    }

    #[test]
    fn load_unreadable_picked_game() {
        let mut interpreter = Interpreter::with_seed(1);
        interpreter.load(&[0x60, 0x2A]).unwrap();
        interpreter.step().unwrap();

        assert!(!load_picked_game(&mut interpreter, NON_EXISTENT_GAME_PATH), "Non-existent game file was loaded successfully.");
        assert_eq!(interpreter.program_counter(), 0x202, "Current game reset by a failed load.");
        assert_eq!(interpreter.register(0x0), 0x2A, "Current game reset by a failed load.");
    }

    #[test]
    fn load_oversized_picked_game_keeps_current() {
        let mut interpreter = Interpreter::with_seed(1);
        interpreter.load(&[0x60, 0x2A]).unwrap();
        interpreter.step().unwrap();

        let path = temporary_game("picked_large.ch8", &[0x12; memory::MAX_PROGRAM_SIZE + 1]);
        assert!(!load_picked_game(&mut interpreter, path.to_str().unwrap()), "Oversized game file was loaded.");
        assert_eq!(interpreter.program_counter(), 0x202, "Current game reset by a rejected file.");
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn run_frame_ticks_timers_once() {
        let mut interpreter = Interpreter::with_seed(1);
        // V0 = 10, delay = V0, then spin on a jump to self
        interpreter.load(&[0x60, 0x0A, 0xF0, 0x15, 0x12, 0x04]).unwrap();

        assert!(run_frame(&mut interpreter, 12), "Frame stopped without a fatal error.");
        assert_eq!(interpreter.delay_timer(), 9, "Timers not ticked exactly once per frame.");
        assert_eq!(interpreter.program_counter(), 0x204);
    }

    #[test]
    fn run_frame_stops_on_fatal_error() {
        let mut interpreter = Interpreter::with_seed(1);
        // Unknown opcode, then a return with an empty stack
        interpreter.load(&[0x51, 0x21, 0x00, 0xEE]).unwrap();

        assert!(!run_frame(&mut interpreter, 4), "Frame kept running after a stack underflow.");
        assert_eq!(interpreter.program_counter(), 0x204);
    }
}
