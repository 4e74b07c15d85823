use std::cell::RefCell;
use std::process::ExitCode;
use std::rc::Rc;
use std::time::{Duration, Instant};
use std::{env, fs};

use log::{error, warn};

use chipvm::display::WindowDisplay;
use chipvm::emulator::Emulator;
use chipvm::error::Chip8Error;
use chipvm::keyboard::{key_to_num, Keypad};
use chipvm::sound::Beeper;

// ~700 instructions per second against the ~60 fps frame cap.
// Instruction rate is an emulation-speed knob; the 60 Hz timer decay
// below is wall-clock-bound and deliberately kept on its own schedule.
const STEPS_PER_FRAME: u32 = 12;
const TIMER_PERIOD: Duration = Duration::from_micros(16_667);

fn main() -> ExitCode {
    env_logger::Builder::from_default_env()
        .filter_module("chipvm", log::LevelFilter::Info)
        .init();

    let Some(rom) = env::args().nth(1) else {
        eprintln!("usage: chipvm <rom>");
        return ExitCode::FAILURE;
    };
    let image = match fs::read(&rom) {
        Ok(image) => image,
        Err(e) => {
            error!("could not read {rom}: {e}");
            return ExitCode::FAILURE;
        }
    };

    let display = match WindowDisplay::new("chipvm - ESC to exit") {
        Ok(window) => Rc::new(RefCell::new(window)),
        Err(e) => {
            error!("could not open window: {e}");
            return ExitCode::FAILURE;
        }
    };
    let keypad = Rc::new(RefCell::new(Keypad::new()));
    let beeper = Beeper::new();

    let mut emu = Emulator::new(
        Box::new(Rc::clone(&display)),
        Box::new(Rc::clone(&keypad)),
        Box::new(rand::thread_rng()),
    );
    if let Err(e) = emu.load_program(&image) {
        error!("{e}");
        return ExitCode::FAILURE;
    }

    let mut last_tick = Instant::now();
    while display.borrow().is_open() {
        // mirror held window keys into the hex pad
        {
            let mut pad = keypad.borrow_mut();
            pad.release_all();
            for key in display.borrow().held_keys() {
                if let Some(num) = key_to_num(key) {
                    pad.press(num);
                }
            }
        }

        for _ in 0..STEPS_PER_FRAME {
            match emu.step() {
                Ok(()) => {}
                Err(e @ Chip8Error::UnknownOpcode { .. }) => warn!("skipping: {e}"),
                Err(e) => {
                    error!("halting: {e}");
                    return ExitCode::FAILURE;
                }
            }
        }

        while last_tick.elapsed() >= TIMER_PERIOD {
            emu.tick_timers();
            last_tick += TIMER_PERIOD;
        }

        if let Some(beeper) = &beeper {
            beeper.set_active(emu.sound_active());
        }

        // pump the window every frame so key state stays live even when
        // the program is not drawing
        if let Err(e) = display.borrow_mut().pump() {
            error!("window update failed: {e}");
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}
