//! Calor - Thermostatic Heater Controller Firmware
//!
//! Main firmware binary for an RP2040 heater controller: one ambient
//! sensor, one heater output, a four-digit display and a single knob.
//!
//! Named after the Latin "calor" meaning "heat".

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_time::{Duration, Instant, Ticker, Timer};
use {defmt_rtt as _, panic_probe as _};

use calor_core::{BootOutcome, ControlLoop, Event};

use crate::board::{BoardPins, Thermostat};
use crate::config::CONFIG;
use crate::eeprom::{EepromImage, FlashEeprom};

mod board;
mod config;
mod eeprom;

/// Control loop period; fast enough to follow the encoder by polling
const TICK_PERIOD: Duration = Duration::from_millis(2);

/// Wait before retrying a failed flash commit
const COMMIT_RETRY: Duration = Duration::from_secs(1);

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Calor firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let mut eeprom = FlashEeprom::new(p.FLASH, p.DMA_CH0);
    let store = match eeprom.load().await {
        Ok(image) => image,
        Err(e) => {
            warn!("Flash read failed ({}), starting from an empty store", e);
            EepromImage::new()
        }
    };

    let board = board::assemble(
        BoardPins {
            i2c: p.I2C0,
            sda: p.PIN_0,
            scl: p.PIN_1,
            display_clk: p.PIN_3,
            display_dio: p.PIN_4,
            encoder_button: p.PIN_5,
            encoder_b: p.PIN_6,
            encoder_a: p.PIN_7,
            heater: p.PIN_12,
            adc: p.ADC,
            ntc: p.PIN_26,
        },
        store,
    );
    info!("Board initialized");

    info!(
        "Config: setpoint {}-{}°C, save delay {}ms, overheat {} at {}°C",
        CONFIG.limits.set_temp.min,
        CONFIG.limits.set_temp.max,
        CONFIG.save_delay_ms,
        CONFIG.overheat.enabled,
        CONFIG.overheat.threshold_c
    );

    let mut thermostat: Thermostat = ControlLoop::new(CONFIG, board);

    match thermostat.boot() {
        Ok(outcome) => log_boot(outcome, &thermostat),
        Err(e) => {
            error!("Boot failed: {}", e);
            halt().await;
        }
    }
    let mut commit_after = Instant::now();
    if !sync_eeprom(&mut eeprom, &mut thermostat).await {
        commit_after += COMMIT_RETRY;
    }

    let mut ticker = Ticker::every(TICK_PERIOD);
    let mut last = Instant::now();

    loop {
        ticker.next().await;

        // Carry the sub-millisecond remainder into the next tick
        let elapsed_ms = last.elapsed().as_millis() as u32;
        last += Duration::from_millis(elapsed_ms as u64);

        for event in thermostat.tick(elapsed_ms) {
            log_event(&event);
        }

        if Instant::now() >= commit_after && !sync_eeprom(&mut eeprom, &mut thermostat).await {
            commit_after = Instant::now() + COMMIT_RETRY;
        }
    }
}

fn log_boot(outcome: BootOutcome, thermostat: &Thermostat) {
    let state = thermostat.state();
    match outcome {
        BootOutcome::Defaults => info!("No stored settings, using defaults"),
        BootOutcome::Restored => info!("Settings restored"),
        BootOutcome::RestoredClamped => warn!("Settings restored, out-of-range values clamped"),
        BootOutcome::Discarded(e) => warn!("Stored settings discarded: {}", e),
        BootOutcome::Reset => info!("Button held at boot, settings reset"),
        BootOutcome::ResetFailed(e) => error!("Settings reset failed: {}", e),
    }
    info!(
        "Setpoint {}°C, hysteresis {}°C, brightness {}",
        state.set_temp, state.hyster_dia, state.display_brightness
    );
}

fn log_event(event: &Event) {
    match event {
        Event::TemperatureSampled(t) => trace!("Temperature {}°C", t),
        Event::SettingChanged(setting) => debug!("{} changed", setting),
        Event::ScreenChanged(screen) => debug!("Screen {}", screen),
        Event::HeaterSwitched(on) => info!("Heater {}", if *on { "on" } else { "off" }),
        Event::SettingsSaved => info!("Settings saved"),
        Event::OverheatCleared => info!("Overheat cleared, heater released"),
        Event::OverheatDetected => error!("Overheat detected, heater forced off"),
        Event::OverheatReadFailed(e) => error!("Overheat sensor failed: {}, heater forced off", e),
        fault => warn!("{}", fault),
    }
}

/// Commit the emulated EEPROM if it was written to
///
/// Returns false if the commit failed; the image stays dirty.
async fn sync_eeprom(eeprom: &mut FlashEeprom<'_>, thermostat: &mut Thermostat) -> bool {
    let store = &mut thermostat.board_mut().store;
    if !store.is_dirty() {
        return true;
    }
    match eeprom.commit(store).await {
        Ok(()) => {
            debug!("EEPROM image committed to flash");
            true
        }
        Err(e) => {
            warn!("EEPROM commit failed: {}", e);
            false
        }
    }
}

/// Park forever after a fatal boot error
///
/// The heater was switched off before the failing step and the display
/// shows the reason.
async fn halt() -> ! {
    loop {
        Timer::after_secs(60).await;
        trace!("Halted");
    }
}
