//! Main control loop
//!
//! The loop is the single owner of [`DeviceState`]. Each call to
//! [`ControlLoop::tick`] runs one complete iteration:
//!
//! 1. Advance all timers
//! 2. Sample the ambient temperature when its timer is due
//! 3. Write settings if the save delay ran out
//! 4. Sample the overheat sensor when enabled and due
//! 5. Push the brightness setting to the display
//! 6. Apply an encoder turn to the active screen's setting
//! 7. Advance the screen on a click
//! 8. Render
//! 9. Run the hysteresis decision
//! 10. Drive the heater output
//!
//! The save in step 3 runs before the edits of steps 6 and 7, so an edit
//! in the same tick starts a fresh delay instead of being folded into a
//! write that already happened.

use calor_hal::NonVolatileStore;
use heapless::Vec;

use super::hysteresis::decide;
use crate::config::{erase_settings, load_settings, save_settings, ControllerConfig, SettingsError};
use crate::safety::{OverheatMonitor, SafetyStatus};
use crate::scheduler::{PersistenceScheduler, Timer};
use crate::state::{DeviceState, Event};
use crate::traits::{
    DisplaySink, EncoderInput, HeaterOutput, OverheatSensor, SensorError, TemperatureSensor,
};
use crate::ui::{render_screen, render_status, Status};

/// Maximum events a single tick can report
pub const MAX_EVENTS: usize = 8;

/// Hardware the controller drives
///
/// Fields are public so the firmware can reach a collaborator between
/// ticks (committing the store, for example).
pub struct Board<T, O, E, D, S, H> {
    /// Ambient temperature sensor
    pub sensor: T,
    /// Heater-side overheat sensor
    pub overheat: O,
    /// Rotary encoder with button
    pub encoder: E,
    /// Segment display
    pub display: D,
    /// Settings storage
    pub store: S,
    /// Heater output
    pub heater: H,
}

/// Runtime state that is not persisted
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlSession {
    /// Last good ambient sample (°C), absent until the first one
    pub current_temp: Option<f32>,
    /// Hysteresis memory: whether the heater is logically enabled
    pub enabled: bool,
    /// Overheat protection is holding the heater off
    pub overheating: bool,
}

impl ControlSession {
    /// Physical heater state implied by the session
    pub fn heater_demand(&self) -> bool {
        self.enabled && !self.overheating
    }
}

/// Fatal boot failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BootError {
    /// Ambient sensor did not initialize
    SensorInit(SensorError),
    /// Configuration failed validation
    InvalidConfig(&'static str),
}

impl From<SensorError> for BootError {
    fn from(e: SensorError) -> Self {
        BootError::SensorInit(e)
    }
}

/// Where the settings came from at boot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BootOutcome {
    /// Nothing stored; compiled-in defaults
    Defaults,
    /// Stored settings restored as they were
    Restored,
    /// Stored settings restored, some values clamped into the limits
    RestoredClamped,
    /// Stored settings unusable; defaults
    Discarded(SettingsError),
    /// Button held at boot; storage erased, defaults
    Reset,
    /// Button held at boot but the erase failed; defaults for this run
    ResetFailed(SettingsError),
}

/// The heater controller
pub struct ControlLoop<T, O, E, D, S, H> {
    config: ControllerConfig,
    board: Board<T, O, E, D, S, H>,
    state: DeviceState,
    session: ControlSession,
    temp_timer: Timer,
    overheat_timer: Timer,
    persistence: PersistenceScheduler,
    monitor: OverheatMonitor,
}

impl<T, O, E, D, S, H> ControlLoop<T, O, E, D, S, H>
where
    T: TemperatureSensor,
    O: OverheatSensor,
    E: EncoderInput,
    D: DisplaySink,
    S: NonVolatileStore,
    H: HeaterOutput,
{
    /// Create a controller with default settings
    ///
    /// Nothing touches the hardware until [`boot`](Self::boot).
    pub fn new(config: ControllerConfig, board: Board<T, O, E, D, S, H>) -> Self {
        Self {
            state: config.defaults,
            session: ControlSession::default(),
            temp_timer: Timer::periodic(config.temp_sample_period_ms),
            overheat_timer: Timer::periodic(config.overheat_sample_period_ms),
            persistence: PersistenceScheduler::new(config.save_delay_ms),
            monitor: OverheatMonitor::new(config.overheat.threshold_c),
            config,
            board,
        }
    }

    /// Bring the device up
    ///
    /// Initializes the ambient sensor, honours a held button by erasing
    /// stored settings, then restores settings if any are stored. On a
    /// sensor failure `-sen` is left on the display and the caller is
    /// expected to halt.
    pub fn boot(&mut self) -> Result<BootOutcome, BootError> {
        self.config.validate().map_err(BootError::InvalidConfig)?;

        self.board.heater.set_on(false);

        if let Err(e) = self.board.sensor.init() {
            render_status(&mut self.board.display, Status::SensorError);
            let _ = self.board.display.refresh();
            return Err(BootError::SensorInit(e));
        }

        self.board.encoder.tick(0);
        let mut outcome = None;
        if self.board.encoder.is_pressed() {
            render_status(&mut self.board.display, Status::Reset);
            let _ = self.board.display.refresh();
            outcome = Some(match erase_settings(&mut self.board.store) {
                Ok(()) => BootOutcome::Reset,
                Err(e) => BootOutcome::ResetFailed(e),
            });
        }

        let restored = match load_settings(&mut self.board.store) {
            Ok(mut state) => {
                let clamped = state.sanitize(&self.config.limits);
                self.state = state;
                if clamped {
                    BootOutcome::RestoredClamped
                } else {
                    BootOutcome::Restored
                }
            }
            Err(SettingsError::NoData) => BootOutcome::Defaults,
            Err(e) => BootOutcome::Discarded(e),
        };

        // A failed erase still means defaults for this run
        if let Some(BootOutcome::ResetFailed(_)) = outcome {
            self.state = self.config.defaults;
        }
        Ok(outcome.unwrap_or(restored))
    }

    /// Run one loop iteration
    ///
    /// `elapsed_ms` is the time since the previous call.
    pub fn tick(&mut self, elapsed_ms: u32) -> Vec<Event, MAX_EVENTS> {
        let mut events = Vec::new();

        // 1. Timers
        self.temp_timer.tick(elapsed_ms);
        self.persistence.tick(elapsed_ms);
        if self.config.overheat.enabled {
            self.overheat_timer.tick(elapsed_ms);
        }

        // 2. Ambient sample
        if self.temp_timer.ready() {
            match self.board.sensor.read_temperature() {
                Ok(temp) if !temp.is_nan() => {
                    self.session.current_temp = Some(temp);
                    push(&mut events, Event::TemperatureSampled(temp));
                }
                Ok(_) => push(
                    &mut events,
                    Event::TemperatureReadFailed(SensorError::OutOfRange),
                ),
                Err(e) => push(&mut events, Event::TemperatureReadFailed(e)),
            }
        }

        // 3. Debounced save
        if self.persistence.consume_if_elapsed() {
            match save_settings(&mut self.board.store, &self.state) {
                Ok(()) => push(&mut events, Event::SettingsSaved),
                Err(e) => {
                    self.persistence.arm();
                    push(&mut events, Event::SaveFailed(e));
                }
            }
        }

        // 4. Overheat
        if self.config.overheat.enabled && self.overheat_timer.ready() {
            let reading = self.board.overheat.average_temperature();
            if let Some(status) = self.monitor.update(reading) {
                let event = match status {
                    SafetyStatus::Ok => Event::OverheatCleared,
                    SafetyStatus::Overheat => Event::OverheatDetected,
                    SafetyStatus::SensorFault(e) => Event::OverheatReadFailed(e),
                };
                push(&mut events, event);
            }
            self.session.overheating = self.monitor.is_overheating();
        }

        // 5. Brightness
        self.board
            .display
            .set_brightness(self.state.display_brightness);

        // 6. Encoder turn
        self.board.encoder.tick(elapsed_ms);
        if self.board.encoder.turned() {
            let direction = self.board.encoder.direction();
            if direction != 0 {
                if let Some(setting) = self.state.screen.setting() {
                    let fast = self.board.encoder.is_pressed();
                    if self
                        .state
                        .apply_edit(setting, direction, fast, &self.config.limits)
                    {
                        push(&mut events, Event::SettingChanged(setting));
                    }
                    self.persistence.arm();
                }
            }
        }

        // 7. Click
        if self.board.encoder.clicked() {
            let screen = self.state.advance_screen();
            self.persistence.arm();
            push(&mut events, Event::ScreenChanged(screen));
        }

        // 8. Render
        if self.session.overheating {
            render_status(&mut self.board.display, Status::Overheat);
        } else {
            render_screen(
                &mut self.board.display,
                &self.state,
                self.session.current_temp,
            );
        }
        if let Err(e) = self.board.display.refresh() {
            push(&mut events, Event::DisplayFailed(e));
        }

        // 9. Hysteresis
        if let Some(temp) = self.session.current_temp {
            self.session.enabled = decide(
                temp,
                self.state.set_temp,
                self.state.hyster_dia,
                self.session.enabled,
            );
        }

        // 10. Heater output
        let demand = self.session.heater_demand();
        if self.board.heater.is_on() != demand {
            push(&mut events, Event::HeaterSwitched(demand));
        }
        self.board.heater.set_on(demand);

        events
    }

    /// Current settings
    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    /// Current runtime state
    pub fn session(&self) -> &ControlSession {
        &self.session
    }

    /// Active configuration
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Check if a settings write is pending
    pub fn save_pending(&self) -> bool {
        self.persistence.is_armed()
    }

    /// Borrow the hardware
    pub fn board(&self) -> &Board<T, O, E, D, S, H> {
        &self.board
    }

    /// Mutably borrow the hardware
    pub fn board_mut(&mut self) -> &mut Board<T, O, E, D, S, H> {
        &mut self.board
    }
}

fn push(events: &mut Vec<Event, MAX_EVENTS>, event: Event) {
    // At most one event per step, so this cannot overflow
    let _ = events.push(event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SENTINEL_ADDR, SENTINEL_EMPTY};
    use crate::state::{Screen, Setting};
    use crate::traits::NoOverheatSensor;
    use crate::ui::render::tests::TextDisplay;
    use calor_hal::MemoryStore;

    struct MockSensor {
        init: Result<(), SensorError>,
        temp: Result<f32, SensorError>,
    }

    impl TemperatureSensor for MockSensor {
        fn init(&mut self) -> Result<(), SensorError> {
            self.init
        }

        fn read_temperature(&mut self) -> Result<f32, SensorError> {
            self.temp
        }
    }

    struct MockOverheat {
        temp: Result<f32, SensorError>,
    }

    impl OverheatSensor for MockOverheat {
        fn average_temperature(&mut self) -> Result<f32, SensorError> {
            self.temp
        }
    }

    #[derive(Default)]
    struct MockEncoder {
        // Queued for the next tick
        pending_dir: i8,
        pending_click: bool,
        pressed: bool,
        // Latched by tick
        dir: i8,
        clicked: bool,
    }

    impl EncoderInput for MockEncoder {
        fn tick(&mut self, _elapsed_ms: u32) {
            self.dir = core::mem::take(&mut self.pending_dir);
            self.clicked = core::mem::take(&mut self.pending_click);
        }

        fn turned(&self) -> bool {
            self.dir != 0
        }

        fn direction(&self) -> i8 {
            self.dir
        }

        fn is_pressed(&self) -> bool {
            self.pressed
        }

        fn clicked(&self) -> bool {
            self.clicked
        }
    }

    #[derive(Default)]
    struct MockHeater {
        on: bool,
    }

    impl HeaterOutput for MockHeater {
        fn set_on(&mut self, on: bool) {
            self.on = on;
        }

        fn is_on(&self) -> bool {
            self.on
        }
    }

    type Store = MemoryStore<64>;
    type TestLoop<O, S> = ControlLoop<MockSensor, O, MockEncoder, TextDisplay, S, MockHeater>;

    fn board<O, S>(overheat: O, store: S) -> Board<MockSensor, O, MockEncoder, TextDisplay, S, MockHeater> {
        Board {
            sensor: MockSensor {
                init: Ok(()),
                temp: Ok(20.0),
            },
            overheat,
            encoder: MockEncoder::default(),
            display: TextDisplay::default(),
            store,
            heater: MockHeater::default(),
        }
    }

    fn booted() -> TestLoop<NoOverheatSensor, Store> {
        let mut ctl = ControlLoop::new(
            ControllerConfig::default(),
            board(NoOverheatSensor, Store::new()),
        );
        assert_eq!(ctl.boot(), Ok(BootOutcome::Defaults));
        ctl
    }

    fn with_overheat() -> TestLoop<MockOverheat, Store> {
        let mut config = ControllerConfig::default();
        config.overheat.enabled = true;
        let mut ctl = ControlLoop::new(
            config,
            board(MockOverheat { temp: Ok(30.0) }, Store::new()),
        );
        ctl.boot().unwrap();
        ctl
    }

    fn turn<O: OverheatSensor, S: NonVolatileStore>(
        ctl: &mut TestLoop<O, S>,
        dir: i8,
        pressed: bool,
    ) -> Vec<Event, MAX_EVENTS> {
        ctl.board_mut().encoder.pending_dir = dir;
        ctl.board_mut().encoder.pressed = pressed;
        ctl.tick(100)
    }

    fn click<O: OverheatSensor, S: NonVolatileStore>(ctl: &mut TestLoop<O, S>) -> Vec<Event, MAX_EVENTS> {
        ctl.board_mut().encoder.pending_click = true;
        ctl.tick(100)
    }

    fn set_temp<O: OverheatSensor, S: NonVolatileStore>(ctl: &mut TestLoop<O, S>, temp: f32) {
        ctl.board_mut().sensor.temp = Ok(temp);
    }

    #[test]
    fn test_sensor_failure_is_fatal() {
        let mut b = board(NoOverheatSensor, Store::new());
        b.sensor.init = Err(SensorError::NotFound);
        let mut ctl = ControlLoop::new(ControllerConfig::default(), b);

        assert_eq!(
            ctl.boot(),
            Err(BootError::SensorInit(SensorError::NotFound))
        );
        assert_eq!(ctl.board().display.text, "-sen");
        assert!(!ctl.board().heater.on);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = ControllerConfig::default();
        config.temp_sample_period_ms = 0;
        let mut ctl = ControlLoop::new(config, board(NoOverheatSensor, Store::new()));
        assert!(matches!(ctl.boot(), Err(BootError::InvalidConfig(_))));
    }

    #[test]
    fn test_restores_saved_settings() {
        let saved = DeviceState {
            screen: Screen::Hyster,
            display_brightness: 2,
            hyster_dia: 0.5,
            set_temp: 30.0,
        };
        let mut store = Store::new();
        save_settings(&mut store, &saved).unwrap();

        let mut ctl = ControlLoop::new(ControllerConfig::default(), board(NoOverheatSensor, store));
        assert_eq!(ctl.boot(), Ok(BootOutcome::Restored));
        assert_eq!(ctl.state(), &saved);
    }

    #[test]
    fn test_restored_values_are_clamped() {
        let saved = DeviceState {
            set_temp: 80.0,
            ..DeviceState::DEFAULT
        };
        let mut store = Store::new();
        save_settings(&mut store, &saved).unwrap();

        let mut ctl = ControlLoop::new(ControllerConfig::default(), board(NoOverheatSensor, store));
        assert_eq!(ctl.boot(), Ok(BootOutcome::RestoredClamped));
        assert_eq!(ctl.state().set_temp, 55.0);
    }

    #[test]
    fn test_corrupt_settings_fall_back_to_defaults() {
        let mut store = Store::new();
        store.write_byte(SENTINEL_ADDR, 1).unwrap();

        let mut ctl = ControlLoop::new(ControllerConfig::default(), board(NoOverheatSensor, store));
        assert!(matches!(ctl.boot(), Ok(BootOutcome::Discarded(_))));
        assert_eq!(ctl.state(), &DeviceState::DEFAULT);
    }

    #[test]
    fn test_button_held_at_boot_resets() {
        let saved = DeviceState {
            set_temp: 30.0,
            ..DeviceState::DEFAULT
        };
        let mut store = Store::new();
        save_settings(&mut store, &saved).unwrap();

        let mut b = board(NoOverheatSensor, store);
        b.encoder.pressed = true;
        let mut ctl = ControlLoop::new(ControllerConfig::default(), b);

        assert_eq!(ctl.boot(), Ok(BootOutcome::Reset));
        assert_eq!(ctl.state(), &DeviceState::DEFAULT);
        assert_eq!(ctl.board().display.text, "rst");
        assert_eq!(
            ctl.board_mut().store.read_byte(SENTINEL_ADDR),
            Ok(SENTINEL_EMPTY)
        );
    }

    #[test]
    fn test_heater_off_until_first_sample() {
        let mut ctl = booted();
        set_temp(&mut ctl, 10.0);

        ctl.tick(50);
        assert_eq!(ctl.session().current_temp, None);
        assert!(!ctl.board().heater.on);
        assert_eq!(ctl.board().display.text, "----");

        let events = ctl.tick(50);
        assert!(events.contains(&Event::TemperatureSampled(10.0)));
        assert!(events.contains(&Event::HeaterSwitched(true)));
        assert!(ctl.board().heater.on);
        assert_eq!(ctl.board().display.text, "c10.0");
    }

    #[test]
    fn test_hysteresis_through_the_loop() {
        let mut ctl = booted();
        let temps = [25.3, 25.0, 24.7, 24.79, 24.80, 24.81, 25.2];
        let expected = [false, false, true, true, true, true, false];

        for (temp, want) in temps.iter().zip(expected) {
            set_temp(&mut ctl, *temp);
            ctl.tick(100);
            assert_eq!(ctl.board().heater.on, want, "at {}", temp);
        }
    }

    #[test]
    fn test_read_failure_keeps_last_sample() {
        let mut ctl = booted();
        set_temp(&mut ctl, 22.0);
        ctl.tick(100);

        ctl.board_mut().sensor.temp = Err(SensorError::Bus);
        let events = ctl.tick(100);
        assert!(events.contains(&Event::TemperatureReadFailed(SensorError::Bus)));
        assert_eq!(ctl.session().current_temp, Some(22.0));
        assert!(ctl.board().heater.on);
    }

    #[test]
    fn test_turn_on_display_only_screen_is_ignored() {
        let mut ctl = booted();
        let events = turn(&mut ctl, 1, false);
        assert!(events.iter().all(|e| !matches!(e, Event::SettingChanged(_))));
        assert_eq!(ctl.state(), &DeviceState::DEFAULT);
        assert!(!ctl.save_pending());
    }

    #[test]
    fn test_click_advances_screen_and_arms_save() {
        let mut ctl = booted();
        let events = click(&mut ctl);
        assert!(events.contains(&Event::ScreenChanged(Screen::Delta)));
        assert_eq!(ctl.state().screen, Screen::Delta);
        assert!(ctl.save_pending());
        assert_eq!(ctl.board().display.text, "d-5.0");
    }

    #[test]
    fn test_fast_turn_clamps_setpoint() {
        let mut ctl = booted();
        click(&mut ctl);
        click(&mut ctl);
        assert_eq!(ctl.state().screen, Screen::TargetTemp);

        ctl.state.set_temp = 54.5;
        let events = turn(&mut ctl, 1, true);
        assert!(events.contains(&Event::SettingChanged(Setting::SetTemp)));
        assert_eq!(ctl.state().set_temp, 55.0);
        assert_eq!(ctl.board().display.text, "t55.0");
    }

    #[test]
    fn test_brightness_edit_reaches_display() {
        let mut ctl = booted();
        for _ in 0..4 {
            click(&mut ctl);
        }
        assert_eq!(ctl.state().screen, Screen::Bright);

        turn(&mut ctl, -1, true);
        assert_eq!(ctl.state().display_brightness, 4);
        assert_eq!(ctl.board().display.text, "b4");

        // Brightness is pushed at the start of the following tick
        ctl.tick(100);
        assert_eq!(ctl.board().display.brightness, Some(4));
    }

    #[test]
    fn test_edits_coalesce_into_one_save() {
        let mut ctl = booted();
        click(&mut ctl);
        click(&mut ctl);

        let mut saves = 0;
        for _ in 0..10 {
            let events = turn(&mut ctl, 1, false);
            saves += events.iter().filter(|e| **e == Event::SettingsSaved).count();
        }
        assert_eq!(saves, 0);

        for _ in 0..60 {
            let events = ctl.tick(100);
            saves += events.iter().filter(|e| **e == Event::SettingsSaved).count();
        }
        assert_eq!(saves, 1);
        assert!(!ctl.save_pending());

        let stored = load_settings(&mut ctl.board_mut().store).unwrap();
        assert_eq!(&stored, ctl.state());
        assert_eq!(stored.screen, Screen::TargetTemp);
    }

    #[test]
    fn test_edit_in_flush_tick_starts_new_delay() {
        let mut ctl = booted();
        click(&mut ctl);
        click(&mut ctl);
        turn(&mut ctl, 1, false);
        for _ in 0..49 {
            let events = ctl.tick(100);
            assert!(!events.contains(&Event::SettingsSaved));
        }

        // The delay runs out in the same tick as the next edit
        let events = turn(&mut ctl, 1, false);
        assert_eq!(
            events.as_slice(),
            &[
                Event::TemperatureSampled(20.0),
                Event::SettingsSaved,
                Event::SettingChanged(Setting::SetTemp),
            ]
        );

        let stored = load_settings(&mut ctl.board_mut().store).unwrap();
        assert!((stored.set_temp - 25.1).abs() < 1e-4);
        assert!((ctl.state().set_temp - 25.2).abs() < 1e-4);
        assert!(ctl.save_pending());

        let mut saves = 0;
        for _ in 0..60 {
            let events = ctl.tick(100);
            saves += events.iter().filter(|e| **e == Event::SettingsSaved).count();
        }
        assert_eq!(saves, 1);
        assert!(!ctl.save_pending());
        let stored = load_settings(&mut ctl.board_mut().store).unwrap();
        assert_eq!(&stored, ctl.state());
    }

    #[test]
    fn test_store_smaller_than_settings_is_never_saved() {
        let mut ctl = ControlLoop::new(
            ControllerConfig::default(),
            board(NoOverheatSensor, MemoryStore::<24>::new()),
        );
        assert_eq!(
            ctl.boot(),
            Ok(BootOutcome::Discarded(SettingsError::Storage(
                calor_hal::StorageError::OutOfBounds
            )))
        );
        click(&mut ctl);
        for _ in 0..50 {
            let events = ctl.tick(100);
            assert!(!events.contains(&Event::SettingsSaved));
        }
        assert_eq!(ctl.board().store.write_count(), 0);
    }

    #[test]
    fn test_failed_save_is_retried() {
        let mut ctl = ControlLoop::new(
            ControllerConfig::default(),
            board(NoOverheatSensor, MemoryStore::<8>::new()),
        );
        ctl.boot().unwrap();
        click(&mut ctl);

        let mut failures = 0;
        for _ in 0..50 {
            let events = ctl.tick(100);
            failures += events
                .iter()
                .filter(|e| matches!(e, Event::SaveFailed(_)))
                .count();
        }
        assert_eq!(failures, 1);
        assert!(ctl.save_pending());
    }

    #[test]
    fn test_overheat_overrides_heater_and_display() {
        let mut ctl = with_overheat();
        set_temp(&mut ctl, 24.0);
        ctl.tick(100);
        assert!(ctl.board().heater.on);

        // Back inside the dead band with the heater logically on
        set_temp(&mut ctl, 25.0);
        ctl.board_mut().overheat.temp = Ok(70.0);
        let events = ctl.tick(100);
        assert!(events.contains(&Event::OverheatDetected));
        assert!(events.contains(&Event::HeaterSwitched(false)));
        assert!(!ctl.board().heater.on);
        assert!(ctl.session().enabled);
        assert_eq!(ctl.board().display.text, "ovh");

        ctl.board_mut().overheat.temp = Ok(40.0);
        let events = ctl.tick(100);
        assert!(events.contains(&Event::OverheatCleared));
        assert!(ctl.board().heater.on);
        assert_eq!(ctl.board().display.text, "c25.0");
    }

    #[test]
    fn test_overheat_read_failure_holds_heater_off() {
        let mut ctl = with_overheat();
        set_temp(&mut ctl, 20.0);
        ctl.board_mut().overheat.temp = Err(SensorError::OpenCircuit);

        let events = ctl.tick(100);
        assert!(events.contains(&Event::OverheatReadFailed(SensorError::OpenCircuit)));
        assert!(!ctl.board().heater.on);
        assert!(ctl.session().enabled);
    }

    #[test]
    fn test_disabled_overheat_never_blocks() {
        let mut ctl = booted();
        set_temp(&mut ctl, 20.0);
        for _ in 0..5 {
            ctl.tick(100);
        }
        assert!(!ctl.session().overheating);
        assert!(ctl.board().heater.on);
    }
}
