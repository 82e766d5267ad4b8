//! Frame loop
//!
//! One frame, in order:
//!
//! ```text
//! ┌────────────┐  ┌──────────────┐  ┌──────────┐  ┌─────────────┐  ┌────────┐
//! │ centering  │─▶│ poll input   │─▶│ timed    │─▶│ interpreter │─▶│ render │─▶ delay
//! │ offsets    │  │ queue+signal │  │ wake     │  │ N cycles    │  │        │
//! └────────────┘  └──────────────┘  └──────────┘  └─────────────┘  └────────┘
//! ```
//!
//! The pointer is read every frame; key and button events are only queued
//! once the interpreter has registered its input semaphore. A wake whose
//! tick has already passed when it is scheduled is delivered right after
//! the step that scheduled it. Rendering happens only when the interpreter
//! reported damage or the cursor changed.

use bluebook_display::{centered_origin, Blitter, CursorOverlay, Palette};
use bluebook_hal::{
    KeySequence, KeyReport, KeyboardMode, KeyboardSource, Mouse, MouseState, Platform,
};
use bluebook_hal::{CookedKeyboard, RawKeyboard};
use bluebook_protocol::EventWord;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::{Dimensions, DrawTarget};

use crate::config::{BridgeConfig, ConfigError};
use crate::error::{fatal, IgnoreReason};
use crate::input::keyboard::assemble;
use crate::input::{Decoded, KeyboardDecoder, MouseTranslator};
use crate::queue::Pushed;
use crate::traits::{Interpreter, PeerBitmap};
use crate::vm::{clamp_to_display, VmContext, VmState};

/// What the caller should do after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameOutcome {
    /// Run another frame
    Continue,
    /// The interpreter asked to stop
    Terminated,
}

/// Keys collected from the host before decoding
enum Polled {
    Keys(KeyReport),
    Sequence(Option<KeySequence>),
}

/// Host bridge for one interpreter
pub struct Bridge<P, I, D>
where
    D: DrawTarget,
{
    config: BridgeConfig,
    platform: P,
    interpreter: I,
    screen: D,
    vm: VmState,
    keyboard: KeyboardDecoder,
    mouse: MouseTranslator,
    blitter: Blitter<D::Color>,
    cursor: CursorOverlay,
}

impl<P, I, D> Bridge<P, I, D>
where
    P: Platform,
    I: Interpreter,
    D: DrawTarget,
    D::Color: From<Rgb888>,
{
    /// Build a bridge
    ///
    /// Fails if the configuration is out of range or names a keyboard mode
    /// the host keyboard does not provide.
    pub fn new(
        config: BridgeConfig,
        mut platform: P,
        interpreter: I,
        screen: D,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if platform.keyboard().mode() != KeyboardMode::from(config.keyboard.mode) {
            return Err(ConfigError::KeyboardMismatch);
        }

        let keyboard = KeyboardDecoder::new(config.keyboard.layout.table())
            .with_undecoded_passthrough(config.keyboard.undecoded_passthrough);
        let palette = Palette::from_rgb(
            config.display.foreground,
            config.display.background,
            config.display.cursor_color,
        );

        #[cfg(feature = "defmt")]
        defmt::info!(
            "bridge ready: {} cycles/frame, layout {}",
            config.cycles_per_frame,
            keyboard.layout().name
        );

        Ok(Self {
            vm: VmState::new(config.input.wake_policy),
            config,
            platform,
            interpreter,
            screen,
            keyboard,
            mouse: MouseTranslator::new(),
            blitter: Blitter::new(palette),
            cursor: CursorOverlay::new(),
        })
    }

    /// Run frames until the interpreter quits
    pub fn run(&mut self) -> Result<(), D::Error> {
        loop {
            if self.run_frame()? == FrameOutcome::Terminated {
                #[cfg(feature = "defmt")]
                defmt::info!("interpreter quit");
                return Ok(());
            }
        }
    }

    /// Run a single frame
    pub fn run_frame(&mut self) -> Result<FrameOutcome, D::Error> {
        self.update_origin();

        self.apply_cursor_request();
        self.process_input();

        self.check_scheduled_wake();

        self.run_interpreter();
        if self.vm.quit_signalled() {
            return Ok(FrameOutcome::Terminated);
        }

        self.render()?;

        if let Some(ms) = self.config.frame_delay_ms() {
            self.platform.delay_ms(ms);
        }
        Ok(FrameOutcome::Continue)
    }

    /// Configuration in use
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// State shared with the interpreter
    pub fn vm(&self) -> &VmState {
        &self.vm
    }

    /// Mutable state shared with the interpreter
    pub fn vm_mut(&mut self) -> &mut VmState {
        &mut self.vm
    }

    /// Hosted interpreter
    pub fn interpreter(&self) -> &I {
        &self.interpreter
    }

    /// Mutable hosted interpreter
    pub fn interpreter_mut(&mut self) -> &mut I {
        &mut self.interpreter
    }

    /// Host devices
    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    /// Physical screen
    pub fn screen(&self) -> &D {
        &self.screen
    }

    /// Keyboard decoder state
    pub fn keyboard(&self) -> &KeyboardDecoder {
        &self.keyboard
    }

    fn update_origin(&mut self) {
        let screen = self.screen.bounding_box().size;
        let origin = centered_origin(screen, self.vm.display_size());
        self.blitter.set_origin(origin);
    }

    /// Poll host input
    ///
    /// The pointer is tracked every frame so the cursor follows the mouse.
    /// Events are only translated and queued once the input semaphore is
    /// registered.
    fn process_input(&mut self) {
        let Some(semaphore) = self.vm.queue().semaphore() else {
            self.track_pointer();
            return;
        };
        let now = self.platform.ticks_ms();
        let unix = self.platform.unix_time_secs();

        self.process_keyboard(now, unix);
        self.process_mouse(now, unix);

        let signals = self.vm.queue_mut().take_pending_signals();
        for _ in 0..signals {
            self.interpreter.asynchronous_signal(semaphore);
        }
    }

    /// Read the mouse and record the pointer in bitmap coordinates
    fn track_pointer(&mut self) -> MouseState {
        let state = self.platform.mouse().state();
        let origin = self.blitter.origin();
        let position = clamp_to_display(
            state.x.saturating_sub(origin.x),
            state.y.saturating_sub(origin.y),
            self.vm.display_size(),
        );
        self.vm.set_pointer(position);
        state
    }

    fn process_keyboard(&mut self, now: u32, unix: u32) {
        let polled = match self.platform.keyboard() {
            KeyboardSource::Raw(keyboard) => Polled::Keys(keyboard.poll_keys()),
            KeyboardSource::Cooked(keyboard) => Polled::Sequence(keyboard.poll_sequence()),
        };

        match polled {
            Polled::Keys(keys) => {
                for key in keys {
                    let decoded = self.keyboard.decode_raw(key);
                    self.emit(now, unix, decoded);
                }
            }
            Polled::Sequence(Some(sequence)) => {
                let decoded = match assemble(&sequence) {
                    Some(key) => self.keyboard.decode_cooked(key),
                    None => Decoded::Ignored(IgnoreReason::UnsupportedSequence),
                };
                self.emit(now, unix, decoded);
            }
            Polled::Sequence(None) => {}
        }
    }

    fn process_mouse(&mut self, now: u32, unix: u32) {
        let state = self.track_pointer();

        let modifiers = self.keyboard.state().held;
        for event in self.mouse.buttons(state.buttons, modifiers) {
            #[cfg(feature = "defmt")]
            defmt::trace!(
                "button {} {}",
                event.code,
                if event.down { "down" } else { "up" }
            );
            self.queue_event(now, unix, &[event.word()]);
        }

        let (x, y) = self.vm.pointer();
        if let Some([x, y]) = self.mouse.motion(x, y) {
            self.queue_events(now, unix, &[&[x], &[y]]);
        }
    }

    fn apply_cursor_request(&mut self) {
        if let Some((x, y)) = self.vm.take_cursor_request() {
            let origin = self.blitter.origin();
            let mouse = self.platform.mouse();
            mouse.set_position(i32::from(x) + origin.x, i32::from(y) + origin.y);
            mouse.update_cursor();
        }
    }

    fn emit(&mut self, now: u32, unix: u32, decoded: Decoded) {
        match decoded {
            Decoded::Emit(words) => self.queue_event(now, unix, &words),
            Decoded::Ignored(_reason) => {
                #[cfg(feature = "defmt")]
                defmt::trace!("key ignored: {}", _reason);
            }
        }
    }

    fn queue_event(&mut self, now: u32, unix: u32, words: &[EventWord]) {
        self.queue_events(now, unix, &[words]);
    }

    fn queue_events(&mut self, now: u32, unix: u32, events: &[&[EventWord]]) {
        match self.vm.queue_mut().push_events(now, unix, events) {
            Ok(Pushed::Queued { .. }) => {}
            Ok(Pushed::Dropped) => {
                #[cfg(feature = "defmt")]
                defmt::warn!(
                    "input queue full, {} events dropped",
                    self.vm.queue().dropped_events()
                );
            }
            Err(violation) => fatal(violation),
        }
    }

    fn check_scheduled_wake(&mut self) {
        let now = self.platform.ticks_ms();
        if let Some(semaphore) = self.vm.wake_mut().poll(now) {
            #[cfg(feature = "defmt")]
            defmt::debug!("timed wake {} at {} ms", semaphore, now);
            self.interpreter.asynchronous_signal(semaphore);
        }
    }

    fn run_interpreter(&mut self) {
        self.interpreter.check_low_memory_conditions();

        let cycles = self.config.cycles_per_frame;
        let mut vm = VmContext::new(&mut self.vm, &self.platform);
        for _ in 0..cycles {
            if vm.quit_signalled() {
                break;
            }
            self.interpreter.cycle(&mut vm);
            if let Some(semaphore) = vm.take_due_wake() {
                #[cfg(feature = "defmt")]
                defmt::debug!("timed wake {} already due", semaphore);
                self.interpreter.asynchronous_signal(semaphore);
            }
        }
    }

    fn render(&mut self) -> Result<(), D::Error> {
        let size = self.vm.display_size();
        if size.is_empty() {
            return Ok(());
        }

        // The interpreter may have resized the display during this frame
        self.update_origin();

        if let Some(glyph) = self.vm.take_cursor_image() {
            self.cursor.set_glyph(glyph);
        }
        let damage = self.vm.damage_mut().take_and_clear();
        let pointer = self.vm.pointer();
        if damage.is_empty() && !self.cursor.needs_redraw(pointer) {
            return Ok(());
        }

        let Some(handle) = self.interpreter.display_bits(size.width, size.height) else {
            return Ok(());
        };
        let bitmap = PeerBitmap::new(&self.interpreter, handle);
        self.blitter.blit(&bitmap, size, damage, &mut self.screen)?;
        self.cursor
            .render(&self.blitter, &bitmap, size, pointer, &mut self.screen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KeyboardInput;
    use crate::queue::INPUT_QUEUE_CAPACITY;
    use crate::traits::{BitmapHandle, Semaphore};
    use bluebook_display::CursorGlyph;
    use bluebook_hal::{Clock, DelayNs, Host, NoKeyboard, RawKey};
    use bluebook_protocol::{StreamDecoder, StreamItem};
    use embedded_graphics::prelude::{OriginDimensions, Size};
    use embedded_graphics::Pixel;
    use std::collections::VecDeque;
    use std::vec::Vec;

    struct TestClock {
        ticks: u32,
        unix: u32,
    }

    impl Clock for TestClock {
        fn ticks_ms(&self) -> u32 {
            self.ticks
        }

        fn unix_time_secs(&self) -> u32 {
            self.unix
        }
    }

    #[derive(Default)]
    struct TestKeyboard {
        pending: Vec<RawKey>,
    }

    impl RawKeyboard for TestKeyboard {
        fn poll_keys(&mut self) -> KeyReport {
            let mut report = KeyReport::new();
            for key in self.pending.drain(..) {
                report.push(key).unwrap();
            }
            report
        }
    }

    #[derive(Default)]
    struct TestCookedKeyboard {
        pending: VecDeque<&'static [u8]>,
    }

    impl CookedKeyboard for TestCookedKeyboard {
        fn poll_sequence(&mut self) -> Option<KeySequence> {
            self.pending
                .pop_front()
                .map(|bytes| KeySequence::from_slice(bytes).unwrap())
        }
    }

    #[derive(Default)]
    struct TestMouse {
        state: MouseState,
        moved_to: Option<(i32, i32)>,
    }

    impl Mouse for TestMouse {
        fn state(&mut self) -> MouseState {
            self.state
        }

        fn set_position(&mut self, x: i32, y: i32) {
            self.moved_to = Some((x, y));
            self.state.x = x;
            self.state.y = y;
        }
    }

    #[derive(Default)]
    struct TestDelay {
        total_ms: u32,
    }

    impl DelayNs for TestDelay {
        fn delay_ns(&mut self, _ns: u32) {}

        fn delay_ms(&mut self, ms: u32) {
            self.total_ms += ms;
        }
    }

    /// Something the interpreter does during a frame
    enum Action {
        RegisterInput(u32),
        DisplaySize(u16, u16),
        Damage(i32, i32, i32, i32),
        SignalAt(Option<u32>, u32),
        CursorImage(CursorGlyph),
        CursorLocation(i32, i32),
        Quit,
    }

    /// Interpreter that replays one batch of actions per frame
    ///
    /// The low-memory check runs once at the start of every frame, so it is
    /// used to advance to the next batch.
    struct TestInterpreter {
        frames: VecDeque<Vec<Action>>,
        current: Vec<Action>,
        bitmap: Vec<u16>,
        cycles: u32,
        received: Vec<u16>,
        signals: Vec<Semaphore>,
        /// Step count at each signal
        signal_cycles: Vec<u32>,
    }

    impl TestInterpreter {
        fn new(frames: Vec<Vec<Action>>) -> Self {
            Self {
                frames: frames.into(),
                current: Vec::new(),
                bitmap: Vec::new(),
                cycles: 0,
                received: Vec::new(),
                signals: Vec::new(),
                signal_cycles: Vec::new(),
            }
        }

        fn decoded(&self) -> Vec<StreamItem> {
            let mut items = Vec::new();
            StreamDecoder::new()
                .decode_all(&self.received, |item| items.push(item))
                .unwrap();
            items
        }

        fn apply(vm: &mut VmContext<'_>, action: Action) {
            match action {
                Action::RegisterInput(semaphore) => {
                    vm.set_input_semaphore(Some(Semaphore(semaphore)))
                }
                Action::DisplaySize(width, height) => vm.set_display_size(width, height),
                Action::Damage(x, y, w, h) => vm.display_changed(x, y, w, h),
                Action::SignalAt(semaphore, tick) => vm.signal_at(semaphore.map(Semaphore), tick),
                Action::CursorImage(glyph) => vm.set_cursor_image(&glyph),
                Action::CursorLocation(x, y) => vm.set_cursor_location(x, y),
                Action::Quit => vm.signal_quit(),
            }
        }
    }

    impl Interpreter for TestInterpreter {
        fn asynchronous_signal(&mut self, semaphore: Semaphore) {
            self.signals.push(semaphore);
            self.signal_cycles.push(self.cycles);
        }

        fn display_bits(&mut self, _width: u16, _height: u16) -> Option<BitmapHandle> {
            (!self.bitmap.is_empty()).then_some(BitmapHandle(1))
        }

        fn fetch_display_word(&self, index: usize, _bitmap: BitmapHandle) -> u16 {
            self.bitmap.get(index).copied().unwrap_or(0)
        }

        fn cycle(&mut self, vm: &mut VmContext<'_>) {
            self.cycles += 1;
            while let Some(word) = vm.next_input_word() {
                self.received.push(word);
            }
            for action in self.current.drain(..) {
                Self::apply(vm, action);
            }
        }

        fn check_low_memory_conditions(&mut self) {
            self.current = self.frames.pop_front().unwrap_or_default();
        }
    }

    struct TestScreen {
        size: Size,
        writes: Vec<Pixel<Rgb888>>,
    }

    impl TestScreen {
        fn new(width: u32, height: u32) -> Self {
            Self {
                size: Size::new(width, height),
                writes: Vec::new(),
            }
        }
    }

    impl OriginDimensions for TestScreen {
        fn size(&self) -> Size {
            self.size
        }
    }

    impl DrawTarget for TestScreen {
        type Color = Rgb888;
        type Error = core::convert::Infallible;

        fn draw_iter<It>(&mut self, pixels: It) -> Result<(), Self::Error>
        where
            It: IntoIterator<Item = Pixel<Self::Color>>,
        {
            self.writes.extend(pixels);
            Ok(())
        }
    }

    type TestHost<R, C> = Host<TestClock, R, C, TestMouse, TestDelay>;
    type RawBridge = Bridge<TestHost<TestKeyboard, NoKeyboard>, TestInterpreter, TestScreen>;

    fn host() -> TestHost<TestKeyboard, NoKeyboard> {
        Host::new(
            TestClock {
                ticks: 1000,
                unix: 1_700_000_000,
            },
            KeyboardSource::Raw(TestKeyboard::default()),
            TestMouse::default(),
            TestDelay::default(),
        )
    }

    fn bridge_on(screen: TestScreen, frames: Vec<Vec<Action>>) -> RawBridge {
        Bridge::new(
            BridgeConfig {
                cycles_per_frame: MIN_CYCLES,
                ..BridgeConfig::default()
            },
            host(),
            TestInterpreter::new(frames),
            screen,
        )
        .unwrap()
    }

    fn bridge(frames: Vec<Vec<Action>>) -> RawBridge {
        bridge_on(TestScreen::new(64, 32), frames)
    }

    fn press(bridge: &mut RawBridge, key: RawKey) {
        if let KeyboardSource::Raw(keyboard) = &mut bridge.platform_mut().keyboard {
            keyboard.pending.push(key);
        }
    }

    const MIN_CYCLES: u16 = crate::config::MIN_CYCLES_PER_FRAME;

    #[test]
    fn test_idle_frame_does_nothing() {
        let mut bridge = bridge(Vec::new());
        assert_eq!(bridge.run_frame(), Ok(FrameOutcome::Continue));

        assert_eq!(bridge.interpreter().cycles, u32::from(MIN_CYCLES));
        assert!(bridge.interpreter().signals.is_empty());
        assert!(bridge.interpreter().received.is_empty());
        assert!(bridge.screen().writes.is_empty());
        assert_eq!(bridge.platform_mut().delay.total_ms, 0);
    }

    #[test]
    fn test_no_render_without_changes() {
        let mut bridge = bridge(vec![vec![Action::DisplaySize(32, 16)]]);
        bridge.interpreter_mut().bitmap = vec![0xFFFF; 2 * 16];

        bridge.run_frame().unwrap();
        assert!(!bridge.screen().writes.is_empty());

        let before = bridge.screen().writes.len();
        bridge.run_frame().unwrap();
        assert_eq!(bridge.screen().writes.len(), before);
    }

    #[test]
    fn test_input_ignored_until_semaphore_registered() {
        let mut bridge = bridge(vec![vec![Action::RegisterInput(5)]]);
        press(&mut bridge, RawKey::new(0x04, 0));

        // Registration happens during this frame's steps
        bridge.run_frame().unwrap();
        assert!(bridge.interpreter().signals.is_empty());
        assert!(bridge.interpreter().received.is_empty());

        // The key is still waiting in the host keyboard
        bridge.run_frame().unwrap();
        assert_eq!(bridge.interpreter().signals, vec![Semaphore(5); 3]);
        assert_eq!(
            bridge.interpreter().decoded(),
            [StreamItem::Delay(0), StreamItem::Down(97), StreamItem::Up(97)]
        );
    }

    #[test]
    fn test_control_letter_reaches_interpreter() {
        let mut bridge = bridge(vec![vec![Action::RegisterInput(5)]]);
        bridge.run_frame().unwrap();

        press(&mut bridge, RawKey::new(0x06, 0x10));
        bridge.run_frame().unwrap();
        assert_eq!(
            bridge.interpreter().decoded(),
            [
                StreamItem::Delay(0),
                StreamItem::Down(138),
                StreamItem::Down(99),
                StreamItem::Up(99),
                StreamItem::Up(138),
            ]
        );
    }

    #[test]
    fn test_ignored_keys_queue_nothing() {
        let mut bridge = bridge(vec![vec![Action::RegisterInput(5)]]);
        bridge.run_frame().unwrap();

        // Meta combination and a code above 127
        press(&mut bridge, RawKey::new(0x04, 0x08));
        press(&mut bridge, RawKey::new(0xE0, 0));
        bridge.run_frame().unwrap();
        assert!(bridge.interpreter().signals.is_empty());
        assert!(bridge.interpreter().received.is_empty());
    }

    #[test]
    fn test_mouse_motion_and_buttons() {
        let mut bridge = bridge(vec![vec![
            Action::RegisterInput(5),
            Action::DisplaySize(64, 32),
        ]]);
        bridge.run_frame().unwrap();
        bridge.run_frame().unwrap();
        // First poll only records the position
        assert!(bridge.interpreter().received.is_empty());

        bridge.platform_mut().clock.ticks = 1020;
        bridge.platform_mut().mouse.state = MouseState {
            x: 100,
            y: 7,
            buttons: 0x01,
        };
        bridge.run_frame().unwrap();

        // Buttons first, then the coordinate pair
        assert_eq!(
            bridge.interpreter().decoded(),
            [
                StreamItem::Delay(0),
                StreamItem::Down(130),
                StreamItem::Delay(0),
                StreamItem::Coordinate(63),
                StreamItem::Delay(0),
                StreamItem::Coordinate(7),
            ]
        );
        assert_eq!(bridge.vm().pointer(), (63, 7));

        bridge.platform_mut().clock.ticks = 1050;
        bridge.platform_mut().mouse.state.buttons = 0;
        bridge.run_frame().unwrap();
        let items = bridge.interpreter().decoded();
        assert_eq!(&items[6..], [StreamItem::Delay(30), StreamItem::Up(130)]);
    }

    #[test]
    fn test_coordinate_pair_dropped_together() {
        let mut bridge = bridge(vec![vec![
            Action::RegisterInput(5),
            Action::DisplaySize(64, 32),
        ]]);
        bridge.run_frame().unwrap();
        bridge.run_frame().unwrap();

        // Leave two free words
        let queue = bridge.vm_mut().queue_mut();
        while queue.len() + 6 <= INPUT_QUEUE_CAPACITY - 2 {
            queue.push_event(1000, 0, &[EventWord::down(1); 5]).unwrap();
        }
        queue.push_event(1000, 0, &[EventWord::down(1)]).unwrap();
        assert_eq!(INPUT_QUEUE_CAPACITY - queue.len(), 2);

        bridge.platform_mut().mouse.state.x = 10;
        bridge.platform_mut().mouse.state.y = 20;
        bridge.run_frame().unwrap();
        let items = bridge.interpreter().decoded();
        assert!(!items.iter().any(|item| matches!(item, StreamItem::Coordinate(_))));
        assert_eq!(bridge.vm().queue().dropped_events(), 1);

        // The stream stays in step: the next move arrives as a whole pair
        bridge.platform_mut().mouse.state.x = 11;
        bridge.run_frame().unwrap();
        let items = bridge.interpreter().decoded();
        assert_eq!(
            &items[items.len() - 4..],
            [
                StreamItem::Delay(0),
                StreamItem::Coordinate(11),
                StreamItem::Delay(0),
                StreamItem::Coordinate(20),
            ]
        );
    }

    #[test]
    fn test_pointer_tracked_before_registration() {
        let mut bridge = bridge(vec![vec![Action::DisplaySize(64, 32)]]);
        bridge.run_frame().unwrap();

        bridge.platform_mut().mouse.state.x = 5;
        bridge.platform_mut().mouse.state.y = 6;
        bridge.run_frame().unwrap();
        assert_eq!(bridge.vm().pointer(), (5, 6));
        assert!(bridge.interpreter().received.is_empty());
        assert!(bridge.interpreter().signals.is_empty());
    }

    #[test]
    #[should_panic(expected = "contract violation: input queued without an input semaphore")]
    fn test_queueing_without_semaphore_is_fatal() {
        let mut bridge = bridge(Vec::new());
        bridge.queue_event(1000, 0, &[EventWord::down(97)]);
    }

    #[test]
    fn test_past_wake_fires_after_scheduling_step() {
        let mut bridge = bridge(vec![vec![Action::SignalAt(Some(9), 900)]]);
        bridge.run_frame().unwrap();
        assert_eq!(bridge.interpreter().signals, vec![Semaphore(9)]);
        // Delivered right after the first step, before the second
        assert_eq!(bridge.interpreter().signal_cycles, vec![1]);

        bridge.run_frame().unwrap();
        assert_eq!(bridge.interpreter().signals, vec![Semaphore(9)]);
        assert!(!bridge.vm().wake().is_pending());
    }

    #[test]
    fn test_scheduled_wake_fires_once() {
        let mut bridge = bridge(vec![vec![Action::SignalAt(Some(9), 1000)]]);
        bridge.run_frame().unwrap();
        assert!(bridge.interpreter().signals.is_empty());

        bridge.platform_mut().clock.ticks = 1001;
        bridge.run_frame().unwrap();
        assert_eq!(bridge.interpreter().signals, vec![Semaphore(9)]);

        bridge.run_frame().unwrap();
        assert_eq!(bridge.interpreter().signals, vec![Semaphore(9)]);
        assert!(!bridge.vm().wake().is_pending());
    }

    #[test]
    fn test_cancelled_wake_never_fires() {
        let mut bridge = bridge(vec![
            vec![Action::SignalAt(Some(9), 2000)],
            vec![Action::SignalAt(None, 0)],
        ]);
        bridge.run_frame().unwrap();
        bridge.run_frame().unwrap();
        bridge.platform_mut().clock.ticks = 5000;
        bridge.run_frame().unwrap();
        assert!(bridge.interpreter().signals.is_empty());
    }

    #[test]
    fn test_quit_stops_loop() {
        let mut bridge = bridge(vec![Vec::new(), vec![Action::Quit]]);
        bridge.run().unwrap();
        assert_eq!(bridge.interpreter().cycles, u32::from(MIN_CYCLES) + 1);
    }

    #[test]
    fn test_damage_render_and_cursor() {
        let mut bridge = bridge_on(
            TestScreen::new(32, 16),
            vec![
                vec![Action::DisplaySize(32, 16)],
                vec![Action::CursorImage([0; 16])],
                vec![Action::Damage(17, 3, 2, 2)],
            ],
        );
        bridge.interpreter_mut().bitmap = vec![0; 2 * 16];

        // Whole display, the band under the cursor, then the 50-pixel arrow
        bridge.run_frame().unwrap();
        assert_eq!(bridge.screen().writes.len(), 32 * 16 + 16 * 16 + 50);

        // New (empty) glyph: the band is restored and nothing is stamped
        bridge.screen.writes.clear();
        bridge.run_frame().unwrap();
        assert_eq!(bridge.screen().writes.len(), 16 * 16);

        // Damage widened to word column 1 for rows 3 and 4
        bridge.screen.writes.clear();
        bridge.run_frame().unwrap();
        assert_eq!(bridge.screen().writes.len(), 2 * 16 + 16 * 16);
        assert!(bridge.screen().writes[..32]
            .iter()
            .all(|Pixel(point, _)| (16..32).contains(&point.x) && (3..5).contains(&point.y)));
        assert!(bridge.vm().damage().current().is_empty());
    }

    #[test]
    fn test_render_is_centered_and_colored() {
        let mut bridge = bridge_on(TestScreen::new(24, 1), vec![vec![Action::DisplaySize(16, 1)]]);
        bridge.interpreter_mut().bitmap = vec![0x8000];
        bridge.run_frame().unwrap();

        // Origin is (4, 0); bit 15 is the leftmost pixel, black on white
        let Pixel(point, color) = bridge.screen().writes[15];
        assert_eq!((point.x, point.y), (4, 0));
        assert_eq!(color, Rgb888::new(0, 0, 0));
        let Pixel(point, color) = bridge.screen().writes[14];
        assert_eq!((point.x, point.y), (5, 0));
        assert_eq!(color, Rgb888::new(0xFF, 0xFF, 0xFF));
    }

    #[test]
    fn test_missing_bitmap_still_clears_damage() {
        let mut bridge = bridge(vec![vec![Action::DisplaySize(32, 16)]]);
        bridge.run_frame().unwrap();
        assert!(bridge.screen().writes.is_empty());
        assert!(!bridge.vm().damage().is_dirty());
    }

    #[test]
    fn test_cursor_location_moves_host_pointer() {
        let mut bridge = bridge_on(
            TestScreen::new(48, 16),
            vec![
                vec![Action::DisplaySize(32, 16)],
                vec![Action::CursorLocation(10, 5)],
            ],
        );
        bridge.run_frame().unwrap();
        bridge.run_frame().unwrap();
        assert_eq!(bridge.platform_mut().mouse.moved_to, None);

        // Applied at the start of the next frame, shifted by the centering offset
        bridge.run_frame().unwrap();
        assert_eq!(bridge.platform_mut().mouse.moved_to, Some((18, 5)));
        // The pointer read back from the host matches the request
        assert_eq!(bridge.vm().pointer(), (10, 5));
    }

    #[test]
    fn test_frame_delay_without_vsync() {
        let mut bridge = Bridge::new(
            BridgeConfig {
                cycles_per_frame: MIN_CYCLES,
                novsync_delay_ms: 15,
                ..BridgeConfig::default()
            },
            host(),
            TestInterpreter::new(Vec::new()),
            TestScreen::new(8, 8),
        )
        .unwrap();
        bridge.run_frame().unwrap();
        bridge.run_frame().unwrap();
        assert_eq!(bridge.platform_mut().delay.total_ms, 30);
    }

    #[test]
    fn test_cooked_keyboard() {
        let mut cooked = TestCookedKeyboard::default();
        cooked.pending.push_back(b"\x1bx");
        let host: TestHost<NoKeyboard, TestCookedKeyboard> = Host::new(
            TestClock { ticks: 0, unix: 0 },
            KeyboardSource::Cooked(cooked),
            TestMouse::default(),
            TestDelay::default(),
        );
        let mut config = BridgeConfig {
            cycles_per_frame: MIN_CYCLES,
            ..BridgeConfig::default()
        };
        config.keyboard.mode = KeyboardInput::Cooked;
        let mut bridge = Bridge::new(
            config,
            host,
            TestInterpreter::new(vec![vec![Action::RegisterInput(1)]]),
            TestScreen::new(8, 8),
        )
        .unwrap();

        bridge.run_frame().unwrap();
        bridge.run_frame().unwrap();
        assert_eq!(
            bridge.interpreter().decoded(),
            [
                StreamItem::Delay(0),
                StreamItem::Down(136),
                StreamItem::Down(120),
                StreamItem::Up(120),
                StreamItem::Up(136),
            ]
        );
    }

    #[test]
    fn test_keyboard_mode_must_match_host() {
        let mut config = BridgeConfig::default();
        config.keyboard.mode = KeyboardInput::Cooked;
        let result = Bridge::new(
            config,
            host(),
            TestInterpreter::new(Vec::new()),
            TestScreen::new(8, 8),
        );
        assert!(matches!(result, Err(ConfigError::KeyboardMismatch)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = BridgeConfig {
            cycles_per_frame: 10,
            ..BridgeConfig::default()
        };
        let result = Bridge::new(
            config,
            host(),
            TestInterpreter::new(Vec::new()),
            TestScreen::new(8, 8),
        );
        assert!(matches!(result, Err(ConfigError::OutOfRange("cycles_per_frame"))));
    }
}
