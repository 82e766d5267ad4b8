//! Interpreter input queue
//!
//! Bounded FIFO of protocol words. Each logical event is queued together
//! with its timestamp frame or not at all, so the consumer never sees a
//! torn frame. The interpreter is woken through its input semaphore; the
//! signals are counted here and delivered by the frame loop.

use bluebook_protocol::{EventWord, TimestampEncoder, TimestampFrame};
use heapless::Deque;

use crate::config::WakePolicy;
use crate::error::ContractViolation;
use crate::traits::Semaphore;

/// Queue capacity in words
pub const INPUT_QUEUE_CAPACITY: usize = 256;

/// Outcome of queueing an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pushed {
    /// All words queued
    Queued {
        /// Words added, including the timestamp frame
        words: usize,
    },
    /// Queue full; nothing was added
    Dropped,
}

/// Pending input words for the interpreter
#[derive(Debug)]
pub struct InputQueue {
    words: Deque<u16, INPUT_QUEUE_CAPACITY>,
    semaphore: Option<Semaphore>,
    encoder: TimestampEncoder,
    policy: WakePolicy,
    /// Signals owed to the input semaphore
    pending_signals: u16,
    dropped_events: u32,
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new(WakePolicy::default())
    }
}

impl InputQueue {
    /// Create an empty queue with no semaphore registered
    pub const fn new(policy: WakePolicy) -> Self {
        Self {
            words: Deque::new(),
            semaphore: None,
            encoder: TimestampEncoder::new(),
            policy,
            pending_signals: 0,
            dropped_events: 0,
        }
    }

    /// Register (or clear) the semaphore signalled for new input
    pub fn set_semaphore(&mut self, semaphore: Option<Semaphore>) {
        self.semaphore = semaphore;
    }

    /// Registered input semaphore
    pub fn semaphore(&self) -> Option<Semaphore> {
        self.semaphore
    }

    /// Queue a logical event under one timestamp frame
    ///
    /// # Arguments
    /// - `now_ms`: Monotonic tick of the event
    /// - `unix_secs`: Wall-clock seconds, used for absolute frames
    /// - `words`: Event words sharing the timestamp
    pub fn push_event(
        &mut self,
        now_ms: u32,
        unix_secs: u32,
        words: &[EventWord],
    ) -> Result<Pushed, ContractViolation> {
        self.require_semaphore()?;

        let frame = self.encoder.frame_for(now_ms, unix_secs);
        let needed = frame.len() + words.len();
        if self.free() < needed {
            self.dropped_events = self.dropped_events.saturating_add(1);
            return Ok(Pushed::Dropped);
        }

        self.encoder.commit(now_ms);
        self.enqueue(&frame.words());
        for word in words {
            self.enqueue(&[word.raw()]);
        }
        Ok(Pushed::Queued { words: needed })
    }

    /// Queue several logical events, each under its own timestamp frame
    ///
    /// Either every event is queued or none is, so paired events such as
    /// an x and y coordinate stay together. A dropped group counts as one
    /// dropped event.
    pub fn push_events(
        &mut self,
        now_ms: u32,
        unix_secs: u32,
        events: &[&[EventWord]],
    ) -> Result<Pushed, ContractViolation> {
        self.require_semaphore()?;

        let mut encoder = self.encoder.clone();
        let needed: usize = events
            .iter()
            .map(|words| encoder.encode(now_ms, unix_secs).len() + words.len())
            .sum();
        if self.free() < needed {
            self.dropped_events = self.dropped_events.saturating_add(1);
            return Ok(Pushed::Dropped);
        }

        for words in events {
            let frame = self.encoder.encode(now_ms, unix_secs);
            self.enqueue(&frame.words());
            for word in *words {
                self.enqueue(&[word.raw()]);
            }
        }
        Ok(Pushed::Queued { words: needed })
    }

    /// Queue just a timestamp frame
    pub fn push_timestamp(
        &mut self,
        now_ms: u32,
        unix_secs: u32,
    ) -> Result<Pushed, ContractViolation> {
        self.require_semaphore()?;

        let frame: TimestampFrame = self.encoder.frame_for(now_ms, unix_secs);
        if self.free() < frame.len() {
            self.dropped_events = self.dropped_events.saturating_add(1);
            return Ok(Pushed::Dropped);
        }
        self.encoder.commit(now_ms);
        self.enqueue(&frame.words());
        Ok(Pushed::Queued { words: frame.len() })
    }

    /// Queue a single event word
    pub fn push_word(&mut self, word: EventWord) -> Result<Pushed, ContractViolation> {
        self.require_semaphore()?;

        if self.free() == 0 {
            self.dropped_events = self.dropped_events.saturating_add(1);
            return Ok(Pushed::Dropped);
        }
        self.enqueue(&[word.raw()]);
        Ok(Pushed::Queued { words: 1 })
    }

    /// Next word for the interpreter
    pub fn pop(&mut self) -> Option<u16> {
        self.words.pop_front()
    }

    /// Signals owed to the input semaphore since the last call
    pub fn take_pending_signals(&mut self) -> u16 {
        core::mem::take(&mut self.pending_signals)
    }

    /// Words waiting
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Nothing waiting
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Events dropped because the queue was full
    pub fn dropped_events(&self) -> u32 {
        self.dropped_events
    }

    /// Timestamp state
    pub fn encoder(&self) -> &TimestampEncoder {
        &self.encoder
    }

    fn require_semaphore(&self) -> Result<(), ContractViolation> {
        match self.semaphore {
            Some(_) => Ok(()),
            None => Err(ContractViolation::NoInputSemaphore),
        }
    }

    fn free(&self) -> usize {
        INPUT_QUEUE_CAPACITY - self.words.len()
    }

    /// Append words that are known to fit
    fn enqueue(&mut self, raw: &[u16]) {
        let was_empty = self.words.is_empty();
        for &word in raw {
            let _ = self.words.push_back(word);
        }
        let signals = match self.policy {
            WakePolicy::EveryWord => raw.len() as u16,
            WakePolicy::OnNonEmpty => u16::from(was_empty && !raw.is_empty()),
        };
        self.pending_signals = self.pending_signals.saturating_add(signals);
    }
}
