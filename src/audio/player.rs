use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crossbeam_channel::Sender;

use super::morse::{encode, symbols, MorseSymbol, TimingParams};
use crate::messages::{AudioCommand, ToneBurst};

/// Source of "now" for the scheduler, measured from an arbitrary origin
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall clock backed by `Instant`
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Receives the tone bursts fired by the player
pub trait ToneSink {
    fn emit(&mut self, burst: ToneBurst);
}

impl ToneSink for Sender<AudioCommand> {
    fn emit(&mut self, burst: ToneBurst) {
        if self.try_send(AudioCommand::PlayBurst(burst)).is_err() {
            log::warn!("audio command queue full, dropping burst");
        }
    }
}

/// Current state of the real-time player
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerState {
    Idle,
    Playing,
    Paused,
}

/// One symbol waiting for its due time
#[derive(Clone, Copy, Debug)]
struct ScheduledSymbol {
    due: Duration,
    index: usize,
    symbol: MorseSymbol,
}

/// Transient playback state: what is still scheduled and where to resume
#[derive(Debug, Default)]
pub struct PlaybackSession {
    pending: VecDeque<ScheduledSymbol>,
    paused: bool,
    resume_index: usize,
}

impl PlaybackSession {
    /// Drop every not-yet-fired symbol and mark the session paused
    fn cancel_all(&mut self) {
        self.pending.clear();
        self.paused = true;
    }
}

/// Plays a Morse sequence against a clock, one burst per dot/dash.
///
/// Nothing runs on its own: the owner calls [`Player::tick`] regularly
/// (once per UI frame) and every symbol whose due time has passed fires
/// in sequence order.
pub struct Player<C: Clock> {
    clock: C,
    session: PlaybackSession,
    params: TimingParams,
    symbol_count: usize,
}

impl<C: Clock> Player<C> {
    pub fn new(clock: C, params: TimingParams) -> Self {
        Self {
            clock,
            session: PlaybackSession::default(),
            params,
            symbol_count: 0,
        }
    }

    pub fn state(&self) -> PlayerState {
        if self.session.paused {
            PlayerState::Paused
        } else if self.session.pending.is_empty() {
            PlayerState::Idle
        } else {
            PlayerState::Playing
        }
    }

    /// Index of the next symbol that has not fired yet
    pub fn resume_index(&self) -> usize {
        self.session.resume_index
    }

    /// Number of symbols in the sequence being played
    pub fn symbol_count(&self) -> usize {
        self.symbol_count
    }

    /// Encode `text` and schedule its symbols from `start_index` onward,
    /// with the first one due immediately.
    pub fn play(&mut self, text: &str, params: TimingParams, start_index: usize) {
        self.session.cancel_all();
        self.session.paused = false;
        self.session.resume_index = start_index;
        self.params = params;

        let symbols = symbols(&encode(text));
        self.symbol_count = symbols.len();

        let timer = params.timer();
        let base = self.clock.now();
        let mut delay = 0.0;
        for (index, symbol) in symbols.into_iter().enumerate().skip(start_index) {
            self.session.pending.push_back(ScheduledSymbol {
                due: base + Duration::from_secs_f64(delay),
                index,
                symbol,
            });
            delay += timer.seconds(symbol.timing().total_units());
        }

        log::debug!(
            "scheduled {} symbols from index {} ({:.2}s at {} wpm)",
            self.session.pending.len(),
            start_index,
            delay,
            params.wpm
        );
    }

    /// Cancel everything still scheduled; the resume cursor is kept
    pub fn pause(&mut self) {
        self.session.cancel_all();
        log::debug!("paused at symbol {}", self.session.resume_index);
    }

    /// Continue from the resume cursor with timing restarted at "now".
    /// Does nothing unless paused.
    pub fn resume(&mut self, text: &str, params: TimingParams) {
        if self.session.paused {
            let start_index = self.session.resume_index;
            self.play(text, params, start_index);
        }
    }

    pub fn restart(&mut self, text: &str, params: TimingParams) {
        self.play(text, params, 0);
    }

    /// Time until the next scheduled symbol is due, zero if one is overdue.
    /// `None` when nothing is scheduled.
    pub fn time_until_next(&self) -> Option<Duration> {
        let now = self.clock.now();
        self.session
            .pending
            .front()
            .map(|next| next.due.saturating_sub(now))
    }

    /// Fire every symbol that is due. Returns how many fired.
    ///
    /// A symbol overdue by more than one unit (the owner stalled) still
    /// advances the cursor but emits no tone, so a late tick never stacks
    /// a backlog of bursts on top of each other.
    pub fn tick<S: ToneSink + ?Sized>(&mut self, sink: &mut S) -> usize {
        let now = self.clock.now();
        let late_after = self.params.timer().duration(1);
        let mut fired = 0;
        let mut skipped = 0;

        while let Some(next) = self.session.pending.front() {
            if next.due > now {
                break;
            }
            let Some(event) = self.session.pending.pop_front() else {
                break;
            };

            if !self.session.paused {
                if let Some(burst) = self.burst_for(event.symbol) {
                    if now - event.due > late_after {
                        skipped += 1;
                    } else {
                        sink.emit(burst);
                    }
                }
                self.session.resume_index = event.index + 1;
            }
            fired += 1;
        }

        if skipped > 0 {
            log::debug!("skipped {} stale tones after a late tick", skipped);
        }

        if fired > 0 && self.session.pending.is_empty() && !self.session.paused {
            log::debug!("playback finished");
        }

        fired
    }

    fn burst_for(&self, symbol: MorseSymbol) -> Option<ToneBurst> {
        if !symbol.is_tone() {
            return None;
        }
        Some(ToneBurst {
            frequency_hz: self.params.tone_hz,
            duration: self.params.timer().duration(symbol.timing().tone_units),
            amplitude: self.params.volume,
        })
    }

    #[cfg(test)]
    fn pending_due_times(&self) -> Vec<Duration> {
        self.session.pending.iter().map(|event| event.due).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::morse::text_to_symbols;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Clock that only moves when told to
    #[derive(Clone, Default)]
    struct ManualClock {
        now: Rc<Cell<Duration>>,
    }

    impl ManualClock {
        fn advance(&self, by: Duration) {
            self.now.set(self.now.get() + by);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Duration {
            self.now.get()
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        bursts: Vec<ToneBurst>,
    }

    impl ToneSink for RecordingSink {
        fn emit(&mut self, burst: ToneBurst) {
            self.bursts.push(burst);
        }
    }

    fn params() -> TimingParams {
        TimingParams::new(600.0, 20, 0.5)
    }

    fn player() -> (Player<ManualClock>, ManualClock) {
        let clock = ManualClock::default();
        (Player::new(clock.clone(), params()), clock)
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn millis(duration: Duration) -> f64 {
        duration.as_secs_f64() * 1000.0
    }

    fn assert_millis(actual: &[Duration], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((millis(*a) - e).abs() < 1e-3, "{:?} != {}ms", a, e);
        }
    }

    #[test]
    fn test_new_player_is_idle() {
        let (player, _) = player();
        assert_eq!(player.state(), PlayerState::Idle);
        assert_eq!(player.resume_index(), 0);
    }

    #[test]
    fn test_play_fires_first_symbol_immediately() {
        let (mut player, _) = player();
        let mut sink = RecordingSink::default();
        player.play("SOS", params(), 0);
        assert_eq!(player.state(), PlayerState::Playing);
        assert_eq!(player.symbol_count(), 11);

        assert_eq!(player.tick(&mut sink), 1);
        assert_eq!(sink.bursts.len(), 1);
        let burst = sink.bursts[0];
        assert_eq!(burst.frequency_hz, 600.0);
        assert_eq!(burst.amplitude, 0.5);
        assert_millis(&[burst.duration], &[60.0]);
        assert_eq!(player.resume_index(), 1);
    }

    #[test]
    fn test_schedule_follows_timing_model() {
        let (mut player, _) = player();
        player.play("SOS", params(), 0);
        // dot=2u, letter gap=3u, dash=4u; 1u = 60ms
        assert_millis(
            &player.pending_due_times(),
            &[
                0.0, 120.0, 240.0, 360.0, 540.0, 780.0, 1020.0, 1260.0, 1440.0, 1560.0, 1680.0,
            ],
        );
    }

    #[test]
    fn test_dropped_char_adds_letter_gap() {
        let (mut player, _) = player();
        player.play("E!T", params(), 0);
        // dot 2u, two letter gaps of 3u each, then the dash
        assert_millis(&player.pending_due_times(), &[0.0, 120.0, 300.0, 480.0]);
    }

    #[test]
    fn test_full_playback_emits_every_tone() {
        let (mut player, clock) = player();
        let mut sink = RecordingSink::default();
        player.play("SOS", params(), 0);

        let mut fired = 0;
        for _ in 0..100 {
            fired += player.tick(&mut sink);
            clock.advance(ms(20));
        }

        assert_eq!(fired, 11);
        assert_eq!(player.state(), PlayerState::Idle);
        assert_eq!(player.resume_index(), 11);
        let lengths: Vec<Duration> = sink.bursts.iter().map(|b| b.duration).collect();
        assert_millis(
            &lengths,
            &[60.0, 60.0, 60.0, 180.0, 180.0, 180.0, 60.0, 60.0, 60.0],
        );
    }

    #[test]
    fn test_gaps_emit_no_tone() {
        let (mut player, clock) = player();
        let mut sink = RecordingSink::default();
        player.play("   ", params(), 0);
        clock.advance(Duration::from_secs(10));
        assert_eq!(player.tick(&mut sink), 5);
        assert!(sink.bursts.is_empty());
    }

    #[test]
    fn test_pause_cancels_pending() {
        let (mut player, clock) = player();
        let mut sink = RecordingSink::default();
        player.play("SOS", params(), 0);
        player.tick(&mut sink);

        player.pause();
        assert_eq!(player.state(), PlayerState::Paused);
        clock.advance(Duration::from_secs(10));
        assert_eq!(player.tick(&mut sink), 0);
        assert_eq!(sink.bursts.len(), 1);
        assert_eq!(player.resume_index(), 1);
    }

    #[test]
    fn test_pause_resume_continues_at_cursor() {
        let (mut player, clock) = player();
        let mut sink = RecordingSink::default();
        player.play("SOS", params(), 0);

        // First S and the letter gap: indices 0..=3 are due by 400ms
        let mut fired = 0;
        for _ in 0..=20 {
            fired += player.tick(&mut sink);
            clock.advance(ms(20));
        }
        assert_eq!(fired, 4);
        player.pause();
        assert_eq!(player.resume_index(), 4);
        assert_eq!(sink.bursts.len(), 3);

        clock.advance(Duration::from_secs(5));
        player.resume("SOS", params());
        assert_eq!(player.state(), PlayerState::Playing);
        assert_eq!(player.pending_due_times().len(), 7);
        assert_eq!(player.pending_due_times()[0], clock.now());

        // The next burst is the first dash of O
        assert_eq!(player.tick(&mut sink), 1);
        assert_millis(&[sink.bursts[3].duration], &[180.0]);
        assert_eq!(player.resume_index(), 5);

        for _ in 0..100 {
            clock.advance(ms(20));
            player.tick(&mut sink);
        }
        assert_eq!(sink.bursts.len(), 9);
        assert_eq!(player.state(), PlayerState::Idle);
    }

    #[test]
    fn test_pause_before_first_fire_resumes_at_start() {
        let (mut player, clock) = player();
        let mut sink = RecordingSink::default();
        player.play("SOS", params(), 0);
        clock.advance(Duration::from_secs(5));
        player.tick(&mut sink);

        player.restart("SOS", params());
        player.pause();
        assert_eq!(player.resume_index(), 0);
    }

    #[test]
    fn test_resume_without_pause_is_noop() {
        let (mut player, _) = player();
        let mut sink = RecordingSink::default();
        player.play("E", params(), 0);
        player.tick(&mut sink);
        player.resume("E", params());
        assert_eq!(player.state(), PlayerState::Idle);
        assert_eq!(sink.bursts.len(), 1);
    }

    #[test]
    fn test_late_tick_skips_stale_tones() {
        let (mut player, clock) = player();
        let mut sink = RecordingSink::default();
        player.play("SOS", params(), 0);

        // Window stalled until 20ms after the last dot was due
        clock.advance(ms(1700));
        assert_eq!(player.tick(&mut sink), 11);
        assert_eq!(player.resume_index(), 11);
        assert_eq!(player.state(), PlayerState::Idle);
        assert_eq!(sink.bursts.len(), 1);
        assert_millis(&[sink.bursts[0].duration], &[60.0]);
    }

    #[test]
    fn test_time_until_next() {
        let (mut player, clock) = player();
        let mut sink = RecordingSink::default();
        assert_eq!(player.time_until_next(), None);

        player.play("E", params(), 0);
        assert_eq!(player.time_until_next(), Some(Duration::ZERO));
        clock.advance(ms(5));
        assert_eq!(player.time_until_next(), Some(Duration::ZERO));
        player.tick(&mut sink);
        assert_eq!(player.time_until_next(), None);

        player.play("EE", params(), 0);
        player.tick(&mut sink);
        let wait = player.time_until_next().unwrap();
        assert!((millis(wait) - 120.0).abs() < 1e-3);
    }

    #[test]
    fn test_restart_replays_from_beginning() {
        let (mut player, clock) = player();
        let mut sink = RecordingSink::default();
        player.play("SOS", params(), 0);
        clock.advance(ms(600));
        player.tick(&mut sink);

        player.restart("SOS", params());
        assert_eq!(player.resume_index(), 0);
        assert_eq!(player.pending_due_times().len(), 11);
    }

    #[test]
    fn test_play_uses_new_params() {
        let (mut player, _) = player();
        let mut sink = RecordingSink::default();
        player.play("T", TimingParams::new(800.0, 10, 0.25), 0);
        player.tick(&mut sink);
        let burst = sink.bursts[0];
        assert_eq!(burst.frequency_hz, 800.0);
        assert_eq!(burst.amplitude, 0.25);
        assert_millis(&[burst.duration], &[360.0]);
    }

    #[test]
    fn test_empty_text_schedules_nothing() {
        let (mut player, _) = player();
        player.play("", params(), 0);
        assert_eq!(player.state(), PlayerState::Idle);
        assert_eq!(player.symbol_count(), 0);
    }

    #[test]
    fn test_schedule_span_matches_unit_sum() {
        let (mut player, _) = player();
        let text = "CQ DE 73";
        player.play(text, params(), 0);
        let symbols = text_to_symbols(text);
        let timer = params().timer();

        let due = player.pending_due_times();
        let last = *symbols.last().unwrap();
        let span = due.last().unwrap().as_secs_f64()
            + timer.seconds(last.timing().total_units());
        let units: u32 = symbols.iter().map(|s| s.timing().total_units()).sum();
        assert!((span - timer.seconds(units)).abs() < 1e-6);
    }
}
