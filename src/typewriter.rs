use std::time::{Duration, Instant};

/// Character cadence of the reveal animation.
const CHAR_PERIOD: Duration = Duration::from_millis(15);

/// Reveals a fully-received answer string character by character.
///
/// Driven by the app tick loop: `tick` computes the revealed prefix
/// from elapsed time, so an uneven tick rate never skips or splices
/// characters. Starting a new answer replaces the old one outright;
/// there is only ever one reveal in flight.
#[derive(Debug, Default)]
pub struct Typewriter {
    full_text: String,
    total_chars: usize,
    revealed: usize,
    started_at: Option<Instant>,
}

impl Typewriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin revealing a new answer from the first character.
    pub fn start(&mut self, text: &str) {
        self.full_text = text.to_string();
        self.total_chars = text.chars().count();
        self.revealed = 0;
        self.started_at = None;
    }

    /// Show the whole text at once, skipping the animation. Used for
    /// content that was never streamed, like the built-in sample answer.
    pub fn reveal_all(&mut self) {
        self.revealed = self.total_chars;
        self.started_at = None;
    }

    /// Cancel the current reveal (a new request began).
    pub fn clear(&mut self) {
        self.full_text.clear();
        self.total_chars = 0;
        self.revealed = 0;
        self.started_at = None;
    }

    /// Advance the reveal; `now` is injected for testability.
    pub fn tick(&mut self, now: Instant) {
        if self.total_chars == 0 || self.revealed >= self.total_chars {
            return;
        }
        let started = *self.started_at.get_or_insert(now);
        let elapsed = now.saturating_duration_since(started);
        let chars = (elapsed.as_millis() / CHAR_PERIOD.as_millis()) as usize;
        self.revealed = chars.min(self.total_chars);
    }

    pub fn revealed_chars(&self) -> usize {
        self.revealed
    }

    pub fn is_complete(&self) -> bool {
        self.total_chars > 0 && self.revealed == self.total_chars
    }

    pub fn is_empty(&self) -> bool {
        self.total_chars == 0
    }

    /// The currently visible prefix, cut on a char boundary.
    pub fn visible(&self) -> &str {
        match self.full_text.char_indices().nth(self.revealed) {
            Some((byte_idx, _)) => &self.full_text[..byte_idx],
            None => &self.full_text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Typewriter, CHAR_PERIOD};
    use std::time::Instant;

    #[test]
    fn reveals_one_char_per_period() {
        let mut tw = Typewriter::new();
        tw.start("YES");
        let t0 = Instant::now();
        tw.tick(t0);
        assert_eq!(tw.revealed_chars(), 0);
        assert!(!tw.is_complete());

        tw.tick(t0 + CHAR_PERIOD);
        assert_eq!(tw.revealed_chars(), 1);
        assert_eq!(tw.visible(), "Y");

        tw.tick(t0 + 3 * CHAR_PERIOD);
        assert_eq!(tw.revealed_chars(), 3);
        assert_eq!(tw.visible(), "YES");
        assert!(tw.is_complete());
    }

    #[test]
    fn reveal_never_runs_past_the_end() {
        let mut tw = Typewriter::new();
        tw.start("ok");
        let t0 = Instant::now();
        tw.tick(t0);
        tw.tick(t0 + 50 * CHAR_PERIOD);
        assert_eq!(tw.revealed_chars(), 2);
        assert!(tw.is_complete());
    }

    #[test]
    fn new_answer_resets_the_reveal() {
        let mut tw = Typewriter::new();
        tw.start("first answer");
        let t0 = Instant::now();
        tw.tick(t0);
        tw.tick(t0 + 4 * CHAR_PERIOD);
        assert_eq!(tw.revealed_chars(), 4);

        tw.start("second");
        assert_eq!(tw.revealed_chars(), 0);
        assert_eq!(tw.visible(), "");
        let t1 = t0 + 10 * CHAR_PERIOD;
        tw.tick(t1);
        tw.tick(t1 + CHAR_PERIOD);
        // Only the new text's own elapsed time counts.
        assert_eq!(tw.revealed_chars(), 1);
        assert_eq!(tw.visible(), "s");
    }

    #[test]
    fn reveal_all_completes_without_ticking() {
        let mut tw = Typewriter::new();
        tw.start("sample answer");
        tw.reveal_all();
        assert!(tw.is_complete());
        assert_eq!(tw.visible(), "sample answer");
        // Subsequent ticks must not restart the animation.
        tw.tick(Instant::now());
        assert!(tw.is_complete());
    }

    #[test]
    fn clear_cancels_pending_reveal() {
        let mut tw = Typewriter::new();
        tw.start("something");
        tw.clear();
        assert!(tw.is_empty());
        tw.tick(Instant::now());
        assert_eq!(tw.revealed_chars(), 0);
    }

    #[test]
    fn multibyte_text_cuts_on_char_boundaries() {
        let mut tw = Typewriter::new();
        tw.start("\u{2705} ok");
        let t0 = Instant::now();
        tw.tick(t0);
        tw.tick(t0 + CHAR_PERIOD);
        assert_eq!(tw.visible(), "\u{2705}");
    }
}
