/// Wall-clock anchor of a playing (or paused) sequence.
///
/// `elapsed = now - origin`. Pausing freezes the elapsed value; resuming
/// re-anchors the origin so the wrapped position is preserved exactly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaybackClock {
    origin_ms: f64,
    playing: bool,
    paused_at_ms: Option<f64>,
}

impl PlaybackClock {
    pub fn started_at(now_ms: f64) -> Self {
        Self {
            origin_ms: now_ms,
            playing: true,
            paused_at_ms: None,
        }
    }

    pub fn origin_ms(&self) -> f64 {
        self.origin_ms
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Re-anchor at `now_ms` and play from the first stage.
    pub fn restart(&mut self, now_ms: f64) {
        *self = Self::started_at(now_ms);
    }

    pub fn elapsed(&self, now_ms: f64) -> f64 {
        let at = if self.playing {
            now_ms
        } else {
            self.paused_at_ms.unwrap_or(now_ms)
        };
        (at - self.origin_ms).max(0.0)
    }

    pub fn pause(&mut self, now_ms: f64) {
        if self.playing {
            self.playing = false;
            self.paused_at_ms = Some(now_ms);
        }
    }

    /// Resume so that `elapsed mod period` equals its value at pause time.
    pub fn resume(&mut self, now_ms: f64, period_ms: f64) {
        if self.playing {
            return;
        }
        let wrapped = self.elapsed(now_ms).rem_euclid(period_ms);
        self.origin_ms = now_ms - wrapped;
        self.playing = true;
        self.paused_at_ms = None;
    }

    pub fn toggle(&mut self, now_ms: f64, period_ms: f64) {
        if self.playing {
            self.pause(now_ms);
        } else {
            self.resume(now_ms, period_ms);
        }
    }

    /// Push the origin forward, discarding `ms` of elapsed time.
    pub fn shift_origin(&mut self, ms: f64) {
        self.origin_ms += ms;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/clock.rs"]
mod tests;
