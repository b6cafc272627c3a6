//! Sample-accurate parameter automation.

/*
Scheduled Parameter Timeline
============================

Fades are not driven by the UI thread. The UI thread *schedules* a curve
on the audio clock, and the audio thread evaluates that curve for every
frame it renders. A late UI tick therefore never stretches or shortens a
fade: the ramp ends on exactly the sample it was scheduled for.

Vocabulary
----------

  audio clock   Seconds of audio rendered so far (frames / sample_rate).
                Monotonic, advanced only by the output callback.

  event         A point on the timeline. Two kinds:
                  SetValue   - jump to `value` at `time`
                  LinearRamp - arrive at `value` at `end_time`, moving in a
                               straight line from the previous event

  hold          Freezing the curve at whatever value it has right now.


The Shape
---------

    value
     1.0 ┤            ●────────────────
         │          ╱
         │        ╱   LinearRamp(1.0, t0 + 0.8)
         │      ╱
     0.0 ┤─────●
         └─────┴──────┴─────────────────→ time
               t0     t0 + 0.8
           SetValue(0.0, t0)

A ramp always starts from the event before it. Given a previous event at
(t0, v0) and a ramp to (t1, v1):

    value(t) = v0 + (v1 - v0) * (t - t0) / (t1 - t0)      for t0 <= t < t1

Before the first event the timeline outputs its default value; after the
last event it holds the last event's value.


Cancelling
----------

`cancel_scheduled_values(t)` drops every event at or after `t`. If a ramp
was half-way through, dropping its end point makes the curve snap back to
the event before it, which is a click. `cancel_and_hold_at_time(t)` first
measures the value at `t`, cancels, then pins that value with a SetValue
at `t`, so a new ramp can continue smoothly from there:

    pause during a fade-in at 0.375:

     1.0 ┤          (cancelled)
         │      ╱ ─ ─
   0.375 ┤    ●         ← held
         │  ╱   ╲
     0.0 ┤─●     ╲────●
         └────────────┴──→ time
                      hold + 0.5


Implementation Notes
--------------------

Events stay sorted by time. `render` evaluates the curve once per frame
and then prunes events that lie entirely in the past, so the list never
grows beyond a handful of entries during normal playback.
*/

/// Timestamps closer than this are treated as equal when comparing the
/// audio clock against scheduled times.
pub const CLOCK_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
enum ParamEvent {
    SetValue { time: f64, value: f32 },
    LinearRamp { end_time: f64, value: f32 },
}

impl ParamEvent {
    fn time(&self) -> f64 {
        match *self {
            ParamEvent::SetValue { time, .. } => time,
            ParamEvent::LinearRamp { end_time, .. } => end_time,
        }
    }

    fn value(&self) -> f32 {
        match *self {
            ParamEvent::SetValue { value, .. } | ParamEvent::LinearRamp { value, .. } => value,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParamTimeline {
    default_value: f32,
    events: Vec<ParamEvent>,
}

impl ParamTimeline {
    pub fn new(default_value: f32) -> Self {
        Self {
            default_value,
            events: Vec::with_capacity(8),
        }
    }

    /// Jump to `value` at `time`.
    pub fn set_value_at_time(&mut self, value: f32, time: f64) {
        self.insert(ParamEvent::SetValue { time, value });
    }

    /// Arrive at `value` at `end_time`, ramping linearly from the previous event.
    pub fn linear_ramp_to_value_at_time(&mut self, value: f32, end_time: f64) {
        self.insert(ParamEvent::LinearRamp { end_time, value });
    }

    /// Drop every event scheduled at or after `time`.
    pub fn cancel_scheduled_values(&mut self, time: f64) {
        self.events.retain(|event| event.time() < time);
    }

    /// Cancel everything from `time` on and pin the current value there.
    pub fn cancel_and_hold_at_time(&mut self, time: f64) -> f32 {
        let held = self.value_at(time);
        self.cancel_scheduled_values(time);
        self.set_value_at_time(held, time);
        held
    }

    /// Forget every event and rest at `value`.
    pub fn reset(&mut self, value: f32) {
        self.events.clear();
        self.default_value = value;
    }

    /// True while some event still lies ahead of `time`.
    pub fn has_pending(&self, time: f64) -> bool {
        self.events.iter().any(|event| event.time() > time)
    }

    pub fn value_at(&self, time: f64) -> f32 {
        let next_index = self.events.partition_point(|event| event.time() <= time);
        let previous = next_index.checked_sub(1).map(|i| self.events[i]);

        match (previous, self.events.get(next_index)) {
            (Some(prev), Some(&ParamEvent::LinearRamp { end_time, value })) => {
                let (t0, v0) = (prev.time(), prev.value());
                let span = end_time - t0;
                if span <= CLOCK_EPSILON {
                    return value;
                }
                let progress = ((time - t0) / span).clamp(0.0, 1.0) as f32;
                v0 + (value - v0) * progress
            }
            (Some(prev), _) => prev.value(),
            (None, _) => self.default_value,
        }
    }

    /// Evaluate one value per frame starting at `start_time`, then prune
    /// events that are fully in the past.
    pub fn render(&mut self, out: &mut [f32], start_time: f64, sample_rate: f32) {
        let period = 1.0 / sample_rate.max(1.0) as f64;
        for (i, value) in out.iter_mut().enumerate() {
            *value = self.value_at(start_time + i as f64 * period);
        }
        self.prune(start_time + out.len() as f64 * period);
    }

    fn insert(&mut self, event: ParamEvent) {
        let index = self
            .events
            .partition_point(|existing| existing.time() <= event.time());
        self.events.insert(index, event);
    }

    fn prune(&mut self, time: f64) {
        // Keep the latest past event as the anchor for whatever follows it.
        while self.events.len() >= 2 && self.events[1].time() <= time {
            self.events.remove(0);
        }
        if let Some(&ParamEvent::LinearRamp { end_time, value }) = self.events.first() {
            if end_time <= time {
                self.events[0] = ParamEvent::SetValue {
                    time: end_time,
                    value,
                };
            }
        }
    }
}
