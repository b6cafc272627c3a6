use tracing::debug;

/*
Render Loop
===========

The render loop is a flag plus at most one pending frame request:

    start() ──→ active, frame #1 pending
                   │
    UI tick ──→ take_due() → Some(#1)  → draw → reschedule() → #2 pending
                   │
    stop()  ──→ inactive, pending cancelled; take_due() → None

The UI event loop owns the cadence (one `take_due` per display refresh).
A frame runs only if it was pending when the tick arrived, and a frame
schedules its successor only while the loop is still active, so a stop
issued mid-frame is never undone by the frame's own reschedule.
*/

/// Identifies one requested animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

#[derive(Debug, Default)]
pub struct RenderLoop {
    active: bool,
    pending: Option<FrameHandle>,
    next_id: u64,
}

impl RenderLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate and request the first frame. No-op while already active.
    pub fn start(&mut self) {
        if self.active {
            return;
        }
        self.active = true;
        self.request();
        debug!("render loop started");
    }

    /// Deactivate and cancel any pending frame.
    pub fn stop(&mut self) {
        if !self.active && self.pending.is_none() {
            return;
        }
        self.active = false;
        self.pending = None;
        debug!("render loop stopped");
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Claim the pending frame, if the loop is active and one is queued.
    pub fn take_due(&mut self) -> Option<FrameHandle> {
        if !self.active {
            return None;
        }
        self.pending.take()
    }

    /// Queue the next frame after one has been drawn.
    pub fn reschedule(&mut self) {
        if self.active && self.pending.is_none() {
            self.request();
        }
    }

    fn request(&mut self) {
        self.next_id += 1;
        self.pending = Some(FrameHandle(self.next_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_queues_one_frame() {
        let mut rl = RenderLoop::new();
        assert!(rl.take_due().is_none());

        rl.start();
        assert!(rl.is_active());
        assert!(rl.take_due().is_some());
        assert!(rl.take_due().is_none(), "one frame per request");
    }

    #[test]
    fn reschedule_keeps_the_loop_going() {
        let mut rl = RenderLoop::new();
        rl.start();
        let first = rl.take_due().unwrap();
        rl.reschedule();
        let second = rl.take_due().unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn stop_cancels_the_pending_frame() {
        let mut rl = RenderLoop::new();
        rl.start();
        rl.stop();
        assert!(!rl.is_active());
        assert!(rl.pending().is_none());
        assert!(rl.take_due().is_none());
    }

    #[test]
    fn stop_during_a_frame_is_not_undone_by_reschedule() {
        let mut rl = RenderLoop::new();
        rl.start();
        let _frame = rl.take_due().unwrap();
        rl.stop();
        rl.reschedule();
        assert!(rl.pending().is_none());
    }

    #[test]
    fn double_start_does_not_queue_twice() {
        let mut rl = RenderLoop::new();
        rl.start();
        let pending = rl.pending();
        rl.start();
        assert_eq!(rl.pending(), pending);
    }
}
