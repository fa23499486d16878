/// Coalesces view mutations into at most one pending frame.
///
/// Callers mark the view dirty through [`request`]; only the call that flips
/// the scheduler from idle to pending asks the host for a frame callback.
/// The callback calls [`begin_frame`] before recomputing anything.
///
/// [`request`]: RenderScheduler::request
/// [`begin_frame`]: RenderScheduler::begin_frame
#[derive(Debug, Default, Clone)]
pub struct RenderScheduler {
    pending: bool,
    requests: u64,
    frames: u64,
}

impl RenderScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the view dirty. Returns true when the caller must schedule a frame
    /// callback, false when one is already pending.
    pub fn request(&mut self) -> bool {
        self.requests += 1;
        if self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    /// Enter the frame callback. Clears the pending flag so mutations made
    /// while rendering (e.g. a running animation) can request the next frame.
    /// Returns false if no frame was pending.
    pub fn begin_frame(&mut self) -> bool {
        let was_pending = self.pending;
        self.pending = false;
        if was_pending {
            self.frames += 1;
        }
        was_pending
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Frames actually rendered.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Requests that did not need their own frame.
    pub fn coalesced(&self) -> u64 {
        self.requests - self.frames - u64::from(self.pending)
    }
}
