//! Tick loop driving acquisition, recomputation, and presentation.

use image::RgbImage;

use crate::calibration::{CalibrationStore, TrackedObject};
use crate::render::{RenderMode, RenderSelector};
use crate::segment::{segment, Segmentation};
use crate::source::{Advance, FrameSource};
use crate::Frame;

/// Key code for [`Command::Advance`] (enter).
pub const KEY_ADVANCE: u8 = 13;
/// Key code for [`Command::CycleRenderMode`] (space).
pub const KEY_CYCLE_RENDER: u8 = 32;
/// Key code for [`Command::Quit`] (esc).
pub const KEY_QUIT: u8 = 27;

/// Operator commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Advance,
    CycleRenderMode,
    Quit,
}

impl Command {
    /// Map a raw key code to a command. The codes are part of the operator
    /// contract and must stay stable across frontends.
    pub fn from_key_code(code: u8) -> Option<Self> {
        match code {
            KEY_ADVANCE => Some(Command::Advance),
            KEY_CYCLE_RENDER => Some(Command::CycleRenderMode),
            KEY_QUIT => Some(Command::Quit),
            _ => None,
        }
    }
}

/// Non-blocking operator command feed.
///
/// Implementations should wait at most a short fixed interval so the loop
/// stays responsive; `None` means no command arrived this tick.
pub trait ControlInput {
    fn poll(&mut self) -> Option<Command>;
}

/// External presentation surface.
///
/// `refreshed` is true when the target was rebuilt this tick. Sinks that
/// persist their output key on it; a live display draws every tick and
/// ignores it.
pub trait DisplaySink {
    fn present(&mut self, target: &RgbImage, refreshed: bool);
}

/// Tick-scoped control flags. Owned by the controller, passed nowhere
/// implicitly.
#[derive(Clone, Copy, Debug, Default)]
pub struct PipelineState {
    pub needs_recompute: bool,
    pub render_changed: bool,
    pub sequence_exhausted: bool,
    pub advance_requested: bool,
}

/// Loop state; `Stopped` is terminal and only reached at tick boundaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

/// What one tick did; returned for logging and tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct TickReport {
    pub frame_replaced: bool,
    pub recomputed: bool,
    pub target_refreshed: bool,
    pub stopped: bool,
}

/// Drives the pipeline: one [`tick`](Controller::tick) polls a command,
/// pulls a frame, recomputes the segmentation when dirty, refreshes the
/// render target, and hands it to the sink.
pub struct Controller<S, I, D> {
    source: S,
    input: I,
    sink: D,
    calibration: CalibrationStore,
    selector: RenderSelector,
    state: PipelineState,
    frame: Option<Frame>,
    segmentation: Option<Segmentation>,
    target: Option<RgbImage>,
    loop_state: LoopState,
}

impl<S: FrameSource, I: ControlInput, D: DisplaySink> Controller<S, I, D> {
    pub fn new(source: S, input: I, sink: D) -> Self {
        Self {
            source,
            input,
            sink,
            calibration: CalibrationStore::new(),
            selector: RenderSelector::new(),
            state: PipelineState {
                needs_recompute: true,
                render_changed: true,
                sequence_exhausted: false,
                advance_requested: false,
            },
            frame: None,
            segmentation: None,
            target: None,
            loop_state: LoopState::Running,
        }
    }

    pub fn calibration(&self) -> &CalibrationStore {
        &self.calibration
    }

    /// UI control surfaces mutate calibration through this between ticks.
    pub fn calibration_mut(&mut self) -> &mut CalibrationStore {
        &mut self.calibration
    }

    /// Jump the render selector to `mode`; used by frontends that start
    /// somewhere other than the raw frame.
    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.selector.set_mode(mode);
        self.state.render_changed = true;
    }

    pub fn loop_state(&self) -> LoopState {
        self.loop_state
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn segmentation(&self) -> Option<&Segmentation> {
        self.segmentation.as_ref()
    }

    /// Run ticks until the loop stops.
    pub fn run(&mut self) {
        while self.loop_state == LoopState::Running {
            self.tick();
        }
    }

    /// One deterministic, non-reentrant pipeline step.
    pub fn tick(&mut self) -> TickReport {
        let mut report = TickReport::default();

        match self.input.poll() {
            Some(Command::Quit) => {
                self.stop("operator quit");
                report.stopped = true;
                return report;
            }
            Some(Command::Advance) => match self.source.request_advance() {
                Advance::Moved => {
                    self.state.advance_requested = true;
                }
                Advance::Exhausted => {
                    self.state.sequence_exhausted = true;
                }
                Advance::EndOfSession => {
                    self.stop("end of image sequence");
                    report.stopped = true;
                    return report;
                }
                Advance::Ignored => {}
            },
            Some(Command::CycleRenderMode) => {
                self.selector.advance();
                self.state.render_changed = true;
            }
            None => {}
        }

        if self.calibration.take_dirty() {
            self.state.needs_recompute = true;
        }

        // A new frame is due when the cursor moved, at startup, and on
        // every live tick. Getting nothing back then is a read failure:
        // keep the previous frame, which stays segmented as it was, and
        // defer any pending recomputation to a tick with a frame.
        let expect_new =
            self.state.advance_requested || self.frame.is_none() || self.source.is_live();
        let mut read_failed = false;
        match self.source.next_frame() {
            Some(frame) => {
                self.frame = Some(frame);
                self.state.needs_recompute = true;
                report.frame_replaced = true;
            }
            None if expect_new => {
                read_failed = true;
                log::warn!("no frame this tick; keeping the previous one");
            }
            None => {}
        }
        self.state.advance_requested = false;

        if !read_failed && (self.state.needs_recompute || self.source.is_live()) {
            if let Some(frame) = &self.frame {
                self.segmentation = Some(segment(
                    frame,
                    self.calibration.range(TrackedObject::Marker),
                    self.calibration.range(TrackedObject::Player),
                ));
                self.state.needs_recompute = false;
                report.recomputed = true;
            }
        }

        // Re-resolve the target on a mode transition and whenever the
        // artifacts it is built from were recomputed; reuse it otherwise.
        if self.state.render_changed || report.recomputed {
            if let (Some(frame), Some(segmentation)) = (&self.frame, &self.segmentation) {
                self.target = Some(self.selector.resolve(frame, segmentation));
                self.state.render_changed = false;
                report.target_refreshed = true;
            }
        }

        if let Some(target) = &self.target {
            self.sink.present(target, report.target_refreshed);
        }
        report
    }

    fn stop(&mut self, reason: &str) {
        log::info!("stopping: {reason}");
        self.loop_state = LoopState::Stopped;
    }
}
