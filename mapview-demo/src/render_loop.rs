//! FPS-controlled render loop driving the headless map.
//!
//! The loop runs on a tokio task. On every tick it advances the camera transition in flight
//! and counts a frame whenever the provider asked for a redraw since the previous tick.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use mapview::provider::{HeadlessMapProvider, MapProvider};
use mapview::Messenger;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};

const MAX_FPS: u32 = 120;

/// Commands that can be sent to the render loop.
#[derive(Debug, Clone)]
pub enum RenderCommand {
    /// Start rendering.
    Start,
    /// Stop the loop and exit the task.
    Stop,
    /// Pause rendering but keep the loop alive.
    Pause,
    /// Resume rendering.
    Resume,
}

/// Current state of the render loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    Stopped,
    Running,
    Paused,
}

/// Error types for render loop operations.
#[derive(Debug, thiserror::Error)]
pub enum RenderLoopError {
    #[error("render loop is not running")]
    NotRunning,
    #[error("invalid FPS value: {0}")]
    InvalidFps(u32),
}

/// Frame statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Frames rendered so far.
    pub frame_count: u64,
    /// Frames in which the camera moved.
    pub animated_frames: u64,
}

/// Marks the map dirty so the next tick renders a frame.
#[derive(Debug, Clone)]
pub struct RenderLoopMessenger {
    dirty: Arc<AtomicBool>,
}

impl Messenger for RenderLoopMessenger {
    fn request_redraw(&self) {
        self.dirty.store(true, Ordering::Release);
    }
}

/// Render loop over a headless map provider.
pub struct RenderLoop {
    command_sender: mpsc::UnboundedSender<RenderCommand>,
    state: Arc<Mutex<RenderState>>,
    stats: Arc<Mutex<RenderStats>>,
    dirty: Arc<AtomicBool>,
}

impl RenderLoop {
    /// Spawns the render task. The loop starts stopped and must be started with
    /// [`start`](Self::start).
    ///
    /// Must be called within a tokio runtime.
    pub fn new(provider: HeadlessMapProvider, fps: u32) -> Result<Self, RenderLoopError> {
        validate_fps(fps)?;

        let (command_sender, command_receiver) = mpsc::unbounded_channel();
        let state = Arc::new(Mutex::new(RenderState::Stopped));
        let stats = Arc::new(Mutex::new(RenderStats::default()));
        let dirty = Arc::new(AtomicBool::new(true));

        let task = RenderTask {
            provider,
            state: state.clone(),
            stats: stats.clone(),
            dirty: dirty.clone(),
        };
        tokio::spawn(task.run(command_receiver, fps));

        Ok(Self {
            command_sender,
            state,
            stats,
            dirty,
        })
    }

    /// Messenger to install into the provider.
    pub fn messenger(&self) -> RenderLoopMessenger {
        RenderLoopMessenger {
            dirty: self.dirty.clone(),
        }
    }

    /// Starts rendering.
    pub fn start(&self) -> Result<(), RenderLoopError> {
        self.send_command(RenderCommand::Start)
    }

    /// Stops the loop. The task exits and cannot be restarted.
    pub fn stop(&self) -> Result<(), RenderLoopError> {
        self.send_command(RenderCommand::Stop)
    }

    /// Pauses rendering.
    pub fn pause(&self) -> Result<(), RenderLoopError> {
        self.send_command(RenderCommand::Pause)
    }

    /// Resumes rendering after a pause.
    pub fn resume(&self) -> Result<(), RenderLoopError> {
        self.send_command(RenderCommand::Resume)
    }

    /// Current state of the loop.
    pub fn state(&self) -> RenderState {
        *self.state.lock()
    }

    /// Frame statistics so far.
    pub fn stats(&self) -> RenderStats {
        *self.stats.lock()
    }

    fn send_command(&self, command: RenderCommand) -> Result<(), RenderLoopError> {
        self.command_sender
            .send(command)
            .map_err(|_| RenderLoopError::NotRunning)
    }
}

impl Drop for RenderLoop {
    fn drop(&mut self) {
        let _ = self.send_command(RenderCommand::Stop);
    }
}

fn validate_fps(fps: u32) -> Result<(), RenderLoopError> {
    if fps == 0 || fps > MAX_FPS {
        return Err(RenderLoopError::InvalidFps(fps));
    }

    Ok(())
}

struct RenderTask {
    provider: HeadlessMapProvider,
    state: Arc<Mutex<RenderState>>,
    stats: Arc<Mutex<RenderStats>>,
    dirty: Arc<AtomicBool>,
}

impl RenderTask {
    async fn run(self, mut command_receiver: mpsc::UnboundedReceiver<RenderCommand>, fps: u32) {
        let mut timer = interval(Duration::from_secs_f64(1.0 / fps as f64));
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                command = command_receiver.recv() => {
                    match command {
                        Some(RenderCommand::Start) => {
                            *self.state.lock() = RenderState::Running;
                            log::info!("Render loop started at {fps} FPS");
                        }
                        Some(RenderCommand::Stop) | None => {
                            *self.state.lock() = RenderState::Stopped;
                            log::info!("Render loop stopped");
                            break;
                        }
                        Some(RenderCommand::Pause) => {
                            *self.state.lock() = RenderState::Paused;
                            log::info!("Render loop paused");
                        }
                        Some(RenderCommand::Resume) => {
                            *self.state.lock() = RenderState::Running;
                            log::info!("Render loop resumed");
                        }
                    }
                }

                _ = timer.tick() => {
                    if *self.state.lock() == RenderState::Running {
                        self.render_frame();
                    }
                }
            }
        }

        log::debug!("Render loop task exited");
    }

    fn render_frame(&self) {
        // Advancing the animation requests a redraw on its own, so it goes before the check.
        let animated = self.provider.animate();
        if !self.dirty.swap(false, Ordering::AcqRel) {
            return;
        }

        let mut stats = self.stats.lock();
        stats.frame_count += 1;
        if animated {
            stats.animated_frames += 1;
        }

        let camera = self.provider.camera();
        log::trace!(
            "Frame {}: center {:?}, zoom {:.2}, bearing {:.1}, {} overlays",
            stats.frame_count,
            camera.center,
            camera.zoom,
            camera.bearing,
            self.provider.overlay_count()
        );
    }
}
