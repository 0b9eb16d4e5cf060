//! # Frame Loop
//!
//! Drives [`SceneState::advance`] once per display refresh.
//!
//! The loop starts [`LoopState::Uninitialized`] and moves to [`LoopState::Running`] exactly
//! once, after the first resize has sized the canvas and the projection. While running,
//! each [`FrameLoop::tick`]:
//!
//! 1. reads the [`Clock`] and runs the scene update,
//! 2. hands the updated scene to the render callback,
//! 3. asks the [`Scheduler`] for the next refresh.
//!
//! There is no stop transition; the loop lives as long as the window.
//!
//! The clock and the scheduler are traits so the loop can run against synthetic time and
//! a recording scheduler in tests. [`WebClock`] and the `winit` window implement them for
//! real use.

use web_time::Instant;

use crate::scene::{FrameUpdate, SceneState};

/// Source of frame timestamps.
pub trait Clock {
    /// Milliseconds since the clock's origin.
    fn now_ms(&self) -> f64;
}

/// Requests another refresh callback.
pub trait Scheduler {
    fn schedule_next_frame(&self);
}

/// High-resolution clock measured from its creation (`performance.now()` on the web).
#[derive(Debug, Clone, Copy)]
pub struct WebClock {
    origin: Instant,
}

impl WebClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for WebClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for WebClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

impl Scheduler for winit::window::Window {
    fn schedule_next_frame(&self) {
        self.request_redraw();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Uninitialized,
    Running,
}

pub struct FrameLoop<C> {
    clock: C,
    state: LoopState,
    frames: u64,
}

impl<C: Clock> FrameLoop<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            state: LoopState::Uninitialized,
            frames: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Moves the loop to [`LoopState::Running`]. Returns `false` if it was already running.
    pub fn start(&mut self) -> bool {
        if self.state == LoopState::Running {
            return false;
        }
        log::info!("Frame loop running");
        self.state = LoopState::Running;
        true
    }

    /// Runs one frame. Does nothing and returns `false` before [`FrameLoop::start`].
    pub fn tick<S, F>(&mut self, scene: &mut SceneState, scheduler: &S, render: F) -> bool
    where
        S: Scheduler + ?Sized,
        F: FnOnce(&SceneState, &FrameUpdate),
    {
        if self.state != LoopState::Running {
            return false;
        }
        let now = self.clock.now_ms();
        let update = scene.advance(now as f32);
        render(scene, &update);
        self.frames += 1;
        scheduler.schedule_next_frame();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Viewport;
    use crate::Settings;
    use std::cell::Cell;

    struct FakeClock {
        now: Cell<f64>,
    }

    impl Clock for FakeClock {
        fn now_ms(&self) -> f64 {
            let now = self.now.get();
            self.now.set(now + 16.0);
            now
        }
    }

    #[derive(Default)]
    struct CountingScheduler {
        requests: Cell<usize>,
    }

    impl Scheduler for CountingScheduler {
        fn schedule_next_frame(&self) {
            self.requests.set(self.requests.get() + 1);
        }
    }

    fn scene() -> SceneState {
        let mut scene = SceneState::new(&Settings::default());
        scene.resize(Viewport {
            width: 800.0,
            height: 600.0,
            scale: 1.0,
        });
        scene
    }

    fn frame_loop() -> FrameLoop<FakeClock> {
        FrameLoop::new(FakeClock {
            now: Cell::new(100.0),
        })
    }

    #[test]
    fn ticks_are_ignored_until_started() {
        let mut frames = frame_loop();
        let mut scene = scene();
        let scheduler = CountingScheduler::default();
        let rendered = Cell::new(false);

        assert!(!frames.tick(&mut scene, &scheduler, |_, _| rendered.set(true)));
        assert!(!rendered.get());
        assert_eq!(scheduler.requests.get(), 0);
        assert_eq!(frames.state(), LoopState::Uninitialized);
    }

    #[test]
    fn start_happens_once() {
        let mut frames = frame_loop();
        assert!(frames.start());
        assert!(!frames.start());
        assert_eq!(frames.state(), LoopState::Running);
    }

    #[test]
    fn running_ticks_update_render_and_reschedule() {
        let mut frames = frame_loop();
        let mut scene = scene();
        let scheduler = CountingScheduler::default();
        frames.start();

        let mut seen_times = Vec::new();
        for _ in 0..3 {
            assert!(frames.tick(&mut scene, &scheduler, |scene, update| {
                seen_times.push(scene.uniforms.time);
                assert_eq!(update.snowflake_model, scene.transform.model_matrix());
            }));
        }

        assert_eq!(seen_times, vec![100.0, 116.0, 132.0]);
        assert_eq!(scheduler.requests.get(), 3);
        assert_eq!(frames.frames(), 3);
    }

    #[test]
    fn pointer_rotation_builds_up_over_ticks() {
        let mut frames = frame_loop();
        let mut scene = scene();
        let scheduler = CountingScheduler::default();
        frames.start();
        scene.pointer_moved(800.0, 0.0);

        for _ in 0..2 {
            frames.tick(&mut scene, &scheduler, |_, _| {});
        }

        // Target is (-1, 1); two steps of 0.1 cover 1 - 0.9^2 of the way.
        assert!((scene.transform.rotation.x + 0.19).abs() < 1e-6);
        assert!((scene.transform.rotation.y - 0.19).abs() < 1e-6);
    }
}
