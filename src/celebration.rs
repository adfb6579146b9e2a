//! Confetti effect played when a candidate passes.
//!
//! The effect is purely cosmetic. A [`Celebration`] runs on its own tokio task,
//! stops after a fixed duration and never feeds back into request handling.
//! [`Celebrator`] keeps at most one run alive: triggering again cancels the
//! previous run first.
//!
//! This is the library-side model of the effect clients render when an
//! [`Announcement`] has `celebrate` set. The HTTP handlers only report the
//! flag; embedders that drive the effect themselves call
//! [`Celebrator::on_announcement`].

use std::f32::consts::PI;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval};
use tracing::debug;

use crate::announcement::Announcement;

pub const PIECE_COUNT: usize = 140;

pub const PALETTE: [&str; 6] = [
    "#FCB73E", "#F5E345", "#F9F286", "#ffffff", "#BE1E2D", "#9B2E41",
];

pub const DEFAULT_DURATION: Duration = Duration::from_millis(2000);

/// Roughly 60 frames per second.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Pieces falling this far below the bottom edge re-enter from the top.
const WRAP_MARGIN: f32 = 30.0;

/// Drawing surface in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Both sides are clamped to at least one pixel.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// One rectangle of confetti.
#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub vx: f32,
    pub vy: f32,
    pub rotation: f32,
    pub spin: f32,
    pub color: &'static str,
}

impl Piece {
    /// Spawn above the viewport so pieces rain in over the first frames.
    fn spawn<R: Rng>(rng: &mut R, viewport: Viewport) -> Self {
        Self {
            x: rng.random::<f32>() * viewport.width,
            y: -20.0 - rng.random::<f32>() * viewport.height,
            width: 6.0 + rng.random::<f32>() * 6.0,
            height: 8.0 + rng.random::<f32>() * 10.0,
            vx: -1.2 + rng.random::<f32>() * 2.4,
            vy: 2.6 + rng.random::<f32>() * 4.2,
            rotation: rng.random::<f32>() * PI,
            spin: -0.18 + rng.random::<f32>() * 0.36,
            color: PALETTE.choose(rng).copied().unwrap_or(PALETTE[0]),
        }
    }
}

/// All pieces of one run.
#[derive(Debug, Clone)]
pub struct ConfettiField {
    viewport: Viewport,
    pieces: Vec<Piece>,
}

impl ConfettiField {
    #[must_use]
    pub fn new<R: Rng>(viewport: Viewport, rng: &mut R) -> Self {
        let pieces = (0..PIECE_COUNT)
            .map(|_| Piece::spawn(rng, viewport))
            .collect();
        Self { viewport, pieces }
    }

    #[must_use]
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Advance one frame.
    pub fn step<R: Rng>(&mut self, rng: &mut R) {
        let bottom = self.viewport.height + WRAP_MARGIN;
        for piece in &mut self.pieces {
            piece.x += piece.vx;
            piece.y += piece.vy;
            piece.rotation += piece.spin;

            if piece.y > bottom {
                piece.y = -WRAP_MARGIN;
                piece.x = rng.random::<f32>() * self.viewport.width;
            }
        }
    }
}

/// A running confetti effect.
#[derive(Debug)]
pub struct Celebration {
    task: JoinHandle<u64>,
}

impl Celebration {
    /// Spawn the effect. It stops on its own after `duration`.
    #[must_use]
    pub fn start(viewport: Viewport, duration: Duration) -> Self {
        let task = tokio::spawn(async move {
            let mut rng = StdRng::from_os_rng();
            let mut field = ConfettiField::new(viewport, &mut rng);
            let mut ticker = interval(FRAME_INTERVAL);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            let started = Instant::now();
            let mut frames = 0_u64;
            loop {
                ticker.tick().await;
                if started.elapsed() >= duration {
                    break;
                }
                field.step(&mut rng);
                frames += 1;
            }

            debug!(frames, "Celebration finished");
            frames
        });

        Self { task }
    }

    pub fn cancel(&self) {
        self.task.abort();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the run to end. Returns the number of frames drawn, or `None`
    /// when the run was cancelled.
    pub async fn finished(self) -> Option<u64> {
        self.task.await.ok()
    }
}

/// Holder that keeps at most one celebration running.
#[derive(Debug, Default)]
pub struct Celebrator {
    current: Option<Celebration>,
}

impl Celebrator {
    #[must_use]
    pub const fn new() -> Self {
        Self { current: None }
    }

    /// Start a new run, cancelling the previous one if it is still going.
    ///
    /// Returns `true` when a running celebration was interrupted.
    pub fn trigger(&mut self, viewport: Viewport, duration: Duration) -> bool {
        let interrupted = self.cancel();
        self.current = Some(Celebration::start(viewport, duration));
        interrupted
    }

    /// Start a default-length run when the card asks for one.
    ///
    /// Returns `true` when a run was started.
    pub fn on_announcement(&mut self, announcement: &Announcement, viewport: Viewport) -> bool {
        if !announcement.celebrate {
            return false;
        }
        self.trigger(viewport, DEFAULT_DURATION);
        true
    }

    /// Cancel the current run. Returns `true` if one was still running.
    pub fn cancel(&mut self) -> bool {
        self.current.take().is_some_and(|run| {
            let running = !run.is_finished();
            run.cancel();
            running
        })
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.current.as_ref().is_some_and(|run| !run.is_finished())
    }
}

impl Drop for Celebrator {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn field_spawns_every_piece_above_the_viewport() {
        let viewport = Viewport::new(800.0, 600.0);
        let field = ConfettiField::new(viewport, &mut seeded());
        assert_eq!(field.pieces().len(), PIECE_COUNT);
        for piece in field.pieces() {
            assert!(piece.y <= -20.0);
            assert!((0.0..=800.0).contains(&piece.x));
            assert!(PALETTE.contains(&piece.color));
        }
    }

    #[test]
    fn pieces_wrap_to_the_top() {
        let viewport = Viewport::new(100.0, 50.0);
        let mut rng = seeded();
        let mut field = ConfettiField::new(viewport, &mut rng);
        for _ in 0..500 {
            field.step(&mut rng);
        }
        for piece in field.pieces() {
            assert!(piece.y <= 50.0 + WRAP_MARGIN);
        }
    }

    #[test]
    fn degenerate_viewport_is_clamped() {
        let viewport = Viewport::new(0.0, -5.0);
        assert_eq!(viewport, Viewport::new(1.0, 1.0));
        let field = ConfettiField::new(viewport, &mut seeded());
        assert_eq!(field.pieces().len(), PIECE_COUNT);
    }

    #[tokio::test(start_paused = true)]
    async fn celebration_stops_after_its_duration() {
        let run = Celebration::start(Viewport::default(), Duration::from_millis(160));
        let frames = run.finished().await.unwrap();
        assert!((9..=11).contains(&frames), "frames = {frames}");
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_celebration_reports_none() {
        let run = Celebration::start(Viewport::default(), DEFAULT_DURATION);
        run.cancel();
        assert_eq!(run.finished().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn only_passing_announcements_start_a_run() {
        use crate::announcement::MOTIVATIONS;
        use crate::lookup::Record;

        let card = |status: &str| {
            let record = Record {
                nim: "2201".into(),
                status: status.into(),
                ..Record::default()
            };
            Announcement::with_motivation(record, MOTIVATIONS[0])
        };

        let mut celebrator = Celebrator::new();
        assert!(!celebrator.on_announcement(&card("tidak lulus"), Viewport::default()));
        assert!(!celebrator.on_announcement(&card("diproses"), Viewport::default()));
        assert!(!celebrator.is_running());

        assert!(celebrator.on_announcement(&card("Lulus"), Viewport::default()));
        assert!(celebrator.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn retrigger_replaces_running_celebration() {
        let mut celebrator = Celebrator::new();
        assert!(!celebrator.trigger(Viewport::default(), DEFAULT_DURATION));
        assert!(celebrator.trigger(Viewport::default(), DEFAULT_DURATION));
        assert!(celebrator.is_running());

        tokio::time::sleep(DEFAULT_DURATION + Duration::from_millis(100)).await;
        assert!(!celebrator.is_running());
        assert!(!celebrator.cancel());
    }
}
