//! The Frame-Update Coordinator: one tick, one consistent snapshot.
//!
//! Each animation tick flows through a fixed pipeline: character bounds →
//! visual frames → zone partitions → bubble, drag handle, context zone.
//! No engine reads another's cache; the coordinator owns all cross-tick
//! state (throttles, the epsilon gate, pointer tracking, the single-slot
//! bubble retry) and is the only place that talks to the host.
//!
//! # Invariants
//!
//! 1. Engines run in the fixed order above; every emitted snapshot is
//!    internally consistent (all outputs derive from the same inputs).
//! 2. The bubble shrink retry is a single slot, consumed on the next
//!    tick; it never accumulates.
//! 3. Passthrough is pushed to the host only when the boolean changes.
//! 4. `teardown` leaves nothing armed: no latch, no poller, no retry, no
//!    dismiss deadline.
//!
//! # Failure Modes
//!
//! Not-ready characters and degenerate containers produce a hidden
//! snapshot; failed host queries fall back (last known window bounds,
//! then a container-derived approximation) and warn. Nothing in the tick
//! path returns an error.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use perch_geometry::{
    ContainerRect, FramePair, ModelRect, Projection, ViewPoint, ViewRect, ZoneSet,
    compute_frame_pair, partition,
};
use perch_placement::{
    BubbleOutcome, BubbleRequest, DragHandleInput, DragHandlePosition, HiddenReason,
    compute_context_zone, compute_drag_handle, place,
};
use perch_placement::ContextZoneResult;

use crate::config::EngineConfig;
use crate::cursor::CursorPoller;
use crate::host::{CharacterFace, CharacterSource, SpeechSurface, WindowHost, desktop_free_space};
use crate::pointer::{PointerTracker, PointerZone};
use crate::throttle::{EpsilonGate, ResizeThrottle, UpdateThrottle};

/// Chrome added around the visual frame when auto-fitting the window.
const WINDOW_FIT_MARGIN_X: f64 = 96.0;
const WINDOW_FIT_MARGIN_Y: f64 = 128.0;

/// Hit-test height of the drag handle (its position record carries no
/// height; the strip renders at a fixed one).
const HANDLE_HIT_HEIGHT_PX: f64 = 36.0;

/// Debug switches, fixed at construction. No ambient globals.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DebugOptions {
    /// Emit zone rectangles for overlay rendering (they are always in the
    /// snapshot; this flags the presentation layer to draw them).
    pub show_zones: bool,
    /// Log every placement decision at debug level.
    pub log_placement: bool,
    /// Re-emit the last snapshot without recomputation.
    pub freeze_updates: bool,
}

/// Everything one recomputation produced, re-emitted as plain data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    /// Visual frames (base + visible), when the character projected.
    pub frames: Option<FramePair>,
    /// Character bounding box in container pixels.
    pub model_rect: Option<ViewRect>,
    /// Partition from the raw bounding box (fit scoring).
    pub zones_raw: Option<ZoneSet>,
    /// Partition from the visible visual frame (overlays).
    pub zones_visual: Option<ZoneSet>,
    pub bubble: BubbleOutcome,
    pub handle: Option<DragHandlePosition>,
    pub context_zone: Option<ContextZoneResult>,
    /// The capture decision in force when this snapshot was emitted.
    pub should_capture: bool,
}

impl FrameSnapshot {
    fn hidden(should_capture: bool) -> Self {
        Self {
            frames: None,
            model_rect: None,
            zones_raw: None,
            zones_visual: None,
            bubble: BubbleOutcome::Hidden(HiddenReason::NotReady),
            handle: None,
            context_zone: None,
            should_capture,
        }
    }
}

/// A bubble currently showing (or waiting to).
#[derive(Debug, Clone)]
struct Speech {
    text: String,
    dismiss_at: Option<Instant>,
}

/// Per-frame driver for the whole placement pipeline.
#[derive(Debug)]
pub struct Coordinator {
    config: EngineConfig,
    debug: DebugOptions,
    update_throttle: UpdateThrottle,
    resize_throttle: ResizeThrottle,
    gate: EpsilonGate,
    pointer: PointerTracker,
    poller: CursorPoller,
    speech: Option<Speech>,
    /// Single-slot shrink retry: the ordinal to carry into the next tick.
    pending_retry: Option<u8>,
    /// Forces the next tick past the epsilon and update gates.
    dirty: bool,
    last_passthrough: Option<bool>,
    last_window_bounds: Option<ModelRect>,
    last_snapshot: Option<FrameSnapshot>,
}

impl Coordinator {
    #[must_use]
    pub fn new(config: EngineConfig, debug: DebugOptions) -> Self {
        let pointer = PointerTracker::new(config.latch, config.ignore_mouse);
        let update_throttle = UpdateThrottle::new(config.update_interval);
        let resize_throttle = ResizeThrottle::new(config.resize_interval, config.resize_min_delta_px);
        let poller = CursorPoller::new(config.poll_interval);
        Self {
            config,
            debug,
            update_throttle,
            resize_throttle,
            gate: EpsilonGate::new(),
            pointer,
            poller,
            speech: None,
            pending_retry: None,
            dirty: true,
            last_passthrough: None,
            last_window_bounds: None,
            last_snapshot: None,
        }
    }

    /// Show a bubble with the given text, optionally auto-dismissing.
    pub fn say(&mut self, text: impl Into<String>, ttl: Option<Duration>, now: Instant) {
        self.speech = Some(Speech {
            text: text.into(),
            dismiss_at: ttl.map(|d| now + d),
        });
        self.dirty = true;
    }

    /// Hide the bubble immediately.
    pub fn hide(&mut self) {
        if self.speech.take().is_some() {
            self.dirty = true;
        }
    }

    /// Host push notification: the window moved or resized.
    pub fn note_window_bounds(&mut self, bounds: ModelRect) {
        self.last_window_bounds = Some(bounds);
        self.dirty = true;
    }

    /// The user's global "ignore mouse" toggle.
    pub fn set_ignore_mouse(&mut self, ignore: bool) {
        self.pointer.set_ignore_mouse(ignore);
        self.dirty = true;
    }

    pub fn pointer_enter(&mut self, zone: PointerZone, now: Instant) {
        self.pointer.pointer_enter(zone, now);
    }

    pub fn pointer_leave(&mut self, zone: PointerZone, now: Instant) {
        self.pointer.pointer_leave(zone, now);
    }

    pub fn pointer_down(&mut self, zone: PointerZone) {
        self.pointer.pointer_down(zone);
    }

    pub fn pointer_up(&mut self, zone: PointerZone) {
        self.pointer.pointer_up(zone);
    }

    /// The last emitted snapshot, if any.
    #[must_use]
    pub fn last_snapshot(&self) -> Option<&FrameSnapshot> {
        self.last_snapshot.as_ref()
    }

    /// Whether a bubble shrink retry is waiting for the next tick.
    #[must_use]
    pub fn retry_pending(&self) -> bool {
        self.pending_retry.is_some()
    }

    /// Drive one animation tick. Returns the snapshot when a
    /// recomputation ran, `None` when the gates suppressed it.
    pub fn tick<C, H>(
        &mut self,
        now: Instant,
        character: &C,
        host: &mut H,
        surface: &mut dyn SpeechSurface,
        container: ContainerRect,
        force: bool,
    ) -> Option<FrameSnapshot>
    where
        C: CharacterSource,
        H: WindowHost,
    {
        if self.debug.freeze_updates {
            return self.last_snapshot.clone();
        }

        if let Some(speech) = &self.speech
            && speech.dismiss_at.is_some_and(|at| now >= at)
        {
            self.speech = None;
            self.dirty = true;
        }

        if self.poller.due_at(now) {
            self.poll_cursor(host, container, now);
        }
        let should_capture = self.converge_passthrough(host, now);

        let ready = character.is_ready() && !container.is_degenerate();
        let (bounds, screen) = (character.bounds(), character.screen());
        let (Some(bounds), Some(screen)) = (bounds, screen) else {
            return Some(self.emit(FrameSnapshot::hidden(should_capture)));
        };
        if !ready {
            return Some(self.emit(FrameSnapshot::hidden(should_capture)));
        }

        let retry = self.pending_retry.take();
        let force = force || self.dirty || retry.is_some();

        let window_bounds = self.query_window_bounds(host, container);
        if !self.update_throttle.allow_at(now, force) {
            self.pending_retry = retry.or(self.pending_retry);
            return None;
        }
        let changed = self.gate.observe(
            bounds,
            Some(window_bounds),
            (container.width, container.height),
            self.config.epsilon_px,
        );
        if !force && !changed {
            return None;
        }
        self.dirty = false;

        // Fixed pipeline order: mapper, partitioner, then the engines.
        let face = CharacterFace(character);
        let frames = compute_frame_pair(bounds, screen, container, &self.config.visual, Some(&face));
        let proj = Projection::new(screen, container);
        let (Some(frames), Some(proj)) = (frames, proj) else {
            return Some(self.emit(FrameSnapshot::hidden(should_capture)));
        };
        let model_rect = proj.rect(bounds);
        let scale = character.scale();

        let zones_raw = partition(
            model_rect.left,
            model_rect.right(),
            container.width,
            scale,
            &self.config.zones,
        );
        let zones_visual = partition(
            frames.visible.left,
            frames.visible.right,
            container.width,
            scale,
            &self.config.zones,
        );

        let (free_left, free_right) = match host.screen_work_area() {
            Some(work) => {
                let (l, r) = desktop_free_space(window_bounds, work);
                (Some(l), Some(r))
            }
            None => (None, None),
        };

        let bubble = self.place_bubble(
            surface,
            scale,
            &zones_raw,
            &zones_visual,
            container,
            &model_rect,
            free_left,
            free_right,
            retry.unwrap_or(0),
        );

        let handle = compute_drag_handle(&DragHandleInput::new(
            container.width,
            container.height,
            bounds,
            screen,
        ));

        let context_zone = compute_context_zone(
            &perch_placement::ContextZoneInput {
                container_width: container.width,
                container_height: container.height,
                container_abs: ViewPoint::new(container.left, container.top),
                model_top_y: model_rect.top,
                model_height: model_rect.height,
                desktop_free_left: free_left,
                desktop_free_right: free_right,
            },
            &self.config.context,
        );

        // Auto-fit the window to the character's footprint.
        let desired_w = frames.visible.width + WINDOW_FIT_MARGIN_X;
        let desired_h = model_rect.height + WINDOW_FIT_MARGIN_Y;
        if self.resize_throttle.request_at(now, desired_w, desired_h) {
            host.request_resize(desired_w, desired_h);
        }

        let snapshot = FrameSnapshot {
            frames: Some(frames),
            model_rect: Some(model_rect),
            zones_raw: Some(zones_raw),
            zones_visual: Some(zones_visual),
            bubble,
            handle,
            context_zone,
            should_capture,
        };
        if self.debug.log_placement {
            tracing::debug!(?snapshot.bubble, ?snapshot.handle, "placement");
        }
        Some(self.emit(snapshot))
    }

    /// Cancel everything armed against this character instance.
    pub fn teardown(&mut self) {
        self.pending_retry = None;
        self.speech = None;
        self.pointer.clear();
        self.poller.disarm();
        self.gate.reset();
        self.update_throttle.reset();
        self.resize_throttle.reset();
        self.last_passthrough = None;
        self.last_window_bounds = None;
        self.last_snapshot = None;
        self.dirty = true;
    }

    fn emit(&mut self, snapshot: FrameSnapshot) -> FrameSnapshot {
        self.last_snapshot = Some(snapshot.clone());
        snapshot
    }

    #[allow(clippy::too_many_arguments)]
    fn place_bubble(
        &mut self,
        surface: &mut dyn SpeechSurface,
        scale: f64,
        zones_raw: &ZoneSet,
        zones_visual: &ZoneSet,
        container: ContainerRect,
        model_rect: &ViewRect,
        free_left: Option<f64>,
        free_right: Option<f64>,
        retry: u8,
    ) -> BubbleOutcome {
        let Some(speech) = &self.speech else {
            return BubbleOutcome::Hidden(HiddenReason::EmptyContent);
        };
        surface.set_text(&speech.text);

        let map = &self.config.touch_map;
        let head_anchor_y = map.head_anchor_y(
            model_rect.top,
            model_rect.height,
            self.config.head_ratio_override,
        );
        let head_top_y = map.head_anchor_y(model_rect.top, model_rect.height, None);

        let request = BubbleRequest {
            scale,
            zones: *zones_raw,
            zones_visual: *zones_visual,
            container_width: container.width,
            container_height: container.height,
            center_left: zones_raw.center.left,
            center_right: zones_raw.center.right,
            head_anchor_y,
            head_top_y,
            desktop_free_left: free_left,
            desktop_free_right: free_right,
            retry,
        };
        let outcome = place(surface, &request, &self.config.bubble);
        if let BubbleOutcome::Placed(placement) = &outcome
            && placement.retry_scheduled
        {
            // Single slot: a retry scheduled while one is pending replaces
            // it rather than queueing.
            self.pending_retry = Some(retry.saturating_add(1));
        }
        outcome
    }

    fn query_window_bounds<H: WindowHost>(
        &mut self,
        host: &mut H,
        container: ContainerRect,
    ) -> ModelRect {
        match host.window_bounds() {
            Some(bounds) => {
                self.last_window_bounds = Some(bounds);
                bounds
            }
            None => {
                tracing::warn!("window bounds query failed; using fallback");
                self.last_window_bounds.unwrap_or(ModelRect::new(
                    container.left,
                    container.top,
                    container.width,
                    container.height,
                ))
            }
        }
    }

    fn poll_cursor<H: WindowHost>(
        &mut self,
        host: &mut H,
        container: ContainerRect,
        now: Instant,
    ) {
        let Some(point) = host.cursor_screen_point() else {
            tracing::debug!("cursor query failed; keeping previous pointer state");
            return;
        };
        let local = ViewPoint::new(point.x - container.left, point.y - container.top);

        let snap = self.last_snapshot.as_ref();
        let inside_model = snap
            .and_then(|s| s.model_rect)
            .is_some_and(|r| r.contains(local));
        let inside_bubble = snap
            .and_then(|s| s.bubble.placed())
            .is_some_and(|p| ViewRect::new(p.x, p.y, p.width, p.height).contains(local));
        let inside_handle = snap.and_then(|s| s.handle).is_some_and(|h| {
            ViewRect::new(h.left, h.top, h.width, HANDLE_HIT_HEIGHT_PX).contains(local)
        });
        // The context zone is hit-tested in desktop coordinates.
        let inside_context = snap
            .and_then(|s| s.context_zone)
            .is_some_and(|z| z.rect_abs.contains(point));

        self.pointer.set_inside(PointerZone::Model, inside_model, now);
        self.pointer.set_inside(PointerZone::Bubble, inside_bubble, now);
        self.pointer.set_inside(PointerZone::Handle, inside_handle, now);
        self.pointer
            .set_inside(PointerZone::ContextZone, inside_context, now);
    }

    /// Push the capture decision to the host only when it changes; the
    /// cursor poller runs exactly while passthrough is on.
    fn converge_passthrough<H: WindowHost>(&mut self, host: &mut H, now: Instant) -> bool {
        let should_capture = self.pointer.should_capture(now);
        let passthrough = !should_capture;
        if self.last_passthrough != Some(passthrough) {
            if !host.set_mouse_passthrough(passthrough) {
                tracing::warn!(passthrough, "host rejected passthrough change");
            }
            self.last_passthrough = Some(passthrough);
            if passthrough {
                self.poller.arm();
            } else {
                self.poller.disarm();
            }
        }
        should_capture
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use perch_placement::TextSurface;

    /// Character fixed at one pose.
    struct StaticCharacter {
        ready: bool,
        bounds: ModelRect,
        screen: ModelRect,
    }

    impl StaticCharacter {
        fn new() -> Self {
            Self {
                ready: true,
                bounds: ModelRect::new(300.0, 200.0, 400.0, 600.0),
                screen: ModelRect::new(0.0, 0.0, 1000.0, 1000.0),
            }
        }
    }

    impl CharacterSource for StaticCharacter {
        fn is_ready(&self) -> bool {
            self.ready
        }
        fn bounds(&self) -> Option<ModelRect> {
            Some(self.bounds)
        }
        fn screen(&self) -> Option<ModelRect> {
            Some(self.screen)
        }
        fn hit_test(&self, _part: &str, _x: f64, _y: f64) -> bool {
            false
        }
    }

    /// Host that records every outbound call.
    #[derive(Default)]
    struct LogHost {
        resizes: Vec<(f64, f64)>,
        passthrough: Vec<bool>,
        cursor: Option<ViewPoint>,
        window: Option<ModelRect>,
        work_area: Option<ModelRect>,
    }

    impl WindowHost for LogHost {
        fn request_resize(&mut self, width: f64, height: f64) {
            self.resizes.push((width, height));
        }
        fn cursor_screen_point(&mut self) -> Option<ViewPoint> {
            self.cursor
        }
        fn window_bounds(&mut self) -> Option<ModelRect> {
            self.window
        }
        fn set_mouse_passthrough(&mut self, enabled: bool) -> bool {
            self.passthrough.push(enabled);
            true
        }
        fn screen_work_area(&mut self) -> Option<ModelRect> {
            self.work_area
        }
    }

    fn container() -> ContainerRect {
        ContainerRect::new(200.0, 100.0, 1000.0, 800.0)
    }

    fn coordinator() -> Coordinator {
        Coordinator::new(EngineConfig::default(), DebugOptions::default())
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    // ── Readiness and basic emission ──────────────────────────────────

    #[test]
    fn unready_character_emits_a_hidden_snapshot() {
        let now = Instant::now();
        let mut c = coordinator();
        let mut character = StaticCharacter::new();
        character.ready = false;
        let mut host = LogHost::default();
        let mut surface = TextSurface::default();

        let snap = c
            .tick(now, &character, &mut host, &mut surface, container(), false)
            .unwrap();
        assert!(snap.frames.is_none());
        assert_eq!(snap.bubble, BubbleOutcome::Hidden(HiddenReason::NotReady));
    }

    #[test]
    fn ready_character_fills_every_output() {
        let now = Instant::now();
        let mut c = coordinator();
        let character = StaticCharacter::new();
        let mut host = LogHost::default();
        let mut surface = TextSurface::default();
        c.say("hello there", None, now);

        let snap = c
            .tick(now, &character, &mut host, &mut surface, container(), false)
            .unwrap();
        assert!(snap.frames.is_some());
        assert!(snap.zones_raw.is_some());
        assert!(snap.zones_visual.is_some());
        assert!(snap.bubble.placed().is_some());
        assert!(snap.handle.is_some());
        assert!(snap.context_zone.is_some());
    }

    #[test]
    fn no_speech_means_a_hidden_bubble_but_live_geometry() {
        let now = Instant::now();
        let mut c = coordinator();
        let character = StaticCharacter::new();
        let mut host = LogHost::default();
        let mut surface = TextSurface::default();

        let snap = c
            .tick(now, &character, &mut host, &mut surface, container(), false)
            .unwrap();
        assert!(snap.bubble.is_hidden());
        assert!(snap.handle.is_some());
    }

    // ── Gating ────────────────────────────────────────────────────────

    #[test]
    fn identical_ticks_inside_the_interval_are_suppressed() {
        let now = Instant::now();
        let mut c = coordinator();
        let character = StaticCharacter::new();
        let mut host = LogHost::default();
        let mut surface = TextSurface::default();

        assert!(
            c.tick(now, &character, &mut host, &mut surface, container(), false)
                .is_some()
        );
        assert!(
            c.tick(now + ms(16), &character, &mut host, &mut surface, container(), false)
                .is_none()
        );
        // After the interval the epsilon gate still sees nothing moved.
        assert!(
            c.tick(now + ms(40), &character, &mut host, &mut surface, container(), false)
                .is_none()
        );
    }

    #[test]
    fn force_bypasses_both_gates() {
        let now = Instant::now();
        let mut c = coordinator();
        let character = StaticCharacter::new();
        let mut host = LogHost::default();
        let mut surface = TextSurface::default();

        assert!(
            c.tick(now, &character, &mut host, &mut surface, container(), false)
                .is_some()
        );
        assert!(
            c.tick(now + ms(1), &character, &mut host, &mut surface, container(), true)
                .is_some()
        );
    }

    #[test]
    fn movement_past_epsilon_recomputes() {
        let now = Instant::now();
        let mut c = coordinator();
        let mut character = StaticCharacter::new();
        let mut host = LogHost::default();
        let mut surface = TextSurface::default();

        assert!(
            c.tick(now, &character, &mut host, &mut surface, container(), false)
                .is_some()
        );
        character.bounds.x += 5.0;
        assert!(
            c.tick(now + ms(40), &character, &mut host, &mut surface, container(), false)
                .is_some()
        );
    }

    #[test]
    fn window_bounds_notification_forces_the_next_tick() {
        let now = Instant::now();
        let mut c = coordinator();
        let character = StaticCharacter::new();
        let mut host = LogHost::default();
        let mut surface = TextSurface::default();

        assert!(
            c.tick(now, &character, &mut host, &mut surface, container(), false)
                .is_some()
        );
        c.note_window_bounds(ModelRect::new(500.0, 100.0, 1000.0, 800.0));
        assert!(
            c.tick(now + ms(40), &character, &mut host, &mut surface, container(), false)
                .is_some()
        );
    }

    // ── Resize storm suppression ──────────────────────────────────────

    #[test]
    fn breathing_jitter_sends_one_resize() {
        let now = Instant::now();
        let mut c = coordinator();
        let mut character = StaticCharacter::new();
        let mut host = LogHost::default();
        let mut surface = TextSurface::default();

        // 60 frames of sub-pixel breathing at 16ms cadence.
        for frame in 0..60u64 {
            character.bounds.height = 600.0 + 0.3 * (frame % 2) as f64;
            let _ = c.tick(
                now + ms(frame * 16),
                &character,
                &mut host,
                &mut surface,
                container(),
                false,
            );
        }
        assert_eq!(host.resizes.len(), 1);
    }

    #[test]
    fn real_growth_sends_a_second_resize() {
        let now = Instant::now();
        let mut c = coordinator();
        let mut character = StaticCharacter::new();
        let mut host = LogHost::default();
        let mut surface = TextSurface::default();

        let _ = c.tick(now, &character, &mut host, &mut surface, container(), false);
        character.bounds.height = 700.0;
        let _ = c.tick(now + ms(150), &character, &mut host, &mut surface, container(), false);
        assert_eq!(host.resizes.len(), 2);
        // Height request follows the projected character height.
        assert!(host.resizes[1].1 > host.resizes[0].1);
    }

    // ── Passthrough convergence ───────────────────────────────────────

    #[test]
    fn passthrough_is_pushed_once_until_the_decision_flips() {
        let now = Instant::now();
        let mut c = coordinator();
        let character = StaticCharacter::new();
        let mut host = LogHost::default();
        let mut surface = TextSurface::default();

        let _ = c.tick(now, &character, &mut host, &mut surface, container(), false);
        let _ = c.tick(now + ms(40), &character, &mut host, &mut surface, container(), true);
        // No pointer anywhere: exactly one push, passthrough on.
        assert_eq!(host.passthrough, vec![true]);

        c.pointer_enter(PointerZone::Model, now + ms(50));
        let _ = c.tick(now + ms(80), &character, &mut host, &mut surface, container(), true);
        assert_eq!(host.passthrough, vec![true, false]);

        // Unrelated churn does not re-push.
        c.pointer_enter(PointerZone::Bubble, now + ms(90));
        c.pointer_leave(PointerZone::Bubble, now + ms(95));
        let _ = c.tick(now + ms(120), &character, &mut host, &mut surface, container(), true);
        assert_eq!(host.passthrough, vec![true, false]);
    }

    #[test]
    fn poller_runs_only_while_passthrough_is_on() {
        let now = Instant::now();
        let mut c = coordinator();
        let character = StaticCharacter::new();
        let mut host = LogHost::default();
        let mut surface = TextSurface::default();

        let _ = c.tick(now, &character, &mut host, &mut surface, container(), false);
        assert!(c.poller.is_armed());

        c.pointer_enter(PointerZone::Model, now + ms(10));
        let _ = c.tick(now + ms(40), &character, &mut host, &mut surface, container(), true);
        assert!(!c.poller.is_armed());
    }

    #[test]
    fn polled_cursor_over_the_context_zone_captures() {
        let now = Instant::now();
        let mut c = coordinator();
        let character = StaticCharacter::new();
        let mut host = LogHost::default();
        let mut surface = TextSurface::default();

        let first = c
            .tick(now, &character, &mut host, &mut surface, container(), false)
            .unwrap();
        let zone = first.context_zone.unwrap();
        // Park the polled cursor inside the zone's desktop rectangle.
        host.cursor = Some(ViewPoint::new(
            zone.rect_abs.left + 5.0,
            zone.rect_abs.top + 5.0,
        ));

        let snap = c
            .tick(now + ms(200), &character, &mut host, &mut surface, container(), true)
            .unwrap();
        assert!(snap.should_capture);
        assert_eq!(host.passthrough, vec![true, false]);
    }

    // ── Speech lifecycle ──────────────────────────────────────────────

    #[test]
    fn dismiss_deadline_hides_the_bubble() {
        let now = Instant::now();
        let mut c = coordinator();
        let character = StaticCharacter::new();
        let mut host = LogHost::default();
        let mut surface = TextSurface::default();

        c.say("short-lived", Some(ms(100)), now);
        let snap = c
            .tick(now, &character, &mut host, &mut surface, container(), false)
            .unwrap();
        assert!(snap.bubble.placed().is_some());

        let snap = c
            .tick(now + ms(150), &character, &mut host, &mut surface, container(), false)
            .unwrap();
        assert!(snap.bubble.is_hidden());
    }

    #[test]
    fn hide_is_immediate() {
        let now = Instant::now();
        let mut c = coordinator();
        let character = StaticCharacter::new();
        let mut host = LogHost::default();
        let mut surface = TextSurface::default();

        c.say("going away", None, now);
        let _ = c.tick(now, &character, &mut host, &mut surface, container(), false);
        c.hide();
        let snap = c
            .tick(now + ms(40), &character, &mut host, &mut surface, container(), false)
            .unwrap();
        assert!(snap.bubble.is_hidden());
    }

    // ── Freeze and teardown ───────────────────────────────────────────

    #[test]
    fn freeze_re_emits_the_last_snapshot() {
        let now = Instant::now();
        let mut c = Coordinator::new(
            EngineConfig::default(),
            DebugOptions {
                freeze_updates: true,
                ..DebugOptions::default()
            },
        );
        let character = StaticCharacter::new();
        let mut host = LogHost::default();
        let mut surface = TextSurface::default();

        // Nothing emitted yet, so frozen ticks yield nothing and touch no
        // host state.
        assert!(
            c.tick(now, &character, &mut host, &mut surface, container(), true)
                .is_none()
        );
        assert!(host.passthrough.is_empty());
        assert!(host.resizes.is_empty());
    }

    #[test]
    fn teardown_disarms_everything() {
        let now = Instant::now();
        let mut c = coordinator();
        let character = StaticCharacter::new();
        let mut host = LogHost::default();
        let mut surface = TextSurface::default();

        c.say("lingering", Some(ms(10_000)), now);
        let _ = c.tick(now, &character, &mut host, &mut surface, container(), false);
        assert!(c.poller.is_armed());

        c.teardown();
        assert!(!c.poller.is_armed());
        assert!(!c.retry_pending());
        assert!(c.last_snapshot().is_none());

        // A fresh tick after teardown starts from a clean slate.
        let snap = c
            .tick(now + ms(1), &character, &mut host, &mut surface, container(), false)
            .unwrap();
        assert!(snap.bubble.is_hidden());
    }

    // ── Snapshot serialization ────────────────────────────────────────

    #[test]
    fn snapshot_serializes_as_plain_data() {
        let now = Instant::now();
        let mut c = coordinator();
        let character = StaticCharacter::new();
        let mut host = LogHost::default();
        let mut surface = TextSurface::default();
        c.say("serialize me", None, now);

        let snap = c
            .tick(now, &character, &mut host, &mut surface, container(), false)
            .unwrap();
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"should_capture\""));
        let back: FrameSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
    }
}
