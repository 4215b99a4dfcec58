//! Attract mode: autonomous play that takes over when the title screen sits idle.
//!
//! The controller plays real rounds through the same game interfaces the player uses:
//! it plans a random lateral walk per piece, executes it one legal step at a time,
//! sprinkles in opportunistic rotations, and resets the pit once a round has cleared
//! its quota or the stack grows dangerous. It never touches a piece mid-animation and
//! never commits an illegal placement; rejected moves are absorbed, not retried.

use crate::game::{Phase, Rng};

/// Idle frames on the title screen before the attract mode takes over (10 s at 60 fps).
const ATTRACT_DELAY_FRAMES: u16 = 600;

/// Frames the opening center-drop piece hovers before it is forced down.
const CENTER_DROP_DELAY_FRAMES: u16 = 20;

/// Frames a piece may loiter after its movement plan completes.
const LOITER_FRAMES: u16 = 60;

/// Bounds of the executor cadence divisor, re-randomized at every evaluation.
const STEP_PERIOD_MIN: u32 = 8;
const STEP_PERIOD_MAX: u32 = 50;

/// Everything the attract mode needs from the host game.
///
/// `GameState` is the production implementation; tests drive a scripted double that
/// records lifecycle calls and can be told to reject moves or resolve wall kicks.
pub trait DemoHost {
    /// Live pit dimensions as (width, depth, height).
    fn pit_dims(&self) -> (u8, u8, u8);
    /// Number of pit levels holding at least one cube.
    fn occupied_levels(&self) -> u8;

    fn phase(&self) -> Phase;
    fn change_phase(&mut self, phase: Phase);

    /// Cumulative pieces locked. Polled level-triggered for spawn detection; the frame
    /// loop locks at most one piece per frame, so a delta of more than one cannot occur.
    fn pieces_played(&self) -> u16;
    /// Cumulative planes cleared.
    fn lines_cleared(&self) -> u16;

    fn piece_pos(&self) -> (i8, i8, i8);
    fn set_piece_pos(&mut self, x: i8, y: i8, z: i8);
    fn target_angles(&self) -> (u8, u8, u8);
    fn set_target_angles(&mut self, ax: u8, ay: u8, az: u8);

    /// True if the current piece placed at `(x, y, z)` would be legal. Pure.
    fn is_position_valid(&self, x: i8, y: i8, z: i8) -> bool;
    /// Resolve the target orientation to a nearby legal position, or `None`.
    fn try_wall_kick(&mut self, ax: u8, ay: u8, az: u8) -> Option<(i8, i8, i8)>;

    fn apply_selected_pit_size(&mut self);
    fn reset_game_state(&mut self);
    fn request_static_redraw(&mut self);
    fn request_full_redraw(&mut self);
    fn reset_next_shape_selection(&mut self);
    fn spawn_new_piece(&mut self);
    /// Raw pit write, used only for the bottom-level pre-fill.
    fn set_pit_cell(&mut self, level: u8, y: u8, x: u8, filled: bool);
}

impl DemoHost for crate::game::GameState {
    fn pit_dims(&self) -> (u8, u8, u8) {
        (self.pit.width, self.pit.depth, self.pit.height)
    }

    fn occupied_levels(&self) -> u8 {
        self.pit.occupied_levels()
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn change_phase(&mut self, phase: Phase) {
        Self::change_phase(self, phase);
    }

    fn pieces_played(&self) -> u16 {
        self.pieces_played
    }

    fn lines_cleared(&self) -> u16 {
        self.lines_cleared
    }

    fn piece_pos(&self) -> (i8, i8, i8) {
        self.piece.as_ref().map_or((0, 0, 0), |p| (p.x, p.y, p.z))
    }

    fn set_piece_pos(&mut self, x: i8, y: i8, z: i8) {
        if let Some(p) = self.piece.as_mut() {
            p.x = x;
            p.y = y;
            p.z = z;
        }
    }

    fn target_angles(&self) -> (u8, u8, u8) {
        self.piece.as_ref().map_or((0, 0, 0), |p| p.angles)
    }

    fn set_target_angles(&mut self, ax: u8, ay: u8, az: u8) {
        if let Some(p) = self.piece.as_mut() {
            p.angles = (ax, ay, az);
        }
    }

    fn is_position_valid(&self, x: i8, y: i8, z: i8) -> bool {
        Self::is_position_valid(self, x, y, z)
    }

    fn try_wall_kick(&mut self, ax: u8, ay: u8, az: u8) -> Option<(i8, i8, i8)> {
        Self::try_wall_kick(self, ax, ay, az)
    }

    fn apply_selected_pit_size(&mut self) {
        Self::apply_selected_pit_size(self);
    }

    fn reset_game_state(&mut self) {
        Self::reset_game_state(self);
    }

    fn request_static_redraw(&mut self) {
        Self::request_static_redraw(self);
    }

    fn request_full_redraw(&mut self) {
        Self::request_full_redraw(self);
    }

    fn reset_next_shape_selection(&mut self) {
        Self::reset_next_shape_selection(self);
    }

    fn spawn_new_piece(&mut self) {
        Self::spawn_new_piece(self);
    }

    fn set_pit_cell(&mut self, level: u8, y: u8, x: u8, filled: bool) {
        Self::set_pit_cell(self, level, y, x, filled);
    }
}

/// Randomized lateral walk for one piece: direction and step budget on both axes.
///
/// Legality is never checked at planning time; the executor probes one step at a time
/// and a rejected step still consumes its budget, so every plan terminates.
#[derive(Debug, Clone, Copy, Default)]
struct MovementPlan {
    dir_x: i8,
    steps_x: u8,
    dir_y: i8,
    steps_y: u8,
    done: bool,
}

/// Attract-mode session: one instance owned by the app, alive across activations.
#[derive(Debug)]
pub struct Demo {
    active: bool,
    idle_frames: u16,
    /// Frames since the current piece came under autonomous control.
    timer: u16,
    /// Lines-cleared snapshot the round's quota is measured from.
    lines_base: u16,
    /// Planes this round must clear before it resets; 1 or 2.
    clear_target: u8,
    last_pieces_played: u16,
    /// True only while the round's opening piece is being dropped through the center gap.
    center_drop: bool,
    plan: MovementPlan,
    rng: Rng,
}

impl Demo {
    pub fn new(seed: u32) -> Self {
        Self {
            active: false,
            idle_frames: 0,
            timer: 0,
            lines_base: 0,
            clear_target: 0,
            last_pieces_played: 0,
            center_drop: false,
            plan: MovementPlan::default(),
            rng: Rng::new(seed),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Human interacted with the title screen; restart the idle window.
    pub fn notify_input(&mut self) {
        self.idle_frames = 0;
    }

    /// Count title-screen idle frames; returns true exactly on the activating frame.
    pub fn idle_tick(
        &mut self,
        host: &mut impl DemoHost,
        on_title_screen: bool,
        input_seen: bool,
    ) -> bool {
        if !on_title_screen || self.active {
            self.idle_frames = 0;
            return false;
        }
        if input_seen {
            self.idle_frames = 0;
            return false;
        }
        self.idle_frames += 1;
        if self.idle_frames >= ATTRACT_DELAY_FRAMES {
            self.start(host);
            self.idle_frames = 0;
            return true;
        }
        false
    }

    pub fn start(&mut self, host: &mut impl DemoHost) {
        if self.active {
            return;
        }
        host.apply_selected_pit_size();
        self.active = true;
        self.reset_round(host);
        host.change_phase(Phase::Playing);
        self.idle_frames = 0;
    }

    /// Tear the session down and hand the terminal back to the title screen.
    pub fn stop(&mut self, host: &mut impl DemoHost) {
        if !self.active {
            return;
        }
        self.active = false;
        self.timer = 0;
        self.center_drop = false;
        self.plan = MovementPlan::default();
        host.change_phase(Phase::Title);
        host.request_full_redraw();
        self.idle_frames = 0;
    }

    /// Drive one frame of autonomous play. No-op while inactive.
    ///
    /// Order matters: the near-full safety valve runs before spawn detection, which runs
    /// before any state-gated movement; a reset aborts the rest of the frame.
    pub fn tick(&mut self, host: &mut impl DemoHost) {
        if !self.active {
            return;
        }

        let (_, _, height) = host.pit_dims();
        if host.occupied_levels() >= height.saturating_sub(2) {
            self.reset_round(host);
            return;
        }

        if host.pieces_played() != self.last_pieces_played {
            self.last_pieces_played = host.pieces_played();
            self.on_new_piece(host);
        }

        if host.phase() != Phase::Playing {
            return;
        }

        self.timer += 1;

        if self.center_drop {
            if self.timer > CENTER_DROP_DELAY_FRAMES {
                host.change_phase(Phase::FastDrop);
                self.timer = 0;
            }
            return;
        }

        if u32::from(self.timer) % self.rng.range(STEP_PERIOD_MIN, STEP_PERIOD_MAX) == 0
            && !self.plan.done
        {
            self.step_movement(host);
        }

        if self.plan.done && self.timer > LOITER_FRAMES {
            host.change_phase(Phase::FastDrop);
            self.timer = 0;
        }
    }

    /// Draw a fresh walk for the current piece: random direction and step count per axis.
    fn plan_movement(&mut self, host: &impl DemoHost) {
        let (width, depth, _) = host.pit_dims();
        self.plan.dir_x = if self.rng.coin() { 1 } else { -1 };
        self.plan.steps_x = self.rng.range(0, u32::from(width) / 2 + 1) as u8;
        self.plan.dir_y = if self.rng.coin() { 1 } else { -1 };
        self.plan.steps_y = self.rng.range(0, u32::from(depth) / 2 + 1) as u8;
        self.plan.done = false;
    }

    /// Execute at most one translation attempt, then maybe one rotation attempt.
    ///
    /// A rejected translation still consumes its step, so a plan of `a + b` steps is
    /// finished after at most `a + b` calls no matter how often the oracle says no.
    /// A committed rotation hands the piece to the animation state and ends the call.
    fn step_movement(&mut self, host: &mut impl DemoHost) {
        if host.phase() == Phase::Animating {
            return;
        }

        let (px, py, pz) = host.piece_pos();
        if self.plan.steps_x > 0 {
            let nx = px + self.plan.dir_x;
            if host.is_position_valid(nx, py, pz) {
                host.set_piece_pos(nx, py, pz);
            }
            self.plan.steps_x -= 1;
        } else if self.plan.steps_y > 0 {
            let ny = py + self.plan.dir_y;
            if host.is_position_valid(px, ny, pz) {
                host.set_piece_pos(px, ny, pz);
            }
            self.plan.steps_y -= 1;
        }

        if self.rng.coin() {
            let axis = self.rng.range(0, 3);
            let (ax, ay, az) = host.target_angles();
            let target = match axis {
                0 => ((ax + 1) % 4, ay, az),
                1 => (ax, (ay + 1) % 4, az),
                _ => (ax, ay, (az + 1) % 4),
            };
            if let Some((kx, ky, kz)) = host.try_wall_kick(target.0, target.1, target.2) {
                host.set_piece_pos(kx, ky, kz);
                host.set_target_angles(target.0, target.1, target.2);
                host.change_phase(Phase::Animating);
                return;
            }
        }

        if self.plan.steps_x == 0 && self.plan.steps_y == 0 {
            self.plan.done = true;
        }
    }

    /// Start a fresh round: empty pit, pre-filled floor with a center gap, new quota,
    /// and the scripted center-drop opener.
    fn reset_round(&mut self, host: &mut impl DemoHost) {
        host.reset_game_state();
        self.fill_bottom_level(host);
        host.request_static_redraw();

        self.clear_target = 1 + self.rng.range(0, 2) as u8;
        self.lines_base = host.lines_cleared();
        self.timer = 0;
        self.center_drop = true;

        host.reset_next_shape_selection();
        host.spawn_new_piece();
        self.last_pieces_played = host.pieces_played();
        self.plan.done = false;
    }

    /// Fill the pit floor except the exact center cell, the opener's landing target.
    fn fill_bottom_level(&mut self, host: &mut impl DemoHost) {
        let (width, depth, height) = host.pit_dims();
        let bottom = height - 1;
        let center_x = width / 2;
        let center_y = depth / 2;
        for y in 0..depth {
            for x in 0..width {
                let filled = !(x == center_x && y == center_y);
                host.set_pit_cell(bottom, y, x, filled);
            }
        }
    }

    /// A piece has spawned: retire the center-drop opener, reset when the round's
    /// quota is met, otherwise plan a walk for the new piece.
    fn on_new_piece(&mut self, host: &mut impl DemoHost) {
        if self.center_drop {
            self.center_drop = false;
            self.lines_base = host.lines_cleared();
            self.plan_movement(host);
            return;
        }

        if host.lines_cleared() >= self.lines_base.wrapping_add(u16::from(self.clear_target)) {
            self.reset_round(host);
            return;
        }
        self.plan_movement(host);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scripted host: records lifecycle calls, rejects moves on demand, resolves wall
    /// kicks from a canned answer, and captures bottom-level pre-fill writes.
    struct ScriptedHost {
        dims: (u8, u8, u8),
        phase: Phase,
        pieces_played: u16,
        lines_cleared: u16,
        occupied: u8,
        pos: (i8, i8, i8),
        angles: (u8, u8, u8),
        reject_moves: bool,
        kick: Option<(i8, i8, i8)>,
        bottom: Vec<bool>,
        calls: Vec<&'static str>,
    }

    impl ScriptedHost {
        fn new() -> Self {
            let dims = (10u8, 6u8, 12u8);
            Self {
                dims,
                phase: Phase::Title,
                pieces_played: 0,
                lines_cleared: 0,
                occupied: 0,
                pos: (4, 2, 0),
                angles: (0, 0, 0),
                reject_moves: false,
                kick: None,
                bottom: vec![false; dims.0 as usize * dims.1 as usize],
                calls: Vec::new(),
            }
        }

        fn called(&self, name: &str) -> bool {
            self.calls.iter().any(|&c| c == name)
        }
    }

    impl DemoHost for ScriptedHost {
        fn pit_dims(&self) -> (u8, u8, u8) {
            self.dims
        }

        fn occupied_levels(&self) -> u8 {
            self.occupied
        }

        fn phase(&self) -> Phase {
            self.phase
        }

        fn change_phase(&mut self, phase: Phase) {
            self.calls.push("change_phase");
            self.phase = phase;
        }

        fn pieces_played(&self) -> u16 {
            self.pieces_played
        }

        fn lines_cleared(&self) -> u16 {
            self.lines_cleared
        }

        fn piece_pos(&self) -> (i8, i8, i8) {
            self.pos
        }

        fn set_piece_pos(&mut self, x: i8, y: i8, z: i8) {
            self.pos = (x, y, z);
        }

        fn target_angles(&self) -> (u8, u8, u8) {
            self.angles
        }

        fn set_target_angles(&mut self, ax: u8, ay: u8, az: u8) {
            self.angles = (ax, ay, az);
        }

        fn is_position_valid(&self, _x: i8, _y: i8, _z: i8) -> bool {
            !self.reject_moves
        }

        fn try_wall_kick(&mut self, _ax: u8, _ay: u8, _az: u8) -> Option<(i8, i8, i8)> {
            self.calls.push("try_wall_kick");
            self.kick
        }

        fn apply_selected_pit_size(&mut self) {
            self.calls.push("apply_selected_pit_size");
        }

        fn reset_game_state(&mut self) {
            self.calls.push("reset_game_state");
            self.occupied = 0;
            self.pieces_played = 0;
            self.lines_cleared = 0;
            self.bottom.fill(false);
        }

        fn request_static_redraw(&mut self) {
            self.calls.push("request_static_redraw");
        }

        fn request_full_redraw(&mut self) {
            self.calls.push("request_full_redraw");
        }

        fn reset_next_shape_selection(&mut self) {
            self.calls.push("reset_next_shape_selection");
        }

        fn spawn_new_piece(&mut self) {
            self.calls.push("spawn_new_piece");
        }

        fn set_pit_cell(&mut self, level: u8, y: u8, x: u8, filled: bool) {
            if level == self.dims.2 - 1 {
                self.bottom[y as usize * self.dims.0 as usize + x as usize] = filled;
            }
        }
    }

    /// Seed whose first `coin()` draw comes up the requested way.
    fn seed_with_first_coin(want: bool) -> u32 {
        (0u32..10_000)
            .find(|&s| Rng::new(s).coin() == want)
            .expect("some seed must flip the wanted way")
    }

    fn started(host: &mut ScriptedHost) -> Demo {
        let mut demo = Demo::new(42);
        demo.start(host);
        host.calls.clear();
        demo
    }

    #[test]
    fn activates_on_exactly_the_600th_idle_frame() {
        let mut host = ScriptedHost::new();
        let mut demo = Demo::new(1);
        for i in 1..ATTRACT_DELAY_FRAMES {
            assert!(!demo.idle_tick(&mut host, true, false), "frame {i}");
            assert!(!demo.is_active());
        }
        assert!(demo.idle_tick(&mut host, true, false));
        assert!(demo.is_active());
        assert_eq!(demo.idle_frames, 0);
        assert_eq!(host.phase, Phase::Playing);
        assert!(host.called("apply_selected_pit_size"));
        assert!(host.called("reset_game_state"));
    }

    #[test]
    fn input_restarts_the_idle_window() {
        let mut host = ScriptedHost::new();
        let mut demo = Demo::new(1);
        for _ in 0..300 {
            demo.idle_tick(&mut host, true, false);
        }
        assert!(!demo.idle_tick(&mut host, true, true));
        for _ in 0..(ATTRACT_DELAY_FRAMES - 1) {
            assert!(!demo.idle_tick(&mut host, true, false));
        }
        assert!(demo.idle_tick(&mut host, true, false));
    }

    #[test]
    fn notify_input_restarts_the_idle_window() {
        let mut host = ScriptedHost::new();
        let mut demo = Demo::new(1);
        for _ in 0..599 {
            demo.idle_tick(&mut host, true, false);
        }
        demo.notify_input();
        assert!(!demo.idle_tick(&mut host, true, false));
        assert!(!demo.is_active());
    }

    #[test]
    fn leaving_the_title_screen_resets_the_idle_count() {
        let mut host = ScriptedHost::new();
        let mut demo = Demo::new(1);
        for _ in 0..599 {
            demo.idle_tick(&mut host, true, false);
        }
        assert!(!demo.idle_tick(&mut host, false, false));
        assert!(!demo.idle_tick(&mut host, true, false));
        assert!(!demo.is_active());
    }

    #[test]
    fn plan_terminates_within_its_step_budget() {
        let mut host = ScriptedHost::new();
        host.reject_moves = true;
        host.phase = Phase::Playing;
        let start_pos = host.pos;
        let mut demo = Demo::new(9);
        demo.plan = MovementPlan {
            dir_x: 1,
            steps_x: 3,
            dir_y: -1,
            steps_y: 2,
            done: false,
        };
        for call in 1u8..=5 {
            assert!(!demo.plan.done, "done too early before call {call}");
            demo.step_movement(&mut host);
            let left = demo.plan.steps_x + demo.plan.steps_y;
            assert_eq!(left, 5 - call, "exactly one step consumed per call");
        }
        assert!(demo.plan.done);
        assert_eq!(host.pos, start_pos, "every rejected move was absorbed");
    }

    #[test]
    fn accepted_moves_walk_the_piece() {
        let mut host = ScriptedHost::new();
        host.phase = Phase::Playing;
        let mut demo = Demo::new(seed_with_first_coin(false));
        demo.plan = MovementPlan {
            dir_x: 1,
            steps_x: 1,
            dir_y: 1,
            steps_y: 0,
            done: false,
        };
        let (px, py, pz) = host.pos;
        demo.step_movement(&mut host);
        assert_eq!(host.pos, (px + 1, py, pz));
    }

    #[test]
    fn successful_rotation_preempts_the_call() {
        let mut host = ScriptedHost::new();
        host.phase = Phase::Playing;
        host.kick = Some((3, 2, 5));
        let mut demo = Demo::new(seed_with_first_coin(true));
        demo.plan = MovementPlan {
            dir_x: 1,
            steps_x: 0,
            dir_y: 1,
            steps_y: 0,
            done: false,
        };
        demo.step_movement(&mut host);
        assert_eq!(host.phase, Phase::Animating);
        assert_eq!(host.pos, (3, 2, 5), "kicked position committed wholesale");
        let turned = [host.angles.0, host.angles.1, host.angles.2]
            .iter()
            .filter(|&&a| a == 1)
            .count();
        assert_eq!(turned, 1, "exactly one axis took a quarter turn");
        assert!(!demo.plan.done, "preemption skips the completion check");
    }

    #[test]
    fn failed_kick_is_silently_skipped() {
        let mut host = ScriptedHost::new();
        host.phase = Phase::Playing;
        host.kick = None;
        let mut demo = Demo::new(seed_with_first_coin(true));
        demo.plan = MovementPlan::default();
        demo.step_movement(&mut host);
        assert!(host.called("try_wall_kick"));
        assert_eq!(host.phase, Phase::Playing);
        assert_eq!(host.angles, (0, 0, 0));
        assert!(demo.plan.done);
    }

    #[test]
    fn executor_defers_while_animating() {
        let mut host = ScriptedHost::new();
        host.phase = Phase::Animating;
        let mut demo = Demo::new(3);
        demo.plan = MovementPlan {
            dir_x: 1,
            steps_x: 2,
            dir_y: 1,
            steps_y: 2,
            done: false,
        };
        demo.step_movement(&mut host);
        assert_eq!(demo.plan.steps_x, 2);
        assert_eq!(demo.plan.steps_y, 2);
    }

    #[test]
    fn near_full_pit_forces_a_round_reset() {
        let mut host = ScriptedHost::new();
        let mut demo = started(&mut host);
        host.occupied = host.dims.2 - 2;
        demo.tick(&mut host);
        assert!(host.called("reset_game_state"));
        assert!(host.called("spawn_new_piece"));
        assert!(demo.center_drop);
    }

    #[test]
    fn clear_quota_resets_the_round_at_spawn() {
        let mut host = ScriptedHost::new();
        let mut demo = started(&mut host);
        demo.center_drop = false;
        demo.lines_base = 0;
        demo.clear_target = 1;
        host.lines_cleared = 1;
        host.pieces_played += 1;
        demo.tick(&mut host);
        assert!(host.called("reset_game_state"));
        assert!(demo.center_drop, "reset re-arms the center drop");
    }

    #[test]
    fn quota_is_only_checked_on_spawn_events() {
        let mut host = ScriptedHost::new();
        let mut demo = started(&mut host);
        demo.center_drop = false;
        demo.lines_base = 0;
        demo.clear_target = 1;
        host.lines_cleared = 1;
        demo.tick(&mut host);
        assert!(!host.called("reset_game_state"));
    }

    #[test]
    fn center_drop_is_exclusive_to_the_opening_piece() {
        let mut host = ScriptedHost::new();
        let mut demo = started(&mut host);
        assert!(demo.center_drop);

        // Opener locks, next piece spawns.
        host.pieces_played += 1;
        demo.tick(&mut host);
        assert!(!demo.center_drop);

        // Later spawns with the quota unmet keep it off.
        host.pieces_played += 1;
        demo.tick(&mut host);
        assert!(!demo.center_drop);
    }

    #[test]
    fn bottom_fill_leaves_only_the_center_gap() {
        let mut host = ScriptedHost::new();
        let _demo = started(&mut host);
        let (w, d, _) = host.dims;
        for y in 0..d {
            for x in 0..w {
                let filled = host.bottom[y as usize * w as usize + x as usize];
                if x == w / 2 && y == d / 2 {
                    assert!(!filled, "center cell must stay open");
                } else {
                    assert!(filled, "({x},{y}) must be pre-filled");
                }
            }
        }
    }

    #[test]
    fn center_drop_is_forced_down_after_its_delay() {
        let mut host = ScriptedHost::new();
        let mut demo = started(&mut host);
        let pos = host.pos;
        for _ in 0..CENTER_DROP_DELAY_FRAMES {
            demo.tick(&mut host);
            assert_eq!(host.phase, Phase::Playing);
        }
        demo.tick(&mut host);
        assert_eq!(host.phase, Phase::FastDrop);
        assert_eq!(demo.timer, 0);
        assert_eq!(host.pos, pos, "the opener never moves laterally");
    }

    #[test]
    fn finished_plan_is_dropped_after_the_loiter_bound() {
        let mut host = ScriptedHost::new();
        let mut demo = started(&mut host);
        demo.center_drop = false;
        demo.plan.done = true;
        for _ in 0..LOITER_FRAMES {
            demo.tick(&mut host);
            assert_eq!(host.phase, Phase::Playing);
        }
        demo.tick(&mut host);
        assert_eq!(host.phase, Phase::FastDrop);
        assert_eq!(demo.timer, 0);
    }

    #[test]
    fn spawn_event_plans_a_bounded_walk() {
        let mut host = ScriptedHost::new();
        let mut demo = started(&mut host);
        host.pieces_played += 1;
        demo.tick(&mut host);
        let (w, d, _) = host.dims;
        assert!(demo.plan.steps_x <= w / 2);
        assert!(demo.plan.steps_y <= d / 2);
        assert!(demo.plan.dir_x == 1 || demo.plan.dir_x == -1);
        assert!(demo.plan.dir_y == 1 || demo.plan.dir_y == -1);
        assert!(!demo.plan.done);
    }

    #[test]
    fn stop_hands_back_the_title_screen() {
        let mut host = ScriptedHost::new();
        let mut demo = started(&mut host);
        demo.stop(&mut host);
        assert!(!demo.is_active());
        assert_eq!(host.phase, Phase::Title);
        assert!(host.called("request_full_redraw"));

        // Stopping again is a no-op.
        host.calls.clear();
        demo.stop(&mut host);
        assert!(host.calls.is_empty());
    }

    #[test]
    fn tick_is_inert_while_inactive() {
        let mut host = ScriptedHost::new();
        let mut demo = Demo::new(5);
        host.occupied = host.dims.2;
        demo.tick(&mut host);
        assert!(host.calls.is_empty());
    }

    #[test]
    fn start_twice_is_a_no_op() {
        let mut host = ScriptedHost::new();
        let mut demo = started(&mut host);
        demo.start(&mut host);
        assert!(host.calls.is_empty());
    }

    #[test]
    fn opening_round_against_the_real_game_clears_the_floor() {
        use crate::game::GameState;
        use crate::theme::Theme;

        let mut state = GameState::new(Theme::default(), 5, 5, 12, 77);
        let mut demo = Demo::new(77);
        demo.start(&mut state);
        assert_eq!(state.phase, Phase::Playing);
        // The opener is the single cube, centred over the floor gap; once it is
        // forced down it plugs the gap and the pre-filled floor plane clears.
        for _ in 0..100 {
            demo.tick(&mut state);
            state.tick_frame();
            if state.lines_cleared >= 1 {
                break;
            }
        }
        assert_eq!(state.lines_cleared, 1, "floor plane should clear");
        assert!(demo.is_active());
        assert!(state.piece.is_some(), "play continues with the next piece");
        // The next tick observes the spawn and retires the opener.
        demo.tick(&mut state);
        assert!(!demo.center_drop);
    }
}
