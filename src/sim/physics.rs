//! Player physics
//!
//! One fixed step per frame: input sets velocity, gravity accelerates, then
//! the body moves one axis at a time and is pushed out of static blocks.
//! Velocities are in units per frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::tick::TickInput;
use crate::settings::PhysicsSettings;

/// The player's rigid body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerBody {
    /// Center of the hitbox
    pub position: Vec2,
    pub velocity: Vec2,
    pub width: f32,
    pub height: f32,
    /// Re-armed by ground contact, spent by a jump
    pub can_jump: bool,
}

impl PlayerBody {
    /// Fresh body at rest on a spawn point
    pub fn spawn(at: Vec2, settings: &PhysicsSettings) -> Self {
        Self {
            position: at,
            velocity: Vec2::ZERO,
            width: settings.player_width,
            height: settings.player_height,
            can_jump: true,
        }
    }

    /// Axis-aligned hitbox around the center
    pub fn hitbox(&self) -> Rect {
        Rect::from_center(self.position, self.width, self.height)
    }
}

/// What happened during one step (for animation and logging)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepEvents {
    pub jumped: bool,
    pub landed: bool,
    pub bonked: bool,
    pub wrapped: bool,
    /// Body dropped below the bottom of the level
    pub fell_out: bool,
}

/// Whether the body rests on any block
pub fn is_grounded(body: &PlayerBody, blocks: &[Rect], probe: f32) -> bool {
    let feet = body.hitbox().translated(Vec2::new(0.0, probe));
    blocks.iter().any(|b| b.overlaps(&feet))
}

/// Deepest push-out so far along one axis: the smallest edge when moving
/// forward, the largest when moving back
fn push_back(current: Option<f32>, edge: f32, forward: bool) -> f32 {
    match current {
        Some(c) if forward => c.min(edge),
        Some(c) => c.max(edge),
        None => edge,
    }
}

/// Advance the body by one frame
pub fn step(
    body: &mut PlayerBody,
    blocks: &[Rect],
    input: &TickInput,
    settings: &PhysicsSettings,
) -> StepEvents {
    let mut events = StepEvents::default();

    // Releasing both directions keeps the current horizontal velocity
    if input.left {
        body.velocity.x = -settings.move_speed;
    } else if input.right {
        body.velocity.x = settings.move_speed;
    }

    if is_grounded(body, blocks, settings.ground_probe) {
        body.can_jump = true;
    }

    if input.jump && body.can_jump {
        body.velocity.y = settings.jump_impulse;
        body.can_jump = false;
        events.jumped = true;
    }

    body.velocity.y += settings.gravity;

    let mut rect = body.hitbox();

    // X: the direction is fixed before resolving so every block sees it
    let vx = body.velocity.x;
    rect.x += vx;
    let mut wall = None;
    for block in blocks {
        if rect.overlaps(block) && rect.bottom() - block.y > settings.step_height {
            let edge = if vx > 0.0 { block.x - rect.w } else { block.right() };
            wall = Some(push_back(wall, edge, vx > 0.0));
        }
    }
    if let Some(x) = wall {
        if vx != 0.0 {
            rect.x = x;
        }
        body.velocity.x = 0.0;
    }

    // Feet only just inside a top edge: climb onto the highest such block
    let mut ledge = None;
    for block in blocks {
        if rect.overlaps(block) && rect.bottom() - block.y <= settings.step_height {
            ledge = Some(push_back(ledge, block.y - rect.h, true));
        }
    }
    if let Some(y) = ledge {
        rect.y = y;
    }

    // Y
    let vy = body.velocity.y;
    rect.y += vy;
    let mut contact = None;
    for block in blocks {
        if rect.overlaps(block) {
            let edge = if vy > 0.0 { block.y - rect.h } else { block.bottom() };
            contact = Some(push_back(contact, edge, vy > 0.0));
        }
    }
    if let Some(y) = contact {
        if vy > 0.0 {
            rect.y = y;
            events.landed = true;
        } else if vy < 0.0 {
            rect.y = y;
            events.bonked = true;
        }
        body.velocity.y = 0.0;
    }

    body.position = rect.center();

    // Screen wrap on the center, velocity untouched
    let half_w = body.width / 2.0;
    if body.position.x > settings.level_width + half_w {
        body.position.x = -half_w;
        events.wrapped = true;
    } else if body.position.x < -half_w {
        body.position.x = settings.level_width + half_w;
        events.wrapped = true;
    }

    if body.hitbox().y > settings.level_height {
        events.fell_out = true;
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor() -> Vec<Rect> {
        vec![Rect::new(0.0, 640.0, 768.0, 128.0)]
    }

    /// Body standing exactly on the floor
    fn resting(x: f32) -> PlayerBody {
        PlayerBody::spawn(Vec2::new(x, 610.0), &PhysicsSettings::default())
    }

    fn settle(body: &mut PlayerBody, blocks: &[Rect]) {
        for _ in 0..120 {
            step(body, blocks, &TickInput::default(), &PhysicsSettings::default());
        }
    }

    #[test]
    fn test_falls_and_lands_on_floor() {
        let settings = PhysicsSettings::default();
        let blocks = floor();
        let mut body = PlayerBody::spawn(Vec2::new(100.0, 400.0), &settings);
        settle(&mut body, &blocks);
        assert!((body.position.y - 610.0).abs() < 0.001);
        assert_eq!(body.velocity.y, 0.0);
        assert!(is_grounded(&body, &blocks, settings.ground_probe));
    }

    #[test]
    fn test_horizontal_input_sets_speed_and_coasts() {
        let settings = PhysicsSettings::default();
        let blocks = floor();
        let mut body = resting(100.0);

        let right = TickInput {
            right: true,
            ..Default::default()
        };
        step(&mut body, &blocks, &right, &settings);
        assert_eq!(body.velocity.x, 3.5);

        // No key held: velocity is left as-is
        let x_before = body.position.x;
        step(&mut body, &blocks, &TickInput::default(), &settings);
        assert_eq!(body.velocity.x, 3.5);
        assert!(body.position.x > x_before);

        let left = TickInput {
            left: true,
            ..Default::default()
        };
        step(&mut body, &blocks, &left, &settings);
        assert_eq!(body.velocity.x, -3.5);
    }

    #[test]
    fn test_left_wins_when_both_held() {
        let settings = PhysicsSettings::default();
        let mut body = resting(100.0);
        let both = TickInput {
            left: true,
            right: true,
            jump: false,
        };
        step(&mut body, &floor(), &both, &settings);
        assert_eq!(body.velocity.x, -3.5);
    }

    #[test]
    fn test_jump_only_when_grounded_once_per_contact() {
        let settings = PhysicsSettings::default();
        let blocks = floor();
        let mut body = resting(100.0);
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };

        let ev = step(&mut body, &blocks, &jump, &settings);
        assert!(ev.jumped);
        assert!(body.velocity.y < 0.0);
        assert!(!body.can_jump);

        // Holding jump in the air does not jump again
        let vy = body.velocity.y;
        let ev = step(&mut body, &blocks, &jump, &settings);
        assert!(!ev.jumped);
        assert!((body.velocity.y - (vy + settings.gravity)).abs() < 0.001);
    }

    #[test]
    fn test_airborne_spawn_cannot_jump_after_spending_latch() {
        let settings = PhysicsSettings::default();
        let blocks = floor();
        let mut body = PlayerBody::spawn(Vec2::new(100.0, 200.0), &settings);
        body.can_jump = false;
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        let ev = step(&mut body, &blocks, &jump, &settings);
        assert!(!ev.jumped);
    }

    #[test]
    fn test_wall_stops_horizontal_motion() {
        let settings = PhysicsSettings::default();
        let mut blocks = floor();
        blocks.push(Rect::new(127.0, 500.0, 32.0, 140.0));
        let mut body = resting(100.0);
        let right = TickInput {
            right: true,
            ..Default::default()
        };
        for _ in 0..10 {
            step(&mut body, &blocks, &right, &settings);
        }
        assert!((body.hitbox().right() - 127.0).abs() < 0.001);
    }

    #[test]
    fn test_head_bump_zeroes_upward_velocity() {
        let settings = PhysicsSettings::default();
        let mut blocks = floor();
        blocks.push(Rect::new(0.0, 540.0, 768.0, 32.0));
        let mut body = resting(100.0);
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        let ev = step(&mut body, &blocks, &jump, &settings);
        assert!(ev.bonked);
        assert_eq!(body.velocity.y, 0.0);
        assert!((body.hitbox().y - 572.0).abs() < 0.001);
    }

    #[test]
    fn test_steps_up_onto_floor_after_wrap() {
        let settings = PhysicsSettings::default();
        let blocks = floor();
        // Just wrapped to the left edge and sagged below the floor top
        let mut body = resting(-25.0);
        body.position.y += 0.5;
        body.velocity = Vec2::new(3.5, 0.4);
        step(&mut body, &blocks, &TickInput::default(), &settings);
        assert_eq!(body.velocity.x, 3.5);
        assert!((body.hitbox().bottom() - 640.0).abs() < 0.001);
    }

    #[test]
    fn test_fell_out_flagged_below_level() {
        let settings = PhysicsSettings::default();
        let mut body = PlayerBody::spawn(Vec2::new(100.0, 820.0), &settings);
        let ev = step(&mut body, &[], &TickInput::default(), &settings);
        assert!(ev.fell_out);
    }

    #[test]
    fn test_screen_wrap_both_edges() {
        let settings = PhysicsSettings::default();
        let blocks = floor();

        let mut body = resting(settings.level_width + 24.0);
        body.velocity.x = 3.5;
        let ev = step(&mut body, &blocks, &TickInput::default(), &settings);
        assert!(ev.wrapped);
        assert_eq!(body.position.x, -25.0);
        assert_eq!(body.velocity.x, 3.5);

        let mut body = resting(-24.0);
        body.velocity.x = -3.5;
        let ev = step(&mut body, &blocks, &TickInput::default(), &settings);
        assert!(ev.wrapped);
        assert_eq!(body.position.x, settings.level_width + 25.0);
    }

    #[test]
    fn test_lands_on_highest_of_uneven_blocks() {
        let settings = PhysicsSettings::default();
        // The taller ledge is listed second
        let blocks = vec![
            Rect::new(0.0, 610.0, 50.0, 158.0),
            Rect::new(50.0, 600.0, 100.0, 40.0),
        ];
        let mut body = PlayerBody::spawn(Vec2::new(50.0, 565.0), &settings);
        body.velocity.y = 19.6;

        let ev = step(&mut body, &blocks, &TickInput::default(), &settings);
        assert!(ev.landed);
        assert!((body.hitbox().bottom() - 600.0).abs() < 0.001);
        assert!(blocks.iter().all(|b| !body.hitbox().overlaps(b)));
    }

    #[test]
    fn test_wall_stops_at_nearest_of_two_faces() {
        let settings = PhysicsSettings::default();
        let mut blocks = floor();
        blocks.push(Rect::new(130.0, 500.0, 40.0, 140.0));
        blocks.push(Rect::new(128.0, 560.0, 40.0, 80.0));
        let mut body = resting(102.0);
        let right = TickInput {
            right: true,
            ..Default::default()
        };

        step(&mut body, &blocks, &right, &settings);
        assert_eq!(body.velocity.x, 0.0);
        assert!((body.hitbox().right() - 128.0).abs() < 0.001);
        assert!(blocks.iter().all(|b| !body.hitbox().overlaps(b)));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn body_never_sinks_into_floor(
                moves in proptest::collection::vec((any::<bool>(), any::<bool>(), any::<bool>()), 10..60)
            ) {
                let settings = PhysicsSettings::default();
                let blocks = floor();
                let mut body = resting(300.0);
                for (left, right, jump) in moves {
                    step(&mut body, &blocks, &TickInput { left, right, jump }, &settings);
                    prop_assert!(body.position.is_finite());
                    prop_assert!(body.hitbox().bottom() <= 640.0 + 0.001);
                }
            }
        }
    }
}
