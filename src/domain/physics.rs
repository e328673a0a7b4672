/// Movement clamping and hitbox overlap: the geometric rules of the field.
///
/// ## Movement
///
/// One step moves a sprite `speed` pixels along a single axis, then that
/// axis (only) is clamped to `[0, field - sprite]`. A cat that lands on a
/// wall is pushed back inward by `cat_inset`, so a cat can never rest in a
/// strip the dog cannot get behind.
///
/// ## Collision
///
/// Axis-aligned boxes, half-open on the far edge. A cat's box is its sprite
/// square shrunk by `hitbox_inset` on every side; items use their full
/// square. Two boxes overlap when each one's near edge lies before the
/// other's far edge on both axes, so approach from either side is covered.

use crate::config::FieldConfig;
use super::entity::{MoveDir, Sprite, StaticItem};

/// Axis-aligned rectangle in field pixels: `[x, x + w) × [y, y + h)`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Rect { x, y, w, h }
    }

    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }
}

/// Move `sprite` one step in `dir`, face that way, clamp to the field.
pub fn step_sprite(sprite: &mut Sprite, dir: MoveDir, field: &FieldConfig) {
    sprite.facing = dir.facing();
    let max = field.max_pos();
    let inset = if sprite.is_cat() { field.cat_inset } else { 0 };

    match dir {
        MoveDir::Left => sprite.x = clamp_low(sprite.x - sprite.speed, inset),
        MoveDir::Right => sprite.x = clamp_high(sprite.x + sprite.speed, max, inset),
        MoveDir::Up => sprite.y = clamp_low(sprite.y - sprite.speed, inset),
        MoveDir::Down => sprite.y = clamp_high(sprite.y + sprite.speed, max, inset),
    }
}

#[inline]
fn clamp_low(pos: i32, inset: i32) -> i32 {
    if pos <= 0 { inset } else { pos }
}

#[inline]
fn clamp_high(pos: i32, max: i32, inset: i32) -> i32 {
    if pos >= max { max - inset } else { pos }
}

/// Collision box of a sprite.
pub fn sprite_hitbox(sprite: &Sprite, field: &FieldConfig) -> Rect {
    let inset = field.hitbox_inset;
    let side = field.sprite_size - 2 * inset;
    Rect::new(sprite.x + inset, sprite.y + inset, side, side)
}

pub fn item_box(item: &StaticItem) -> Rect {
    Rect::new(item.x, item.y, item.size, item.size)
}

/// Does the sprite's hitbox touch the item?
pub fn collides(sprite: &Sprite, item: &StaticItem, field: &FieldConfig) -> bool {
    sprite_hitbox(sprite, field).overlaps(&item_box(item))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::domain::entity::Facing;

    fn field() -> FieldConfig {
        GameConfig::default().field
    }

    // ── Movement ──

    #[test]
    fn player_moves_by_speed_and_faces_direction() {
        let f = field();
        let mut p = Sprite::player(100, 100, 6);
        step_sprite(&mut p, MoveDir::Right, &f);
        assert_eq!((p.x, p.y), (106, 100));
        assert_eq!(p.facing, Facing::Right);
        step_sprite(&mut p, MoveDir::Up, &f);
        assert_eq!((p.x, p.y), (106, 94));
        assert_eq!(p.facing, Facing::Up);
    }

    #[test]
    fn player_clamps_to_field_without_inset() {
        let f = field();
        let mut p = Sprite::player(3, 533, 6);
        step_sprite(&mut p, MoveDir::Left, &f);
        assert_eq!(p.x, 0);
        step_sprite(&mut p, MoveDir::Down, &f);
        assert_eq!(p.y, 536);
    }

    #[test]
    fn cat_at_wall_is_pushed_inward() {
        let f = field();
        let mut c = Sprite::cat(0, 4, 530, 7);
        step_sprite(&mut c, MoveDir::Left, &f);
        assert_eq!(c.x, 32);
        step_sprite(&mut c, MoveDir::Down, &f);
        assert_eq!(c.y, 536 - 32);
        c.y = 2;
        step_sprite(&mut c, MoveDir::Up, &f);
        assert_eq!(c.y, 32);
        c.x = 533;
        step_sprite(&mut c, MoveDir::Right, &f);
        assert_eq!(c.x, 504);
    }

    #[test]
    fn clamping_is_per_axis() {
        let f = field();
        let mut p = Sprite::player(0, 300, 6);
        step_sprite(&mut p, MoveDir::Left, &f);
        assert_eq!((p.x, p.y), (0, 300));
    }

    #[test]
    fn every_step_stays_in_bounds() {
        let f = field();
        let dirs = [MoveDir::Left, MoveDir::Right, MoveDir::Up, MoveDir::Down];
        for start in [0, 1, 5, 31, 300, 530, 535, 536] {
            for &d in &dirs {
                for sprite in [Sprite::player(start, start, 6), Sprite::cat(0, start, start, 7)] {
                    let mut s = sprite;
                    for _ in 0..120 {
                        step_sprite(&mut s, d, &f);
                        assert!(s.x >= 0 && s.x <= f.max_pos(), "x={} after {:?}", s.x, d);
                        assert!(s.y >= 0 && s.y <= f.max_pos(), "y={} after {:?}", s.y, d);
                    }
                }
            }
        }
    }

    #[test]
    fn cat_never_settles_flush_against_a_wall() {
        let f = field();
        let dirs = [MoveDir::Left, MoveDir::Right, MoveDir::Up, MoveDir::Down];
        for &d in &dirs {
            let mut c = Sprite::cat(0, 300, 300, 7);
            for _ in 0..100 { step_sprite(&mut c, d, &f); }
            let pos = match d {
                MoveDir::Left | MoveDir::Right => c.x,
                MoveDir::Up | MoveDir::Down => c.y,
            };
            assert!(pos > 0 && pos < f.max_pos(), "cat stuck at {} moving {:?}", pos, d);
        }
    }

    // ── Collision ──

    #[test]
    fn rect_overlap_from_either_side() {
        let a = Rect::new(10, 10, 20, 20);
        assert!(a.overlaps(&Rect::new(25, 25, 20, 20)));
        assert!(a.overlaps(&Rect::new(-5, -5, 20, 20)));
        assert!(Rect::new(25, 25, 20, 20).overlaps(&a));
        assert!(!a.overlaps(&Rect::new(30, 10, 5, 5)));   // touching edge only
        assert!(!a.overlaps(&Rect::new(10, 30, 5, 5)));
    }

    #[test]
    fn cat_on_goal_collides() {
        let f = field();
        let goal = StaticItem::goal(200, 200, 64);
        let cat = Sprite::cat(0, 190, 210, 7);
        assert!(collides(&cat, &goal, &f));
    }

    #[test]
    fn hitbox_inset_keeps_grazing_cat_out() {
        let f = field();
        let trap = StaticItem::trap(200, 200, 48);
        // Sprite square overlaps the trap by 10px, hitbox stops 1px short.
        let cat = Sprite::cat(0, 200 - 64 + 10, 200, 7);
        assert!(!collides(&cat, &trap, &f));
        let cat = Sprite::cat(0, 200 - 64 + 12, 200, 7);
        assert!(collides(&cat, &trap, &f));
    }

    #[test]
    fn collision_is_not_axis_swapped() {
        let f = field();
        let goal = StaticItem::goal(100, 400, 64);
        assert!(collides(&Sprite::cat(0, 100, 400, 7), &goal, &f));
        assert!(!collides(&Sprite::cat(0, 400, 100, 7), &goal, &f));
    }
}
