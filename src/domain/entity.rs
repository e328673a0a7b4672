/// Entities: Sprite (player dog and cats share one shape) and StaticItem
/// (goal box and traps). Pure data; nothing here knows how it is drawn.

/// Which row of the sprite sheet an actor is showing.
/// Doubles as the actor's facing: a moving sprite faces where it moved.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Facing {
    Down,
    Right,
    Up,
    Left,
    Rest,
}

impl Facing {
    /// Pixel row offset of this animation strip in a 64px sprite sheet.
    pub fn row(self) -> u32 {
        match self {
            Facing::Down => 0,
            Facing::Right => 64,
            Facing::Up => 128,
            Facing::Left => 192,
            Facing::Rest => 256,
        }
    }
}

/// Movement direction of one discrete step.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveDir {
    Left,
    Right,
    Up,
    Down,
}

impl MoveDir {
    pub fn facing(self) -> Facing {
        match self {
            MoveDir::Left => Facing::Left,
            MoveDir::Right => Facing::Right,
            MoveDir::Up => Facing::Up,
            MoveDir::Down => Facing::Down,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SpriteKind {
    Player,
    Cat,
}

/// Frames per animation strip.
pub const ANIM_FRAMES: u8 = 4;

#[derive(Clone, Debug)]
pub struct Sprite {
    pub kind: SpriteKind,
    pub id: usize,
    pub x: i32,
    pub y: i32,
    pub speed: i32,
    pub facing: Facing,
    pub frame: u8,
    /// False once a cat has been captured by the goal or a trap.
    pub active: bool,
}

impl Sprite {
    pub fn player(x: i32, y: i32, speed: i32) -> Self {
        Sprite {
            kind: SpriteKind::Player,
            id: 0,
            x, y, speed,
            facing: Facing::Down,
            frame: 0,
            active: true,
        }
    }

    pub fn cat(id: usize, x: i32, y: i32, speed: i32) -> Self {
        Sprite {
            kind: SpriteKind::Cat,
            id,
            x, y, speed,
            facing: Facing::Rest,
            frame: 0,
            active: true,
        }
    }

    pub fn is_cat(&self) -> bool {
        self.kind == SpriteKind::Cat
    }

    /// Advance the animation strip by one frame. Position is never touched.
    pub fn advance_frame(&mut self) {
        self.frame = (self.frame + 1) % ANIM_FRAMES;
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ItemKind {
    Goal,
    Trap,
}

/// Goal box or trap. Placed at level setup, never moved.
#[derive(Clone, Debug)]
pub struct StaticItem {
    pub kind: ItemKind,
    pub x: i32,
    pub y: i32,
    pub size: i32,
}

impl StaticItem {
    pub fn goal(x: i32, y: i32, size: i32) -> Self {
        StaticItem { kind: ItemKind::Goal, x, y, size }
    }

    pub fn trap(x: i32, y: i32, size: i32) -> Self {
        StaticItem { kind: ItemKind::Trap, x, y, size }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn animation_wraps_after_four_frames() {
        let mut s = Sprite::cat(0, 100, 100, 7);
        for _ in 0..3 { s.advance_frame(); }
        assert_eq!(s.frame, 3);
        s.advance_frame();
        assert_eq!(s.frame, 0);
        assert_eq!((s.x, s.y), (100, 100));
    }

    #[test]
    fn new_cat_rests_and_player_faces_down() {
        let c = Sprite::cat(2, 80, 90, 7);
        assert_eq!(c.facing, Facing::Rest);
        assert!(c.active && c.is_cat());
        let p = Sprite::player(15, 0, 6);
        assert_eq!(p.facing, Facing::Down);
        assert!(!p.is_cat());
    }

    #[test]
    fn sheet_rows() {
        assert_eq!(Facing::Down.row(), 0);
        assert_eq!(Facing::Left.row(), 192);
        assert_eq!(Facing::Rest.row(), 256);
        assert_eq!(MoveDir::Up.facing(), Facing::Up);
    }
}
