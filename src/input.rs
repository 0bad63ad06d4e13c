/// Snapshot of the keys and mouse motion the game reads each tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub sprint: bool,
    pub interact: bool,
    pub mouse_dx: f32, // Horizontal mouse motion since the last tick
}

impl InputState {
    pub fn is_diagonal(&self) -> bool {
        (self.up || self.down) && (self.left || self.right)
    }
}
