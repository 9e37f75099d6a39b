use crate::maze::Pos;

/// Handle to a brick sprite owned by a [`Stage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BrickId(usize);

/// Rendering collaborator the maze pushes sprites into. The core never reads
/// anything back from it.
pub trait Stage {
    fn add_brick(&mut self, pos: Pos) -> BrickId;
    fn remove_brick(&mut self, id: BrickId);
    fn add_exit(&mut self, pos: Pos);
    /// Drops every sprite, used when a session is torn down.
    fn clear(&mut self);
}

/// Slab of live sprites. Removed bricks leave a hole so handles stay stable.
#[derive(Debug, Default)]
pub struct SpriteLayer {
    bricks: Vec<Option<Pos>>,
    live: usize,
    exits: Vec<Pos>,
}

impl SpriteLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn brick_count(&self) -> usize {
        self.live
    }

    pub fn brick(&self, id: BrickId) -> Option<Pos> {
        self.bricks.get(id.0).copied().flatten()
    }

    pub fn bricks(&self) -> impl Iterator<Item = Pos> + '_ {
        self.bricks.iter().filter_map(|slot| *slot)
    }

    pub fn exits(&self) -> &[Pos] {
        &self.exits
    }
}

impl Stage for SpriteLayer {
    fn add_brick(&mut self, pos: Pos) -> BrickId {
        self.bricks.push(Some(pos));
        self.live += 1;
        BrickId(self.bricks.len() - 1)
    }

    fn remove_brick(&mut self, id: BrickId) {
        if let Some(slot) = self.bricks.get_mut(id.0) {
            if slot.take().is_some() {
                self.live -= 1;
            }
        }
    }

    fn add_exit(&mut self, pos: Pos) {
        self.exits.push(pos);
    }

    fn clear(&mut self) {
        self.bricks.clear();
        self.exits.clear();
        self.live = 0;
    }
}
