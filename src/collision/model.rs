use glam::Vec3;
use hecs::Entity;

/// Result of one collider pair test.
///
/// Only `has_collision` is computed. The manifold fields are reserved and
/// stay zero.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct CollisionPoints {
    /// Furthest point of A into B (reserved)
    pub furthest_a: Vec3,
    /// Furthest point of B into A (reserved)
    pub furthest_b: Vec3,
    /// B - A normalized (reserved)
    pub normal: Vec3,
    /// Length of B - A (reserved)
    pub depth: f32,
    pub has_collision: bool,
}

/// Unordered pair of collider entities, `(a, b)` and `(b, a)` are the same key
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ColliderPair {
    low: Entity,
    high: Entity,
}

impl ColliderPair {
    pub fn new(a: Entity, b: Entity) -> ColliderPair {
        debug_assert_ne!(a, b, "Collider can not be paired with itself");
        if a.to_bits() <= b.to_bits() {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    pub fn entities(&self) -> (Entity, Entity) {
        (self.low, self.high)
    }
}

/// Last known outcome for one collider pair, kept across ticks
#[derive(Copy, Clone, Debug)]
pub struct CollisionRecord {
    pub a: Entity,
    pub b: Entity,
    pub points: CollisionPoints,
}

impl CollisionRecord {
    pub fn new(a: Entity, b: Entity) -> CollisionRecord {
        Self {
            a,
            b,
            points: CollisionPoints::default(),
        }
    }

    pub fn has_collision(&self) -> bool {
        self.points.has_collision
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.a == entity || self.b == entity
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CollisionEventKind {
    Enter,
    Colliding,
    Exit,
}

impl CollisionEventKind {
    /// Event for a pair going from `was_colliding` to `now_colliding`
    pub fn from_transition(was_colliding: bool, now_colliding: bool) -> Option<CollisionEventKind> {
        match (was_colliding, now_colliding) {
            (false, true) => Some(CollisionEventKind::Enter),
            (true, true) => Some(CollisionEventKind::Colliding),
            (true, false) => Some(CollisionEventKind::Exit),
            (false, false) => None,
        }
    }
}

/// Entities are plain ids, so an event stays valid after either collider is despawned
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CollisionEvent {
    pub a: Entity,
    pub b: Entity,
    pub kind: CollisionEventKind,
}

impl CollisionEvent {
    pub fn concerns(&self, entity: Entity) -> bool {
        self.a == entity || self.b == entity
    }

    /// The collider `entity` collided with, if the event concerns it
    pub fn other(&self, entity: Entity) -> Option<Entity> {
        if self.a == entity {
            Some(self.b)
        } else if self.b == entity {
            Some(self.a)
        } else {
            None
        }
    }
}
