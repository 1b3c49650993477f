mod aabb;
mod collider;
pub mod gjk;
mod model;
mod shape;
mod simplex;
mod system;

pub use aabb::AABB;
pub use collider::Collider;
pub use gjk::GjkConfig;
pub use gjk::GjkError;
pub use gjk::GjkOutcome;
pub use model::ColliderPair;
pub use model::CollisionEvent;
pub use model::CollisionEventKind;
pub use model::CollisionPoints;
pub use model::CollisionRecord;
pub use shape::ConvexShape;
pub use shape::ShapeError;
pub use simplex::Simplex;
pub use simplex::SimplexError;
pub use system::PhysicsWorld;
