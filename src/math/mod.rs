//! Geometric primitives used by mesh building and surface queries

pub mod aabb;
pub mod ray;
pub mod triangle;

pub use aabb::Aabb;
pub use ray::{Ray, TriangleHit};
pub use triangle::Triangle;
