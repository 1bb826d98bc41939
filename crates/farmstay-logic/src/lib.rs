//! Pure grid-walking logic for Farmstay.
//!
//! This crate contains the algorithms that drive every mobile character,
//! independent of any engine, ECS, or runtime. Functions take plain data and
//! return results, making them unit-testable and portable between the
//! simulation engine, headless tools, and any future client.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`grid`] | Grid coordinates, walkability queries, grid↔world mapping |
//! | [`queue`] | Indexed binary min-heap with decrease-key (A* open set) |
//! | [`pathfinding`] | A* search with leap edges over blocked cells |
//! | [`animation`] | Animation-name fallback resolution per archetype |

pub mod animation;
pub mod grid;
pub mod pathfinding;
pub mod queue;
