//! PDOGS Core -- a deterministic, tick-driven grid logistics engine.
//!
//! A rectangular board holds a static background layer of number deposits
//! and a foreground layer of entities: walls, conveyors, combiners, mining
//! machines and a single collection center. Miners extract products,
//! conveyors move them, combiners add pairs together, and the collection
//! center scores each product whose value is a multiple of the level's
//! divisor.
//!
//! # Tick
//!
//! Each call to [`manager::Manager::update`] runs one tick:
//!
//! 1. **Clock** -- stop at the end tick, otherwise advance.
//! 2. **Action** -- every `action_interval` ticks the [`strategy::Strategy`]
//!    is asked for one [`action::Action`], which is applied immediately.
//! 3. **Pass one** -- a row-major sweep in which every entity pushes
//!    products toward its downstream neighbor.
//! 4. **Pass two** -- a second row-major sweep that compacts conveyors.
//!
//! Entities only interact through the [`flow::FlowPort`] protocol: ask a
//! neighbor its capacity, then send it one product.
//!
//! # Key Types
//!
//! - [`board::Board`] -- layered grid plus the `slotmap` entity arena.
//! - [`entity::ForegroundCell`] -- a placed entity and its footprint anchor.
//! - [`manager::Manager`] -- owns board, clock, score and strategy.
//! - [`world::generate_world`] -- seeded deposit and wall placement.
//! - [`replay::ReplayLog`] -- recorded games with hash checkpoints.

pub mod action;
pub mod action_log;
pub mod board;
pub mod config;
pub mod entity;
pub mod flow;
pub mod grid;
pub mod id;
pub mod manager;
pub mod product;
pub mod replay;
pub mod rng;
pub mod sim;
pub mod strategy;
pub mod world;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
