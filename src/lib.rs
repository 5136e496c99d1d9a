//! Foodgram - recipe sharing backend core
//!
//! Collision-free short links for recipe pages and printable shopping lists
//! built from a user's cart.
//!
//! # Architecture
//! - `services`: short link allocation, shopping list composition, cart and subscriptions
//! - `storage`: short link stores (SeaORM, in-memory) and recipe queries
//! - `api`: HTTP handlers and routing (actix-web)
//! - `utils`: PDF layout with embedded fonts
//! - `config`: configuration loading (TOML + `FG__*` environment)
//! - `runtime`: server and CLI modes
//! - `system`: logging setup

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
