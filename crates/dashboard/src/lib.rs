//! Ledgerboard Dashboard library.
//!
//! This crate provides the dashboard functionality as a library, allowing it
//! to be reused by the CLI (pool setup, password hashing for seeding) and
//! exercised by tests.
//!
//! # Architecture
//!
//! The write path is a validated-mutation pipeline: raw form input passes
//! through the validation layer ([`forms`]), the session's email claim is
//! resolved to a tenant row ([`services::auth`]), and the mutation services
//! issue exactly one tenant-scoped statement per operation ([`db`]). Reads are
//! tenant-scoped projections with listing snapshots held in an invalidation
//! cache ([`cache`]).

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod forms;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
