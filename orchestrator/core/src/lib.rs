// Copyright (c) 2026 AE3GIS Authors
// SPDX-License-Identifier: AGPL-3.0
//! # ae3gis-orchestrator-core
//!
//! Topology compiler and deployment runtime for the AE3GIS network-lab
//! orchestrator. This crate owns the pieces a classroom network lab needs
//! beyond "an authored topology exists": turning that topology into a
//! deployable descriptor, driving an external lab engine against it, and
//! the handful of live-session protocols (status stream, interactive exec,
//! reverse proxy) a running lab needs.
//!
//! ## Layer structure
//!
//! ```text
//! presentation/   ← status stream, PTY exec multiplexer, reverse proxy
//!     ↓
//! application/    ← use cases: descriptor writing, deployment, classroom instantiation
//!     ↓
//! domain/         ← topology model, compiler, error taxonomy, repository traits
//!     ↓
//! infrastructure/ ← subprocess driver, management-network allocator, firewall, seeder
//! ```
//!
//! CRUD persistence, the HTTP routing surface, auth policy, and the external
//! lab/container engines themselves are out of scope; [`domain::repository`]
//! declares the trait seams this crate calls through to reach them.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
