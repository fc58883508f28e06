// Copyright (c) 2026 AE3GIS Authors
// SPDX-License-Identifier: AGPL-3.0

//! Everything that talks to the outside world: configuration, subprocess
//! invocation, and the concrete drivers built on top of it.

pub mod config;
pub mod firewall;
pub mod lab_driver;
pub mod mgmt_allocator;
pub mod process;
pub mod seeder;
