// Copyright (c) 2026 AE3GIS Authors
// SPDX-License-Identifier: AGPL-3.0

//! Use cases built on the domain model and the infrastructure drivers.

pub mod classroom_service;
pub mod deployment_service;
pub mod descriptor_writer;
