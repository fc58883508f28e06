// Copyright (c) 2026 AE3GIS Authors
// SPDX-License-Identifier: AGPL-3.0

//! `ae3gisctl` CLI library — exposes testable components.

pub mod commands;
