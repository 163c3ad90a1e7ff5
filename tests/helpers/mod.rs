// ABOUTME: Shared helper modules for integration tests
// ABOUTME: Currently provides in-process request builders for axum routers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(dead_code)]

pub mod axum_test;
