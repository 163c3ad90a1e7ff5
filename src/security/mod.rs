// ABOUTME: HTTP-level security helpers for the session cookie
// ABOUTME: Token signing and password hashing live in the auth module
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Session cookie construction and parsing
pub mod cookies;
