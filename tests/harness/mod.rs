// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test harness for intake gateway attack simulation.
//!
//! This module provides utilities for simulating abusive submission
//! patterns against the admission pipeline.

pub mod attacks;
pub mod generators;
pub mod metrics;
