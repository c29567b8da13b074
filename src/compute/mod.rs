// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Compute module - the remote kernel boundary and its implementations

mod client;
pub mod codec;
mod error;
mod http;
mod memory;
mod wire;

pub use client::GeometryClient;
pub use codec::GeometryObject;
pub use error::{ComputeError, Result};
pub use http::HttpComputeClient;
pub use memory::{CallLog, Faults, InMemoryKernel, JoinCall};
