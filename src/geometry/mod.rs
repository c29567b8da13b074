// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - value types exchanged with the kernel

mod bbox;
mod mesh;
mod primitives;
mod solid;

pub use bbox::BoundingBox;
pub use mesh::{Face, Mesh};
pub use primitives::Primitive;
pub use solid::{Archive, Solid};
