// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Lattice module - strut lattices and region flexures built through the kernel

mod density;
mod error;
mod flexure;
mod generator;
mod region;
mod strut;

pub use density::{element_size_for, Density};
pub use error::LatticeError;
pub use flexure::{
    apply_lattice_flexures, process_region, select_fragment, FlexureReport, FlexureSettings,
    FragmentPolicy, RegionSkip, RegionStatus, DEFAULT_MAX_STRUTS, SPLIT_TOLERANCE,
};
pub use generator::{
    fold_strut, generate_lattice, grid_cell_count, grid_cells, StrutFold, JOIN_TOLERANCE,
};
pub use region::FlexureRegion;
pub use strut::{create_strut, STRUT_RADIUS};
