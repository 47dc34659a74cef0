// SPDX-License-Identifier: MIT

//! Building blocks shared by every tool: errors, the tool contract and the
//! completion model seam.

pub mod error;
pub mod model;
pub mod tool;
