// SPDX-License-Identifier: MIT

//! The blog post tool server: configuration, tools, registry and HTTP front end.

pub mod config;
pub mod registry;
pub mod server;
pub mod tools;
