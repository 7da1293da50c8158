// SPDX-License-Identifier: Apache-2.0

//! gimbal-core: dense affine transform algebra for 3D graphics.
//!
//! The centrepiece is [`Mat4x3`], a column-major 4x3 double-precision affine
//! matrix carrying a conservative [`Properties`] bitset: every mutating
//! operation consults its operands' flags to pick the cheapest correct
//! algorithm and recomputes the destination's flags so later operations keep
//! dispatching correctly. [`Quat`] supplies the rotation-building companion,
//! [`Mat4x3Stack`] the fixed-capacity save/restore stack, and [`buffer`] the
//! flat-buffer interop.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::unreadable_literal,
    clippy::missing_const_for_fn,
    clippy::suboptimal_flops,
    clippy::redundant_pub_crate,
    clippy::similar_names,
    clippy::many_single_char_names,
    clippy::too_many_lines,
    clippy::doc_markdown,
    clippy::missing_errors_doc,
    clippy::module_name_repetitions
)]

pub mod buffer;
pub mod scalar;

mod mat4x3;
mod properties;
mod quat;
mod stack;
mod vec3;

// Re-exports for stable public API
pub use mat4x3::{AccessError, Mat4x3};
pub use properties::Properties;
pub use quat::Quat;
pub use stack::{Mat4x3Stack, StackError};
pub use vec3::Vec3;
