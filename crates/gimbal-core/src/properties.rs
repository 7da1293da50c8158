// SPDX-License-Identifier: Apache-2.0

use core::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};

/// Conservative summary of a matrix's known algebraic structure.
///
/// Every [`crate::Mat4x3`] carries one of these so mutating operations can
/// pick the cheapest correct algorithm without re-inspecting raw scalars.
/// The contract is asymmetric on purpose:
///
/// * a flag may be **absent** even though the underlying structure would
///   justify it — that only costs performance;
/// * a flag must **never be present** unless the property genuinely holds —
///   a stale flag silently corrupts every fast path that trusts it.
///
/// Operations that cannot cheaply prove a flag still holds for their
/// destination clear it. Promotion from raw data happens only in
/// [`crate::Mat4x3::determine_properties`].
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Properties(u8);

impl Properties {
    /// No known structure; every operation takes its general path.
    pub const NONE: Self = Self(0);

    /// The matrix is exactly the identity: linear part identity and
    /// translation column exactly zero. Implies [`Self::TRANSLATION`] and
    /// [`Self::ORTHONORMAL`].
    pub const IDENTITY: Self = Self(1 << 0);

    /// The 3x3 linear part is exactly the identity; only the translation
    /// column may be non-trivial. Implies the linear part is orthonormal.
    pub const TRANSLATION: Self = Self(1 << 1);

    /// The 3x3 linear part's columns are unit length and mutually
    /// orthogonal (pure rotation or reflection, no scale/shear). The
    /// translation column is unconstrained.
    pub const ORTHONORMAL: Self = Self(1 << 2);

    /// Raw bit value, useful for assertions and debugging.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns `true` when every bit of `other` is set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` when `self` and `other` share at least one bit.
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Returns `true` when no flag is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Const-context union; equivalent to `self | other`.
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl BitOr for Properties {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Properties {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Properties {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl BitAndAssign for Properties {
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl Not for Properties {
    type Output = Self;
    fn not(self) -> Self {
        Self(!self.0 & 0b111)
    }
}
