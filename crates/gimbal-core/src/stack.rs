// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

use crate::mat4x3::Mat4x3;

/// Errors raised by [`Mat4x3Stack`] contract violations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StackError {
    /// `push` was called with every save slot already in use.
    #[error("matrix stack capacity exceeded: all {capacity} save slots in use")]
    Overflow {
        /// Number of save slots the stack was built with.
        capacity: usize,
    },
    /// `pop` was called with no saved matrix to restore.
    #[error("matrix stack underflow: no saved matrix to restore")]
    Underflow,
    /// The stack was constructed with a size below the minimum of 1.
    #[error("matrix stack requires a size of at least 1, got {0}")]
    InvalidSize(usize),
}

/// Fixed-capacity save/restore stack for a current [`Mat4x3`], mirroring
/// legacy immediate-mode matrix stacks.
///
/// The current matrix is owned by composition and reached through
/// [`Mat4x3Stack::current`] / [`Mat4x3Stack::current_mut`] (or the
/// `AsRef`/`AsMut` conversions), so the stack is usable wherever a matrix is
/// expected without inheriting its interface. A stack of size `n` holds
/// `n - 1` save slots besides the current matrix; all backing storage is
/// allocated once at construction and never again, so steady-state use in a
/// per-frame loop allocates nothing.
///
/// # Examples
/// ```
/// use gimbal_core::Mat4x3Stack;
/// let mut stack = Mat4x3Stack::new(2)?;
/// stack.push()?;
/// stack.current_mut().translate(1.0, 2.0, 3.0);
/// stack.pop()?;
/// assert_eq!(*stack.current(), gimbal_core::Mat4x3::identity());
/// # Ok::<(), gimbal_core::StackError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Mat4x3Stack {
    curr: Mat4x3,
    saved: Box<[Mat4x3]>,
    cursor: usize,
}

impl Mat4x3Stack {
    /// Creates a stack with `stack_size - 1` save slots and an identity
    /// current matrix.
    ///
    /// `stack_size` must be at least 1 (a size-1 stack has a current matrix
    /// and no save slots).
    pub fn new(stack_size: usize) -> Result<Self, StackError> {
        if stack_size < 1 {
            return Err(StackError::InvalidSize(stack_size));
        }
        Ok(Self {
            curr: Mat4x3::identity(),
            saved: vec![Mat4x3::identity(); stack_size - 1].into_boxed_slice(),
            cursor: 0,
        })
    }

    /// Saves the current matrix — values and flags — into the next free
    /// slot.
    pub fn push(&mut self) -> Result<&mut Self, StackError> {
        if self.cursor == self.saved.len() {
            return Err(StackError::Overflow {
                capacity: self.saved.len(),
            });
        }
        self.saved[self.cursor] = self.curr;
        self.cursor += 1;
        Ok(self)
    }

    /// Restores the current matrix from the most recent save slot.
    ///
    /// The slot keeps its stale copy afterwards; it is overwritten before
    /// any future reuse.
    pub fn pop(&mut self) -> Result<&mut Self, StackError> {
        if self.cursor == 0 {
            return Err(StackError::Underflow);
        }
        self.cursor -= 1;
        self.curr = self.saved[self.cursor];
        Ok(self)
    }

    /// Drops all saved matrices and resets the current matrix to identity.
    pub fn clear(&mut self) -> &mut Self {
        self.cursor = 0;
        self.curr = Mat4x3::identity();
        self
    }

    /// The current matrix.
    pub fn current(&self) -> &Mat4x3 {
        &self.curr
    }

    /// Mutable access to the current matrix for in-place transform chains.
    pub fn current_mut(&mut self) -> &mut Mat4x3 {
        &mut self.curr
    }

    /// Number of save slots currently in use.
    pub fn depth(&self) -> usize {
        self.cursor
    }

    /// Total number of save slots (`stack_size - 1`).
    pub fn capacity(&self) -> usize {
        self.saved.len()
    }
}

impl AsRef<Mat4x3> for Mat4x3Stack {
    fn as_ref(&self) -> &Mat4x3 {
        &self.curr
    }
}

impl AsMut<Mat4x3> for Mat4x3Stack {
    fn as_mut(&mut self) -> &mut Mat4x3 {
        &mut self.curr
    }
}
