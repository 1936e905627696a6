//! Square cell masks packed into one unsigned integer.
//!
//! Cell (`row`, `col`) of an `N×N` grid is bit `row * N + col`. Masks are
//! `Copy` and combine with `&`, `|` and `!`; [`BitBoard::dilate`] adds the
//! eight neighbours of every set cell, which is how ship halos are built.

use core::fmt;
use core::ops::{BitAnd, BitOr, Not};
use num_traits::{PrimInt, Unsigned};

/// Cell outside the `N×N` square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitBoardError {
    IndexOutOfBounds { row: usize, col: usize },
}

impl fmt::Display for BitBoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BitBoardError::IndexOutOfBounds { row, col } => {
                write!(f, "cell ({}, {}) is outside the board", row, col)
            }
        }
    }
}

/// Occupancy mask over an `N×N` grid stored in `T`. Bits above `N * N` are
/// always zero.
#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct BitBoard<T, const N: usize>
where
    T: PrimInt + Unsigned,
{
    bits: T,
}

impl<T, const N: usize> BitBoard<T, N>
where
    T: PrimInt + Unsigned,
{
    const CELLS: usize = N * N;

    fn valid_bits() -> T {
        if Self::CELLS >= T::zero().count_zeros() as usize {
            !T::zero()
        } else {
            (T::one() << Self::CELLS) - T::one()
        }
    }

    /// Every cell except those in column `col`.
    fn without_column(col: usize) -> T {
        (0..N).fold(Self::valid_bits(), |acc, row| {
            acc & !(T::one() << (row * N + col))
        })
    }

    fn bit(row: usize, col: usize) -> Result<T, BitBoardError> {
        if row < N && col < N {
            Ok(T::one() << (row * N + col))
        } else {
            Err(BitBoardError::IndexOutOfBounds { row, col })
        }
    }

    fn masked(bits: T) -> Self {
        BitBoard {
            bits: bits & Self::valid_bits(),
        }
    }

    pub fn new() -> Self {
        BitBoard { bits: T::zero() }
    }

    /// Mask of the given cells; fails on the first cell off the grid.
    pub fn from_cells<I>(cells: I) -> Result<Self, BitBoardError>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        cells.into_iter().try_fold(Self::new(), |mut mask, (r, c)| {
            mask.set(r, c)?;
            Ok(mask)
        })
    }

    pub fn count_ones(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits == T::zero()
    }

    pub fn get(&self, row: usize, col: usize) -> Result<bool, BitBoardError> {
        Ok(self.bits & Self::bit(row, col)? != T::zero())
    }

    pub fn set(&mut self, row: usize, col: usize) -> Result<(), BitBoardError> {
        self.bits = self.bits | Self::bit(row, col)?;
        Ok(())
    }

    pub fn clear_all(&mut self) {
        self.bits = T::zero();
    }

    /// This mask plus the 8-neighbourhood of every set cell, clipped to the
    /// grid.
    pub fn dilate(&self) -> Self {
        let b = self.bits;
        // a column shift must not carry into the next row
        let widened = b | ((b << 1) & Self::without_column(0)) | ((b >> 1) & Self::without_column(N - 1));
        Self::masked(widened | (widened << N) | (widened >> N))
    }

    /// Set cells in row-major order.
    pub fn iter_set_bits(&self) -> SetBits<T, N> {
        SetBits { rest: self.bits }
    }
}

impl<T, const N: usize> Default for BitBoard<T, N>
where
    T: PrimInt + Unsigned,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> fmt::Debug for BitBoard<T, N>
where
    T: PrimInt + Unsigned,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..N {
            for col in 0..N {
                let set = self.get(row, col).unwrap_or(false);
                f.write_str(if set { "■ " } else { "□ " })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Iterator over the set cells of a [`BitBoard`], lowest bit first.
#[derive(Clone, Copy)]
pub struct SetBits<T, const N: usize> {
    rest: T,
}

impl<T, const N: usize> Iterator for SetBits<T, N>
where
    T: PrimInt + Unsigned,
{
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest == T::zero() {
            return None;
        }
        let idx = self.rest.trailing_zeros() as usize;
        // drop the lowest set bit
        self.rest = self.rest & (self.rest - T::one());
        Some((idx / N, idx % N))
    }
}

impl<T, const N: usize> BitAnd for BitBoard<T, N>
where
    T: PrimInt + Unsigned,
{
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        BitBoard {
            bits: self.bits & rhs.bits,
        }
    }
}

impl<T, const N: usize> BitOr for BitBoard<T, N>
where
    T: PrimInt + Unsigned,
{
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        BitBoard {
            bits: self.bits | rhs.bits,
        }
    }
}

/// Cells not in the mask.
impl<T, const N: usize> Not for BitBoard<T, N>
where
    T: PrimInt + Unsigned,
{
    type Output = Self;
    fn not(self) -> Self {
        Self::masked(!self.bits)
    }
}
