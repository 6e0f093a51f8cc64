//! Row-major index arithmetic and the offset maps behind array views.
//!
//! A view never copies elements. It keeps a chain of [`IndexMap`]s that
//! translate its own row-major offsets into offsets of the shared store.

use crate::error::{NdError, NdResult};
use std::ops::{Range, RangeFrom, RangeFull, RangeTo};
use std::rc::Rc;

/// Number of elements in `shape`.
pub fn element_count(shape: &[usize]) -> usize {
    shape.iter().product()
}

/// Row-major linear offset of `coord` in `shape`.
pub fn linearize(shape: &[usize], coord: &[usize]) -> NdResult<usize> {
    if coord.len() != shape.len() {
        return Err(NdError::Index(format!(
            "expected {} indices, got {}",
            shape.len(),
            coord.len()
        )));
    }
    let mut offset = 0;
    for (axis, (&i, &dim)) in coord.iter().zip(shape).enumerate() {
        if i >= dim {
            return Err(NdError::Index(format!(
                "index {i} out of range for axis {axis} of size {dim}"
            )));
        }
        offset = offset * dim + i;
    }
    Ok(offset)
}

/// Coordinate of linear `offset` in `shape`.
pub fn delinearize(shape: &[usize], mut offset: usize) -> Vec<usize> {
    let mut coord = vec![0; shape.len()];
    for (slot, &dim) in coord.iter_mut().zip(shape).rev() {
        *slot = offset % dim;
        offset /= dim;
    }
    coord
}

fn linearize_unchecked(shape: &[usize], coord: &[usize]) -> usize {
    coord
        .iter()
        .zip(shape)
        .fold(0, |acc, (&i, &dim)| acc * dim + i)
}

/// One translation step from a view's offsets to its parent's offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexMap {
    /// Offsets are unchanged (reshape).
    Identity,
    /// Axis permutation.
    Permute {
        /// Shape of the permuted view.
        shape: Vec<usize>,
        /// Shape of the parent.
        parent_shape: Vec<usize>,
        /// View axis `i` is parent axis `perm[i]`.
        perm: Vec<usize>,
    },
    /// Circular shift of the flattened array.
    Roll {
        /// Element count.
        total: usize,
        /// Shift, normalized into `[0, total)`.
        shift: usize,
    },
    /// Circular shift along a single axis.
    RollAxis {
        /// Shape shared by view and parent.
        shape: Vec<usize>,
        /// The rolled axis.
        axis: usize,
        /// Shift, normalized into `[0, shape[axis])`.
        shift: usize,
    },
    /// Explicit offset table, one parent offset per view offset.
    Gather(Rc<[usize]>),
}

impl IndexMap {
    /// Maps a view offset to a parent offset.
    pub fn apply(&self, offset: usize) -> usize {
        match self {
            IndexMap::Identity => offset,
            IndexMap::Permute {
                shape,
                parent_shape,
                perm,
            } => {
                let coord = delinearize(shape, offset);
                let mut parent = vec![0; parent_shape.len()];
                for (i, &axis) in perm.iter().enumerate() {
                    parent[axis] = coord[i];
                }
                linearize_unchecked(parent_shape, &parent)
            }
            IndexMap::Roll { total, shift } => (offset + total - shift) % total,
            IndexMap::RollAxis { shape, axis, shift } => {
                let mut coord = delinearize(shape, offset);
                let dim = shape[*axis];
                coord[*axis] = (coord[*axis] + dim - shift) % dim;
                linearize_unchecked(shape, &coord)
            }
            IndexMap::Gather(table) => table[offset],
        }
    }

    /// True for the identity step.
    pub fn is_identity(&self) -> bool {
        matches!(self, IndexMap::Identity)
    }
}

/// Shape and map of `shape` with its axes permuted by `perm`.
pub fn transpose_map(shape: &[usize], perm: &[usize]) -> NdResult<(Vec<usize>, IndexMap)> {
    let rank = shape.len();
    if perm.len() != rank {
        return Err(NdError::Shape(format!(
            "permutation {perm:?} does not match rank {rank}"
        )));
    }
    let mut seen = vec![false; rank];
    for &axis in perm {
        if axis >= rank || std::mem::replace(&mut seen[axis], true) {
            return Err(NdError::Shape(format!(
                "{perm:?} is not a permutation of 0..{rank}"
            )));
        }
    }
    let new_shape: Vec<usize> = perm.iter().map(|&axis| shape[axis]).collect();
    let map = IndexMap::Permute {
        shape: new_shape.clone(),
        parent_shape: shape.to_vec(),
        perm: perm.to_vec(),
    };
    Ok((new_shape, map))
}

/// Reinterprets `old_shape` as `new_shape`; element counts must match.
pub fn reshape_map(old_shape: &[usize], new_shape: &[usize]) -> NdResult<IndexMap> {
    let (old, new) = (element_count(old_shape), element_count(new_shape));
    if new_shape.is_empty() || old != new {
        return Err(NdError::Shape(format!(
            "cannot reshape {old_shape:?} ({old} elements) into {new_shape:?} ({new} elements)"
        )));
    }
    Ok(IndexMap::Identity)
}

fn normalize_shift(amount: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    amount.rem_euclid(len as isize) as usize
}

/// Rolls the flattened array: offset `i` moves to `(i + amount) mod total`.
pub fn roll_map(shape: &[usize], amount: isize) -> IndexMap {
    let total = element_count(shape);
    match normalize_shift(amount, total) {
        0 => IndexMap::Identity,
        shift => IndexMap::Roll { total, shift },
    }
}

/// Rolls along `axis` only.
pub fn roll_axis_map(shape: &[usize], axis: usize, amount: isize) -> NdResult<IndexMap> {
    let Some(&dim) = shape.get(axis) else {
        return Err(NdError::Index(format!(
            "axis {axis} out of range for rank {}",
            shape.len()
        )));
    };
    Ok(match normalize_shift(amount, dim) {
        0 => IndexMap::Identity,
        shift => IndexMap::RollAxis {
            shape: shape.to_vec(),
            axis,
            shift,
        },
    })
}

/// A half-open strided range; missing bounds mean "from the start" and
/// "to the end".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceSpec {
    /// First index, clipped to the axis length.
    pub start: Option<usize>,
    /// One past the last index, clipped to the axis length.
    pub stop: Option<usize>,
    /// Stride; zero is rejected when the selection is resolved.
    pub step: usize,
}

impl SliceSpec {
    /// The whole axis.
    pub fn full() -> Self {
        Self {
            start: None,
            stop: None,
            step: 1,
        }
    }

    /// Indices `start..stop`.
    pub fn range(start: usize, stop: usize) -> Self {
        Self {
            start: Some(start),
            stop: Some(stop),
            step: 1,
        }
    }

    /// The same range with a different stride.
    pub fn step_by(self, step: usize) -> Self {
        Self { step, ..self }
    }

    fn indices(&self, dim: usize) -> NdResult<Vec<usize>> {
        if self.step == 0 {
            return Err(NdError::Index("slice step cannot be zero".to_string()));
        }
        let start = self.start.unwrap_or(0).min(dim);
        let stop = self.stop.unwrap_or(dim).min(dim);
        Ok((start..stop.max(start)).step_by(self.step).collect())
    }
}

/// Selection along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sel {
    /// A single index; the axis is dropped from the result.
    At(usize),
    /// A range of indices; the axis is kept.
    Slice(SliceSpec),
}

impl From<usize> for Sel {
    fn from(i: usize) -> Self {
        Sel::At(i)
    }
}

impl From<SliceSpec> for Sel {
    fn from(range: SliceSpec) -> Self {
        Sel::Slice(range)
    }
}

impl From<Range<usize>> for Sel {
    fn from(r: Range<usize>) -> Self {
        Sel::Slice(SliceSpec::range(r.start, r.end))
    }
}

impl From<RangeFrom<usize>> for Sel {
    fn from(r: RangeFrom<usize>) -> Self {
        Sel::Slice(SliceSpec {
            start: Some(r.start),
            stop: None,
            step: 1,
        })
    }
}

impl From<RangeTo<usize>> for Sel {
    fn from(r: RangeTo<usize>) -> Self {
        Sel::Slice(SliceSpec {
            start: None,
            stop: Some(r.end),
            step: 1,
        })
    }
}

impl From<RangeFull> for Sel {
    fn from(_: RangeFull) -> Self {
        Sel::Slice(SliceSpec::full())
    }
}

/// Builds a selection array: `sel![0, 2..4, ..]`.
#[macro_export]
macro_rules! sel {
    ($($e:expr),* $(,)?) => {
        [$($crate::Sel::from($e)),*]
    };
}

/// Resolves a selection against `shape`.
///
/// Returns the shape of the selected region and its offsets in row-major order
/// of that region. Axes not named by `selection` are taken whole; a selection
/// of only integer indices yields an empty shape and one offset.
pub fn slice_bounds(shape: &[usize], selection: &[Sel]) -> NdResult<(Vec<usize>, Vec<usize>)> {
    if selection.len() > shape.len() {
        return Err(NdError::Index(format!(
            "{} indices given for an array of rank {}",
            selection.len(),
            shape.len()
        )));
    }
    let mut kept = Vec::new();
    let mut per_axis = Vec::with_capacity(shape.len());
    for (axis, &dim) in shape.iter().enumerate() {
        let sel = selection
            .get(axis)
            .copied()
            .unwrap_or(Sel::Slice(SliceSpec::full()));
        match sel {
            Sel::At(i) if i >= dim => {
                return Err(NdError::Index(format!(
                    "index {i} out of range for axis {axis} of size {dim}"
                )))
            }
            Sel::At(i) => per_axis.push(vec![i]),
            Sel::Slice(range) => {
                let indices = range.indices(dim)?;
                kept.push(indices.len());
                per_axis.push(indices);
            }
        }
    }

    let count: usize = per_axis.iter().map(Vec::len).product();
    let mut offsets = Vec::with_capacity(count);
    if count > 0 {
        // Odometer over the per-axis index lists, last axis fastest.
        let mut cursor = vec![0usize; per_axis.len()];
        loop {
            let coord: Vec<usize> = cursor
                .iter()
                .zip(&per_axis)
                .map(|(&c, idx)| idx[c])
                .collect();
            offsets.push(linearize_unchecked(shape, &coord));
            let mut axis = per_axis.len();
            loop {
                if axis == 0 {
                    return Ok((kept, offsets));
                }
                axis -= 1;
                cursor[axis] += 1;
                if cursor[axis] < per_axis[axis].len() {
                    break;
                }
                cursor[axis] = 0;
            }
        }
    }
    Ok((kept, offsets))
}
