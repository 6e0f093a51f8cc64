//! The symbolic N-dimensional array.

use crate::array_like::ArrayLike;
use crate::dtype::Dtype;
use crate::error::{NdError, NdResult};
use crate::index::{
    element_count, linearize, reshape_map, roll_axis_map, roll_map, slice_bounds,
    transpose_map, IndexMap, Sel,
};
use crate::lower::lower_array;
use crate::store::{Coercion, Element, ElementStore};
use crate::view::BitView;
use bitgrid_config::LoweringConfig;
use bitgrid_ir::{ModuleBuilder, PortId, Value};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Population state of an array as seen through one view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayState {
    /// No element is set.
    Unpopulated,
    /// Some, not all, elements are set.
    PartiallyPopulated,
    /// Every element is set.
    FullyPopulated,
    /// Lowered, and the store has not changed since.
    Lowered,
}

/// An N-dimensional array of fixed-width bit-vector elements.
///
/// Elements are deferred views of IR values; no IR is built until the array
/// is lowered. Transformations return new views that share the element store,
/// so writes through any view are seen by all of them.
#[derive(Debug, Clone)]
pub struct NdArray {
    shape: Vec<usize>,
    dtype: Dtype,
    name: Option<String>,
    store: Rc<RefCell<ElementStore>>,
    /// Applied in order to turn a view offset into a store offset.
    maps: Vec<Rc<IndexMap>>,
    lowered_at: Cell<Option<u64>>,
}

fn check_shape(shape: &[usize]) -> NdResult<()> {
    if shape.is_empty() || shape.contains(&0) {
        return Err(NdError::Shape(format!(
            "array shape {shape:?} must have at least one axis and no empty axes"
        )));
    }
    Ok(())
}

impl NdArray {
    /// An array with every element unset.
    pub fn new(shape: &[usize], dtype: Dtype) -> NdResult<Self> {
        check_shape(shape)?;
        let store = ElementStore::new(element_count(shape), dtype);
        Ok(Self::with_store(shape.to_vec(), store))
    }

    fn with_store(shape: Vec<usize>, store: ElementStore) -> Self {
        Self {
            shape,
            dtype: store.dtype(),
            name: None,
            store: Rc::new(RefCell::new(store)),
            maps: Vec::new(),
            lowered_at: Cell::new(None),
        }
    }

    /// Sets the name used for the barrier wire when lowering.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Imports an IR value.
    ///
    /// Array-typed values keep their shape and element type; any other value
    /// becomes a single element.
    pub fn from_value(ir: &ModuleBuilder<'_>, value: Value) -> NdResult<Self> {
        match ir.types.array_shape(value.ty) {
            Some((dims, element)) => {
                let dtype = Dtype::bits(ir.types.bit_width(element))?;
                Self::from_value_as(value, dtype, Some(&dims))
            }
            None => Self::from_value_as(value, Dtype::bits(value.width)?, None),
        }
    }

    /// Imports an IR value as `dtype` elements, flat unless `shape` is given.
    pub fn from_value_as(value: Value, dtype: Dtype, shape: Option<&[usize]>) -> NdResult<Self> {
        let store = ElementStore::imported(value.into(), dtype)?;
        let shape = match shape {
            Some(shape) => {
                check_shape(shape)?;
                if element_count(shape) != store.len() {
                    return Err(NdError::Shape(format!(
                        "a {}-bit value holds {} {dtype} elements, not {shape:?}",
                        value.width,
                        store.len()
                    )));
                }
                shape.to_vec()
            }
            None => vec![store.len()],
        };
        Ok(Self::with_store(shape, store))
    }

    /// The shape of this view.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of axes.
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        element_count(&self.shape)
    }

    /// True for views with no elements (empty slices).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The element type.
    pub fn dtype(&self) -> Dtype {
        self.dtype
    }

    /// The array name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Width of the lowered signal.
    pub fn bit_width(&self) -> u64 {
        self.len() as u64 * u64::from(self.dtype.width())
    }

    fn store_offset(&self, offset: usize) -> usize {
        self.maps.iter().fold(offset, |off, map| map.apply(off))
    }

    fn derive(&self, shape: Vec<usize>, map: IndexMap) -> Self {
        let mut maps = Vec::with_capacity(self.maps.len() + 1);
        if !map.is_identity() {
            maps.push(Rc::new(map));
        }
        maps.extend(self.maps.iter().cloned());
        Self {
            shape,
            dtype: self.dtype,
            name: self.name.clone(),
            store: Rc::clone(&self.store),
            maps,
            lowered_at: Cell::new(None),
        }
    }

    pub(crate) fn element(&self, offset: usize) -> Option<Element> {
        self.store.borrow().element(self.store_offset(offset))
    }

    /// The element at `coord`. Builds no IR.
    pub fn get(&self, coord: &[usize]) -> NdResult<Option<BitView>> {
        let offset = linearize(&self.shape, coord)?;
        Ok(self.element(offset).map(|el| el.view()))
    }

    /// The element at `coord` as an IR value.
    pub fn read(&self, ir: &mut ModuleBuilder<'_>, coord: &[usize]) -> NdResult<Value> {
        let offset = linearize(&self.shape, coord)?;
        match self.element(offset) {
            Some(el) => el.view().materialize(ir),
            None => Err(NdError::UnsetElement { offset }),
        }
    }

    /// A view of the selected region.
    ///
    /// A selection of integer indices only yields a one-element view.
    pub fn view(&self, selection: &[Sel]) -> NdResult<Self> {
        let (mut shape, offsets) = slice_bounds(&self.shape, selection)?;
        if shape.is_empty() {
            shape.push(1);
        }
        Ok(self.derive(shape, IndexMap::Gather(offsets.into())))
    }

    /// Writes one element.
    ///
    /// On a 1-bit array a wider value is split over consecutive elements
    /// starting at `coord`, least significant bit first.
    pub fn set(&mut self, coord: &[usize], value: impl Into<BitView>) -> NdResult<()> {
        let value = value.into();
        let offset = linearize(&self.shape, coord)?;
        match Coercion::classify(value.width, self.dtype) {
            Coercion::ExactWidth => {
                let target = self.store_offset(offset);
                self.store.borrow_mut().set(target, value)
            }
            Coercion::BitBlast => {
                let end = offset + value.width as usize;
                if end > self.len() {
                    return Err(NdError::Index(format!(
                        "bit-blasting {} bits at offset {offset} runs past {} elements",
                        value.width,
                        self.len()
                    )));
                }
                let targets: Vec<usize> = (offset..end).map(|o| self.store_offset(o)).collect();
                self.store.borrow_mut().set_range(&targets, value)
            }
            Coercion::Mismatch => Err(NdError::Width(format!(
                "cannot store a {}-bit value into an {} element",
                value.width, self.dtype
            ))),
        }
    }

    /// Writes a selected region.
    ///
    /// A value as wide as the whole region is split across it in row-major
    /// order, least significant chunk first; a value as wide as one element is
    /// broadcast to every element.
    pub fn assign(&mut self, selection: &[Sel], value: impl Into<BitView>) -> NdResult<()> {
        let value = value.into();
        let (_, offsets) = slice_bounds(&self.shape, selection)?;
        let targets: Vec<usize> = offsets.into_iter().map(|o| self.store_offset(o)).collect();
        let w = self.dtype.width() as usize;
        let mut store = self.store.borrow_mut();
        if value.width as usize == targets.len() * w {
            store.set_range(&targets, value)
        } else if value.width as usize == w {
            for target in targets {
                store.set(target, value)?;
            }
            Ok(())
        } else {
            Err(NdError::Width(format!(
                "cannot assign a {}-bit value to {} {} elements",
                value.width,
                targets.len(),
                self.dtype
            )))
        }
    }

    /// Permutes the axes: axis `i` of the result is axis `perm[i]` of `self`.
    pub fn transpose(&self, perm: &[usize]) -> NdResult<Self> {
        let (shape, map) = transpose_map(&self.shape, perm)?;
        Ok(self.derive(shape, map))
    }

    /// Reinterprets the elements, in row-major order, with a new shape.
    pub fn reshape(&self, shape: &[usize]) -> NdResult<Self> {
        let map = reshape_map(&self.shape, shape)?;
        Ok(self.derive(shape.to_vec(), map))
    }

    /// Shifts elements circularly by `amount`, over the flattened array or
    /// along `axis`.
    pub fn roll(&self, amount: isize, axis: Option<usize>) -> NdResult<Self> {
        let map = match axis {
            None => roll_map(&self.shape, amount),
            Some(axis) => roll_axis_map(&self.shape, axis, amount)?,
        };
        Ok(self.derive(self.shape.clone(), map))
    }

    /// Joins `self` and `others` into a new flat array, `self` first.
    ///
    /// Element handles are copied, so the result does not share storage with
    /// its operands.
    pub fn concatenate(&self, ir: &ModuleBuilder<'_>, others: &[&dyn ArrayLike]) -> NdResult<Self> {
        let mut parts = Vec::with_capacity(others.len() + 1);
        parts.push(self.clone());
        for other in others {
            let part = other.to_ndarray(ir)?;
            if part.dtype != self.dtype {
                return Err(NdError::DtypeMismatch {
                    expected: self.dtype.width(),
                    found: part.dtype.width(),
                });
            }
            parts.push(part);
        }
        let total = parts.iter().map(NdArray::len).sum();
        let mut store = ElementStore::new(total, self.dtype);
        let mut next = 0;
        for part in &parts {
            for offset in 0..part.len() {
                if let Some(el) = part.element(offset) {
                    store.put(next, el);
                }
                next += 1;
            }
        }
        Ok(Self::with_store(vec![total], store))
    }

    /// Row-major offset of the first unset element.
    pub fn first_unset(&self) -> Option<usize> {
        let store = self.store.borrow();
        (0..self.len()).find(|&o| !store.is_set(self.store_offset(o)))
    }

    /// All elements in row-major order.
    pub fn elements(&self) -> NdResult<Vec<BitView>> {
        (0..self.len())
            .map(|offset| {
                self.element(offset)
                    .map(|el| el.view())
                    .ok_or(NdError::UnsetElement { offset })
            })
            .collect()
    }

    /// The import source, when this view reads it unchanged end to end.
    pub(crate) fn pass_through(&self) -> Option<BitView> {
        if !self.maps.is_empty() {
            return None;
        }
        self.store.borrow().pass_through()
    }

    /// Population state through this view.
    pub fn state(&self) -> ArrayState {
        let store = self.store.borrow();
        if self.lowered_at.get() == Some(store.revision()) {
            return ArrayState::Lowered;
        }
        let populated = (0..self.len())
            .filter(|&o| store.is_set(self.store_offset(o)))
            .count();
        match populated {
            0 => ArrayState::Unpopulated,
            n if n == self.len() => ArrayState::FullyPopulated,
            _ => ArrayState::PartiallyPopulated,
        }
    }

    /// Lowers to one flat signal, optionally behind a named barrier wire.
    pub fn lower(&self, ir: &mut ModuleBuilder<'_>, create_wire: bool) -> NdResult<Value> {
        let config = LoweringConfig {
            create_wire,
            ..LoweringConfig::default()
        };
        self.lower_with(ir, &config)
    }

    /// Lowers with explicit settings.
    pub fn lower_with(&self, ir: &mut ModuleBuilder<'_>, config: &LoweringConfig) -> NdResult<Value> {
        let value = lower_array(self, ir, config)?;
        self.lowered_at.set(Some(self.store.borrow().revision()));
        Ok(value)
    }

    /// Lowers with default settings and drives `port` with the result.
    pub fn drive_output(&self, ir: &mut ModuleBuilder<'_>, port: PortId) -> NdResult<()> {
        let value = self.lower(ir, true)?;
        ir.drive_output(port, value)?;
        Ok(())
    }
}
