//! Flat element storage shared by every view of an array.

use crate::dtype::Dtype;
use crate::error::{NdError, NdResult};
use crate::view::BitView;

/// How a value of some width is written into elements of a dtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// The value is exactly one element.
    ExactWidth,
    /// 1-bit elements and a wider value: one bit per consecutive element.
    BitBlast,
    /// No coercion applies.
    Mismatch,
}

impl Coercion {
    /// Picks the coercion for writing a `value_width`-bit value into `dtype`.
    pub fn classify(value_width: u32, dtype: Dtype) -> Self {
        let w = dtype.width();
        if value_width == w {
            Coercion::ExactWidth
        } else if w == 1 && value_width > 1 {
            Coercion::BitBlast
        } else {
            Coercion::Mismatch
        }
    }
}

/// A stored element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    /// Written as a whole element.
    Whole(BitView),
    /// One bit of a wider value that was bit-blasted.
    Bit(BitView),
}

impl Element {
    /// The bits held by this element.
    pub fn view(&self) -> BitView {
        match self {
            Element::Whole(v) | Element::Bit(v) => *v,
        }
    }
}

/// Row-major element slots plus an optional import source.
///
/// An imported store answers reads for slots never written by slicing its
/// source. Every successful write bumps the revision so views can tell whether
/// a lowering is still current.
#[derive(Debug, Clone)]
pub struct ElementStore {
    dtype: Dtype,
    slots: Vec<Option<Element>>,
    import: Option<BitView>,
    revision: u64,
}

impl ElementStore {
    /// An empty store of `len` elements.
    pub fn new(len: usize, dtype: Dtype) -> Self {
        Self {
            dtype,
            slots: vec![None; len],
            import: None,
            revision: 0,
        }
    }

    /// A store whose elements are consecutive `dtype`-wide chunks of `source`,
    /// element 0 in the least significant bits.
    pub fn imported(source: BitView, dtype: Dtype) -> NdResult<Self> {
        let w = dtype.width();
        if source.width % w != 0 {
            return Err(NdError::Width(format!(
                "a {}-bit value does not split into {dtype} elements",
                source.width
            )));
        }
        let mut store = Self::new((source.width / w) as usize, dtype);
        store.import = Some(source);
        Ok(store)
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True if the store holds no elements.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The element type.
    pub fn dtype(&self) -> Dtype {
        self.dtype
    }

    /// Incremented on every write.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The element at `offset`, if any.
    pub fn element(&self, offset: usize) -> Option<Element> {
        match self.slots.get(offset)? {
            Some(el) => Some(*el),
            None => {
                let w = self.dtype.width();
                self.import
                    .map(|src| Element::Whole(src.sub(offset as u32 * w, w)))
            }
        }
    }

    /// The bits at `offset`, if set.
    pub fn get(&self, offset: usize) -> Option<BitView> {
        self.element(offset).map(|el| el.view())
    }

    /// True if `offset` holds a value.
    pub fn is_set(&self, offset: usize) -> bool {
        offset < self.len() && (self.import.is_some() || self.slots[offset].is_some())
    }

    /// Writes `value` at `offset`, bit-blasting across consecutive offsets
    /// when the elements are single bits and the value is wider.
    pub fn set(&mut self, offset: usize, value: BitView) -> NdResult<()> {
        let coercion = Coercion::classify(value.width, self.dtype);
        match coercion {
            Coercion::ExactWidth => {
                self.check_offset(offset)?;
                self.put(offset, Element::Whole(value));
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
                for (j, off) in (offset..end).enumerate() {
                    self.put(off, Element::Bit(value.bit(j as u32)));
                }
            }
            Coercion::Mismatch => return Err(self.mismatch(value.width, 1)),
        }
        self.revision += 1;
        log::trace!(
            "store write at offset {offset}: {} bits ({coercion:?})",
            value.width
        );
        Ok(())
    }

    /// Splits `value` into `offsets.len()` elements; chunk `k` (from the least
    /// significant end) goes to `offsets[k]`.
    pub fn set_range(&mut self, offsets: &[usize], value: BitView) -> NdResult<()> {
        let w = self.dtype.width();
        if value.width as usize != offsets.len() * w as usize {
            return Err(self.mismatch(value.width, offsets.len()));
        }
        for &off in offsets {
            self.check_offset(off)?;
        }
        for (k, &off) in offsets.iter().enumerate() {
            let chunk = value.sub(k as u32 * w, w);
            let element = if w == 1 && value.width > 1 {
                Element::Bit(chunk)
            } else {
                Element::Whole(chunk)
            };
            self.put(off, element);
        }
        self.revision += 1;
        log::trace!("store range write: {} offsets", offsets.len());
        Ok(())
    }

    /// Stores an element unchanged; used when copying between stores.
    pub(crate) fn put(&mut self, offset: usize, element: Element) {
        self.slots[offset] = Some(element);
    }

    /// The first of `offsets` that is unset.
    pub fn first_unset<I>(&self, offsets: I) -> Option<usize>
    where
        I: IntoIterator<Item = usize>,
    {
        offsets.into_iter().find(|&off| !self.is_set(off))
    }

    /// Number of set elements.
    pub fn populated_count(&self) -> usize {
        if self.import.is_some() {
            self.len()
        } else {
            self.slots.iter().filter(|s| s.is_some()).count()
        }
    }

    /// The import source, when no element has been overwritten since.
    pub fn pass_through(&self) -> Option<BitView> {
        self.import
            .filter(|_| self.slots.iter().all(Option::is_none))
    }

    fn check_offset(&self, offset: usize) -> NdResult<()> {
        if offset >= self.len() {
            return Err(NdError::Index(format!(
                "offset {offset} out of range for {} elements",
                self.len()
            )));
        }
        Ok(())
    }

    fn mismatch(&self, width: u32, elements: usize) -> NdError {
        NdError::Width(format!(
            "cannot store a {width}-bit value into {elements} {} element(s)",
            self.dtype
        ))
    }
}
