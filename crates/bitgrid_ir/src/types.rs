//! Hardware types and the interning type database.
//!
//! Every signal carries a [`TypeId`] into a [`TypeDb`]. Types are either flat
//! bit vectors or (possibly nested) arrays of them; an array's bit layout is
//! the row-major concatenation of its elements with element 0 least
//! significant.

use crate::ids::TypeId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A hardware type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    /// A bit vector of known width (`i1`, `i32`, ...).
    Bits {
        /// The number of bits.
        width: u32,
    },
    /// A fixed-size array of another type.
    Array {
        /// The element type.
        element: TypeId,
        /// The number of elements.
        size: u32,
    },
}

/// Interned types, deduplicated so type equality is ID equality.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeDb {
    types: Vec<Type>,
    #[serde(skip)]
    lookup: HashMap<Type, TypeId>,
}

impl TypeDb {
    /// Creates a new, empty type database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a type, returning the existing ID for an identical type.
    pub fn intern(&mut self, ty: Type) -> TypeId {
        if let Some(id) = self.lookup.get(&ty) {
            return *id;
        }
        // A deserialized db has an empty lookup table.
        if let Some(pos) = self.types.iter().position(|t| t == &ty) {
            let id = TypeId::from_raw(pos as u32);
            self.lookup.insert(ty, id);
            return id;
        }
        let id = TypeId::from_raw(self.types.len() as u32);
        self.types.push(ty.clone());
        self.lookup.insert(ty, id);
        id
    }

    /// Interns a `width`-bit vector type.
    pub fn bits(&mut self, width: u32) -> TypeId {
        self.intern(Type::Bits { width })
    }

    /// Interns a multidimensional array of `element`.
    ///
    /// `dims` lists the shape outermost-first, so `array(i32, &[4, 8])` is an
    /// array of 4 rows, each an array of 8 `i32`s.
    pub fn array(&mut self, element: TypeId, dims: &[u32]) -> TypeId {
        dims.iter().rev().fold(element, |inner, &size| {
            self.intern(Type::Array {
                element: inner,
                size,
            })
        })
    }

    /// Returns the type with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if the ID was not produced by this database.
    pub fn get(&self, id: TypeId) -> &Type {
        &self.types[id.as_raw() as usize]
    }

    /// Returns the total bit width of a type.
    pub fn bit_width(&self, id: TypeId) -> u32 {
        match self.get(id) {
            Type::Bits { width } => *width,
            Type::Array { element, size } => self.bit_width(*element) * size,
        }
    }

    /// Splits an array type into its shape and innermost non-array element.
    ///
    /// Returns `None` for a plain bit vector.
    pub fn array_shape(&self, id: TypeId) -> Option<(Vec<usize>, TypeId)> {
        let mut dims = Vec::new();
        let mut cur = id;
        while let Type::Array { element, size } = self.get(cur) {
            dims.push(*size as usize);
            cur = *element;
        }
        if dims.is_empty() {
            None
        } else {
            Some((dims, cur))
        }
    }

    /// Renders a type as `i32` or `array<4 x array<8 x i32>>`.
    pub fn display(&self, id: TypeId) -> String {
        match self.get(id) {
            Type::Bits { width } => format!("i{width}"),
            Type::Array { element, size } => {
                format!("array<{size} x {}>", self.display(*element))
            }
        }
    }

    /// Returns the number of interned types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no types have been interned.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
