//! Implicit conversion of IR values into arrays.

use crate::array::NdArray;
use crate::error::NdResult;
use bitgrid_ir::{ModuleBuilder, Value};

/// Anything that can stand in for an array operand.
pub trait ArrayLike {
    /// Returns the operand as an array, importing it if necessary.
    fn to_ndarray(&self, ir: &ModuleBuilder<'_>) -> NdResult<NdArray>;
}

impl ArrayLike for NdArray {
    fn to_ndarray(&self, _ir: &ModuleBuilder<'_>) -> NdResult<NdArray> {
        Ok(self.clone())
    }
}

impl ArrayLike for Value {
    fn to_ndarray(&self, ir: &ModuleBuilder<'_>) -> NdResult<NdArray> {
        NdArray::from_value(ir, *self)
    }
}

/// Array transformations applied directly to IR values.
///
/// Each method imports the value with [`NdArray::from_value`] first.
pub trait ArrayValueExt {
    /// See [`NdArray::transpose`].
    fn transpose(&self, ir: &ModuleBuilder<'_>, perm: &[usize]) -> NdResult<NdArray>;
    /// See [`NdArray::reshape`].
    fn reshape(&self, ir: &ModuleBuilder<'_>, shape: &[usize]) -> NdResult<NdArray>;
    /// See [`NdArray::roll`].
    fn roll(&self, ir: &ModuleBuilder<'_>, amount: isize, axis: Option<usize>) -> NdResult<NdArray>;
    /// See [`NdArray::concatenate`].
    fn concatenate(&self, ir: &ModuleBuilder<'_>, others: &[&dyn ArrayLike]) -> NdResult<NdArray>;
}

impl ArrayValueExt for Value {
    fn transpose(&self, ir: &ModuleBuilder<'_>, perm: &[usize]) -> NdResult<NdArray> {
        self.to_ndarray(ir)?.transpose(perm)
    }

    fn reshape(&self, ir: &ModuleBuilder<'_>, shape: &[usize]) -> NdResult<NdArray> {
        self.to_ndarray(ir)?.reshape(shape)
    }

    fn roll(&self, ir: &ModuleBuilder<'_>, amount: isize, axis: Option<usize>) -> NdResult<NdArray> {
        self.to_ndarray(ir)?.roll(amount, axis)
    }

    fn concatenate(&self, ir: &ModuleBuilder<'_>, others: &[&dyn ArrayLike]) -> NdResult<NdArray> {
        self.to_ndarray(ir)?.concatenate(ir, others)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtype::Dtype;
    use crate::error::NdError;
    use bitgrid_common::Interner;

    #[test]
    fn values_convert_through_from_value() {
        let interner = Interner::new();
        let mut ir = ModuleBuilder::new("m", &interner);
        let i8_ty = ir.types.bits(8);
        let arr_ty = ir.types.array(i8_ty, &[3]);
        let a = ir.input("a", arr_ty);
        let m = a.to_ndarray(&ir).unwrap();
        assert_eq!(m.shape(), &[3]);
        assert_eq!(m.dtype(), Dtype::I8);
    }

    #[test]
    fn extension_methods_import_first() {
        let interner = Interner::new();
        let mut ir = ModuleBuilder::new("m", &interner);
        let i8_ty = ir.types.bits(8);
        let grid_ty = ir.types.array(i8_ty, &[2, 3]);
        let a = ir.input("a", grid_ty);
        assert_eq!(a.transpose(&ir, &[1, 0]).unwrap().shape(), &[3, 2]);
        assert_eq!(a.reshape(&ir, &[6]).unwrap().shape(), &[6]);
        assert_eq!(a.roll(&ir, 1, Some(1)).unwrap().shape(), &[2, 3]);

        let flat_ty = ir.types.array(i8_ty, &[4]);
        let b = ir.input("b", flat_ty);
        let cat = a.concatenate(&ir, &[&b]).unwrap();
        assert_eq!(cat.shape(), &[10]);

        let i16_ty = ir.types.bits(16);
        let c = ir.input("c", i16_ty);
        assert!(matches!(
            a.concatenate(&ir, &[&c]),
            Err(NdError::DtypeMismatch { expected: 8, found: 16 })
        ));
    }
}
