//! End-to-end properties of array population, transformation, and lowering.

use bitgrid_common::Interner;
use bitgrid_ir::{BitSource, ModuleBuilder, Value};
use bitgrid_ndarray::{sel, ArrayLike, ArrayState, BitView, Dtype, NdArray, NdError};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn input(ir: &mut ModuleBuilder<'_>, name: &str, width: u32) -> Value {
    let ty = ir.types.bits(width);
    ir.input(name, ty)
}

fn grid_input(ir: &mut ModuleBuilder<'_>, name: &str, width: u32, dims: &[u32]) -> Value {
    let element = ir.types.bits(width);
    let ty = ir.types.array(element, dims);
    ir.input(name, ty)
}

fn lowered_bits(ir: &mut ModuleBuilder<'_>, array: &NdArray) -> Vec<BitSource> {
    let value = array.lower(ir, false).unwrap();
    ir.resolve_bits(value)
}

#[test]
fn full_population_lowers_to_total_width() {
    init_logger();
    let interner = Interner::new();
    let mut ir = ModuleBuilder::new("m", &interner);
    let a = input(&mut ir, "a", 8);
    let mut m = NdArray::new(&[3, 5], Dtype::I8).unwrap();
    for r in 0..3 {
        for c in 0..5 {
            m.set(&[r, c], a).unwrap();
        }
    }
    assert_eq!(m.state(), ArrayState::FullyPopulated);
    let out = m.lower(&mut ir, true).unwrap();
    assert_eq!(out.width, 3 * 5 * 8);
    assert_eq!(m.state(), ArrayState::Lowered);
}

#[test]
fn import_round_trip_is_identical() {
    init_logger();
    let interner = Interner::new();
    let mut ir = ModuleBuilder::new("m", &interner);
    let a = grid_input(&mut ir, "a", 32, &[10, 10]);
    let m = NdArray::from_value(&ir, a).unwrap();
    assert_eq!(m.lower(&mut ir, false).unwrap(), a);

    let flat = input(&mut ir, "flat", 48);
    let m = NdArray::from_value_as(flat, Dtype::I8, Some(&[2, 3])).unwrap();
    assert_eq!(m.lower(&mut ir, false).unwrap(), flat);
}

#[test]
fn transpose_twice_with_inverse_is_identity() {
    init_logger();
    let interner = Interner::new();
    let mut ir = ModuleBuilder::new("m", &interner);
    let a = grid_input(&mut ir, "a", 4, &[2, 3, 4]);
    let m = NdArray::from_value(&ir, a).unwrap();
    let perm = [2, 0, 1];
    let inverse = [1, 2, 0];
    let t = m.transpose(&perm).unwrap();
    assert_eq!(t.shape(), &[4, 2, 3]);
    let back = t.transpose(&inverse).unwrap();
    assert_eq!(back.shape(), m.shape());
    assert_eq!(lowered_bits(&mut ir, &back), ir.resolve_bits(a));
    for r in 0..2 {
        for c in 0..3 {
            for k in 0..4 {
                assert_eq!(back.get(&[r, c, k]).unwrap(), m.get(&[r, c, k]).unwrap());
                assert_eq!(t.get(&[k, r, c]).unwrap(), m.get(&[r, c, k]).unwrap());
            }
        }
    }
}

#[test]
fn reshape_preserves_row_major_order() {
    init_logger();
    let interner = Interner::new();
    let mut ir = ModuleBuilder::new("m", &interner);
    let a = grid_input(&mut ir, "a", 8, &[4, 6]);
    let m = NdArray::from_value(&ir, a).unwrap();
    let r = m.reshape(&[3, 8]).unwrap();
    for off in 0..24 {
        assert_eq!(
            r.get(&[off / 8, off % 8]).unwrap(),
            m.get(&[off / 6, off % 6]).unwrap()
        );
    }
    assert_eq!(lowered_bits(&mut ir, &r), lowered_bits(&mut ir, &m));
}

#[test]
fn roll_is_cyclic() {
    init_logger();
    let interner = Interner::new();
    let mut ir = ModuleBuilder::new("m", &interner);
    let a = grid_input(&mut ir, "a", 8, &[10]);
    let m = NdArray::from_value(&ir, a).unwrap();
    let forward = m.roll(3, None).unwrap();
    assert_eq!(forward.get(&[3]).unwrap(), m.get(&[0]).unwrap());
    assert_eq!(forward.get(&[0]).unwrap(), m.get(&[7]).unwrap());
    let full = m.roll(10, None).unwrap();
    assert_eq!(lowered_bits(&mut ir, &full), ir.resolve_bits(a));
    let undone = forward.roll(-3, None).unwrap();
    assert_eq!(lowered_bits(&mut ir, &undone), ir.resolve_bits(a));
}

#[test]
fn roll_along_an_axis() {
    init_logger();
    let interner = Interner::new();
    let mut ir = ModuleBuilder::new("m", &interner);
    let a = grid_input(&mut ir, "a", 8, &[2, 3]);
    let m = NdArray::from_value(&ir, a).unwrap();
    let rolled = m.roll(1, Some(1)).unwrap();
    assert_eq!(rolled.get(&[0, 0]).unwrap(), m.get(&[0, 2]).unwrap());
    assert_eq!(rolled.get(&[1, 1]).unwrap(), m.get(&[1, 0]).unwrap());
}

#[test]
fn concatenation_is_associative() {
    init_logger();
    let interner = Interner::new();
    let mut ir = ModuleBuilder::new("m", &interner);
    let a = grid_input(&mut ir, "a", 8, &[3]);
    let b = grid_input(&mut ir, "b", 8, &[2]);
    let c = grid_input(&mut ir, "c", 8, &[4]);
    let ma = a.to_ndarray(&ir).unwrap();
    let mb = b.to_ndarray(&ir).unwrap();

    let left = ma.concatenate(&ir, &[&b]).unwrap().concatenate(&ir, &[&c]).unwrap();
    let right_tail = mb.concatenate(&ir, &[&c]).unwrap();
    let right = ma.concatenate(&ir, &[&right_tail]).unwrap();
    let flat = ma.concatenate(&ir, &[&b, &c]).unwrap();
    assert_eq!(left.shape(), &[9]);
    let expected = lowered_bits(&mut ir, &flat);
    assert_eq!(lowered_bits(&mut ir, &left), expected);
    assert_eq!(lowered_bits(&mut ir, &right), expected);
}

#[test]
fn concatenation_copies_element_handles() {
    init_logger();
    let interner = Interner::new();
    let mut ir = ModuleBuilder::new("m", &interner);
    let a = input(&mut ir, "a", 8);
    let b = input(&mut ir, "b", 8);
    let mut m = NdArray::new(&[2], Dtype::I8).unwrap();
    m.set(&[0], a).unwrap();
    m.set(&[1], a).unwrap();
    let cat = m.concatenate(&ir, &[&m]).unwrap();
    m.set(&[0], b).unwrap();
    assert_eq!(cat.get(&[0]).unwrap(), Some(BitView::from(a)));
}

#[test]
fn bit_blasting_fills_rows() {
    init_logger();
    let interner = Interner::new();
    let mut ir = ModuleBuilder::new("m", &interner);
    let word = input(&mut ir, "word", 32);
    let mut m = NdArray::new(&[32, 32], Dtype::I1).unwrap();
    m.set(&[1, 0], word).unwrap();
    for j in 0..32 {
        assert_eq!(m.get(&[1, j]).unwrap(), Some(BitView::from(word).bit(j as u32)));
    }
    assert_eq!(m.state(), ArrayState::PartiallyPopulated);
    assert!(matches!(m.set(&[31, 1], word), Err(NdError::Index(_))));

    let nibble = input(&mut ir, "nibble", 4);
    assert!(matches!(m.assign(&sel![2], nibble), Err(NdError::Width(_))));
}

#[test]
fn fifteen_of_sixteen_set_fails_to_lower() {
    init_logger();
    let interner = Interner::new();
    let mut ir = ModuleBuilder::new("m", &interner);
    let a = input(&mut ir, "a", 8);
    let mut m = NdArray::new(&[4, 4], Dtype::I8).unwrap();
    for off in 0..16 {
        if off != 9 {
            m.set(&[off / 4, off % 4], a).unwrap();
        }
    }
    assert_eq!(m.state(), ArrayState::PartiallyPopulated);
    assert_eq!(m.first_unset(), Some(9));
    let cells_before = ir.cell_count();
    assert_eq!(
        m.lower(&mut ir, true),
        Err(NdError::UnsetElement { offset: 9 })
    );
    assert_eq!(ir.cell_count(), cells_before);
}

#[test]
fn slice_views_write_through() {
    init_logger();
    let interner = Interner::new();
    let mut ir = ModuleBuilder::new("m", &interner);
    let col = input(&mut ir, "col", 32);
    let rest = input(&mut ir, "rest", 8);
    let mut m = NdArray::new(&[4, 4], Dtype::I8).unwrap();
    m.view(&sel![.., 1..2]).unwrap().assign(&sel![], col).unwrap();
    for r in 0..4 {
        assert_eq!(
            m.get(&[r, 1]).unwrap(),
            Some(BitView::from(col).sub(r as u32 * 8, 8))
        );
    }
    m.assign(&sel![.., 0], rest).unwrap();
    m.assign(&sel![.., 2..], rest).unwrap();
    assert_eq!(m.state(), ArrayState::FullyPopulated);
    let out = m.lower(&mut ir, false).unwrap();
    assert_eq!(out.width, 128);
}

#[test]
fn drive_output_lowers_and_connects() {
    init_logger();
    let interner = Interner::new();
    let mut ir = ModuleBuilder::new("m", &interner);
    let a = grid_input(&mut ir, "a", 8, &[2, 4]);
    let out_ty = ir.types.bits(64);
    let out = ir.output("out", out_ty);
    let m = NdArray::from_value(&ir, a).unwrap().transpose(&[1, 0]).unwrap();
    m.drive_output(&mut ir, out).unwrap();
    let module = ir.finish();
    let port = module.port(&interner, "out").unwrap();
    assert!(port.signal.is_some());

    let mut ir = ModuleBuilder::new("m2", &interner);
    let a = grid_input(&mut ir, "a", 8, &[2, 4]);
    let narrow_ty = ir.types.bits(32);
    let narrow = ir.output("narrow", narrow_ty);
    let m = NdArray::from_value(&ir, a).unwrap();
    assert!(matches!(m.drive_output(&mut ir, narrow), Err(NdError::Ir(_))));
}
