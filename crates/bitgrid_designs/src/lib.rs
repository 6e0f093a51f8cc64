//! Reference designs built with bitgrid arrays.
//!
//! Each [`Design`] builds a small module whose outputs are computed with
//! [`NdArray`] operations. The CLI prints them and the integration tests
//! check their outputs bit for bit.

#![warn(missing_docs)]

use bitgrid_common::{Interner, LogicVec};
use bitgrid_config::LoweringConfig;
use bitgrid_ir::{Module, ModuleBuilder, TypeId};
use bitgrid_ndarray::{sel, ArrayValueExt, Dtype, NdArray, NdResult};

type BuildFn = fn(&mut ModuleBuilder<'_>, &LoweringConfig) -> NdResult<()>;

/// A named reference design.
pub struct Design {
    /// Module name, also used on the command line.
    pub name: &'static str,
    /// One-line summary.
    pub description: &'static str,
    build: BuildFn,
}

impl Design {
    /// Builds the design into a finished module.
    pub fn build(&self, interner: &Interner, config: &LoweringConfig) -> NdResult<Module> {
        let mut ir = ModuleBuilder::new(self.name, interner);
        (self.build)(&mut ir, config)?;
        log::debug!("built design '{}' with {} cells", self.name, ir.cell_count());
        Ok(ir.finish())
    }
}

/// All reference designs.
pub const DESIGNS: &[Design] = &[
    Design {
        name: "transpose",
        description: "4x8 i32 input transposed to 8x4",
        build: transpose,
    },
    Design {
        name: "transpose_reshape",
        description: "transpose followed by a reshape to 16x2",
        build: transpose_reshape,
    },
    Design {
        name: "broadcast_reshape",
        description: "32 x i32 array filled by broadcast and a range write, reshaped to 4x8",
        build: broadcast_reshape,
    },
    Design {
        name: "bit_blast",
        description: "32x32 i1 array filled from constants and i32 values, bitcast to 32 x i32",
        build: bit_blast,
    },
    Design {
        name: "from_value",
        description: "10x10 i32 input imported and lowered behind a named wire",
        build: from_value,
    },
    Design {
        name: "from_value_no_wire",
        description: "10 x i32 input imported and lowered without a wire",
        build: from_value_no_wire,
    },
    Design {
        name: "concat_mixed",
        description: "concatenation of an input, an array, and another input",
        build: concat_mixed,
    },
    Design {
        name: "roll",
        description: "10 x i32 input rolled by 3",
        build: roll,
    },
];

/// Looks a design up by name.
pub fn find(name: &str) -> Option<&'static Design> {
    DESIGNS.iter().find(|d| d.name == name)
}

fn dim(ir: &mut ModuleBuilder<'_>, width: u32, dims: &[u32]) -> TypeId {
    let element = ir.types.bits(width);
    ir.types.array(element, dims)
}

fn transpose(ir: &mut ModuleBuilder<'_>, config: &LoweringConfig) -> NdResult<()> {
    let in_ty = dim(ir, 32, &[4, 8]);
    let out_ty = dim(ir, 32, &[8, 4]);
    let in1 = ir.input("in1", in_ty);
    let out = ir.output("out", out_ty);
    let value = in1.transpose(ir, &[1, 0])?.lower_with(ir, config)?;
    ir.drive_output(out, value)?;
    Ok(())
}

fn transpose_reshape(ir: &mut ModuleBuilder<'_>, config: &LoweringConfig) -> NdResult<()> {
    let in_ty = dim(ir, 32, &[4, 8]);
    let out_ty = dim(ir, 32, &[2, 16]);
    let in1 = ir.input("in1", in_ty);
    let out = ir.output("out", out_ty);
    let value = in1
        .transpose(ir, &[1, 0])?
        .reshape(&[16, 2])?
        .lower_with(ir, config)?;
    ir.drive_output(out, value)?;
    Ok(())
}

fn broadcast_reshape(ir: &mut ModuleBuilder<'_>, config: &LoweringConfig) -> NdResult<()> {
    let in0_ty = dim(ir, 32, &[16]);
    let in1_ty = ir.types.bits(32);
    let c_ty = dim(ir, 32, &[8, 4]);
    let in0 = ir.input("in0", in0_ty);
    let in1 = ir.input("in1", in1_ty);
    let c = ir.output("c", c_ty);

    let mut m = NdArray::new(&[32], Dtype::I32)?.named("m2");
    for i in 0..16 {
        m.set(&[i], in1)?;
    }
    m.assign(&sel![16..32], in0)?;
    let value = m.reshape(&[4, 8])?.lower_with(ir, config)?;
    ir.drive_output(c, value)?;
    Ok(())
}

fn bit_blast(ir: &mut ModuleBuilder<'_>, config: &LoweringConfig) -> NdResult<()> {
    let in0_ty = dim(ir, 32, &[16]);
    let in1_ty = ir.types.bits(32);
    let c_ty = dim(ir, 32, &[32]);
    let in0 = ir.input("in0", in0_ty);
    let in1 = ir.input("in1", in1_ty);
    let c = ir.output("c", c_ty);

    let mut m = NdArray::new(&[32, 32], Dtype::I1)?.named("m1");
    let one = ir.constant(LogicVec::from_bool(true))?;
    for i in 0..32 {
        m.set(&[0, i], one)?;
    }
    for i in 1..16usize {
        m.assign(&sel![i], in1)?;
    }
    m.assign(&sel![16..32], in0)?;
    // Element width stays i1; reinterpret the flat result instead.
    let flat = m.lower_with(ir, config)?;
    let value = ir.bitcast(flat, c_ty)?;
    ir.drive_output(c, value)?;
    Ok(())
}

fn from_value(ir: &mut ModuleBuilder<'_>, config: &LoweringConfig) -> NdResult<()> {
    let ty = dim(ir, 32, &[10, 10]);
    let in1 = ir.input("in1", ty);
    let out = ir.output("out", ty);
    let m = NdArray::from_value(ir, in1)?.named("m1");
    let value = m.lower_with(ir, config)?;
    ir.drive_output(out, value)?;
    Ok(())
}

fn from_value_no_wire(ir: &mut ModuleBuilder<'_>, config: &LoweringConfig) -> NdResult<()> {
    let ty = dim(ir, 32, &[10]);
    let in1 = ir.input("in1", ty);
    let out = ir.output("out", ty);
    let m = NdArray::from_value(ir, in1)?.named("m1");
    let config = LoweringConfig {
        create_wire: false,
        ..config.clone()
    };
    let value = m.lower_with(ir, &config)?;
    ir.drive_output(out, value)?;
    Ok(())
}

fn concat_mixed(ir: &mut ModuleBuilder<'_>, config: &LoweringConfig) -> NdResult<()> {
    let ty = dim(ir, 32, &[10]);
    let out_ty = dim(ir, 32, &[30]);
    let in1 = ir.input("in1", ty);
    let in2 = ir.input("in2", ty);
    let in3 = ir.input("in3", ty);
    let out = ir.output("out", out_ty);
    let m = NdArray::from_value(ir, in1)?.named("m1");
    let value = in2.concatenate(ir, &[&m, &in3])?.lower_with(ir, config)?;
    ir.drive_output(out, value)?;
    Ok(())
}

fn roll(ir: &mut ModuleBuilder<'_>, config: &LoweringConfig) -> NdResult<()> {
    let ty = dim(ir, 32, &[10]);
    let in1 = ir.input("in1", ty);
    let out = ir.output("out", ty);
    let value = in1.roll(ir, 3, None)?.lower_with(ir, config)?;
    ir.drive_output(out, value)?;
    Ok(())
}
