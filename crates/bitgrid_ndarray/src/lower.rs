//! Lowering a fully populated array into a single flat signal.

use crate::array::NdArray;
use crate::error::{NdError, NdResult};
use crate::view::BitView;
use bitgrid_config::LoweringConfig;
use bitgrid_ir::{ModuleBuilder, Value};

/// Merges runs of views that continue one another in the same signal.
///
/// Input and output are ordered least significant first.
pub fn coalesce(views: &[BitView]) -> Vec<BitView> {
    let mut runs: Vec<BitView> = Vec::with_capacity(views.len());
    for view in views {
        match runs.last_mut() {
            Some(run) if run.is_followed_by(view) => run.extend(view),
            _ => runs.push(*view),
        }
    }
    runs
}

pub(crate) fn lower_array(
    array: &NdArray,
    ir: &mut ModuleBuilder<'_>,
    config: &LoweringConfig,
) -> NdResult<Value> {
    if array.is_empty() {
        return Err(NdError::Shape("cannot lower an empty array".to_string()));
    }
    let parts = match array.pass_through() {
        Some(source) if config.coalesce => vec![source],
        _ => {
            let elements = array.elements()?;
            if config.coalesce {
                coalesce(&elements)
            } else {
                elements
            }
        }
    };

    // Concat operands run from the most significant part down.
    let mut operands = Vec::with_capacity(parts.len());
    for part in parts.iter().rev() {
        operands.push(part.materialize(ir)?);
    }
    let flat = match operands.as_slice() {
        [single] => *single,
        _ => ir.concat(&operands)?,
    };
    log::debug!(
        "lowered {} x {} array into {} part(s), {} bits",
        array.len(),
        array.dtype(),
        parts.len(),
        flat.width
    );

    if !config.create_wire {
        return Ok(flat);
    }
    let name = match array.name() {
        Some(name) => ir.unique_name(name),
        None => ir.interner.fresh(&config.wire_prefix),
    };
    Ok(ir.wire(name, flat))
}
