//! Projections of functions onto a dual space
use crate::assembly::common::{cell_dofs, check_dofs_assigned};
use crate::traits::{FunctionSpace, Grid, LocalAssembler};
use crate::types::{Error, Result};
use log::debug;

/// Compute the projections of a function onto the basis of `dual_space`
///
/// The local assembler computes one vector per cell, ordered like the cell's local DOFs. These
/// are summed into the global vector in ascending cell order.
pub fn calculate_projections<Space: FunctionSpace>(
    dual_space: &Space,
    local_assembler: &impl LocalAssembler<T = Space::T>,
) -> Result<Vec<Space::T>> {
    check_dofs_assigned(dual_space, "dual space")?;

    let cell_count = dual_space.grid().cell_count();
    let global_dofs = (0..cell_count)
        .map(|cell| cell_dofs(dual_space, cell))
        .collect::<Result<Vec<_>>>()?;

    let cells = (0..cell_count).collect::<Vec<_>>();
    debug!(
        "Calculating projections: {cell_count} cells, {} DOFs",
        dual_space.global_size()
    );
    let local_weak_forms = local_assembler.evaluate_local_weak_forms(&cells)?;
    if local_weak_forms.len() != cell_count {
        return Err(Error::InvalidArgument(format!(
            "Local assembler returned {} local vectors for {cell_count} cells",
            local_weak_forms.len()
        )));
    }

    let mut result = vec![<Space::T as num::Zero>::zero(); dual_space.global_size()];
    for (cell, (dofs, local)) in global_dofs.iter().zip(&local_weak_forms).enumerate() {
        if dofs.len() != local.len() {
            return Err(Error::InvalidArgument(format!(
                "Local vector of cell {cell} has length {} but the cell has {} DOFs",
                local.len(),
                dofs.len()
            )));
        }
        for (dof, value) in dofs.iter().zip(local) {
            result[*dof] += *value;
        }
    }
    Ok(result)
}
