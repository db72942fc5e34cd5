use super::{Parser, RowBinder};
use crate::{bail, cache::Column, handle::Handles, Result};

use quarry_core::Field;

use std::any::type_name;

/// Binds the first column of each row to `F`. Null becomes `F::default()`.
pub(crate) fn scalar<F: Field>(handles: &Handles, columns: &[Column]) -> Result<RowBinder<F>> {
    let Some(column) = columns.first() else {
        bail!("cannot bind `{}`: result has no columns", type_name::<F>());
    };

    let handle = handles.lookup(F::type_info())?;
    let parser = Parser::resolve(&handle, column.ty);

    Ok(RowBinder::new(move |reader| {
        let value = reader.value(0)?;

        if value.is_null() {
            return Ok(F::default());
        }

        parser.parse(value)
    }))
}
