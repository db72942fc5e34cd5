use super::{Parser, RowBinder};
use crate::{cache::Column, err, handle::Handles, select::select_property, Mapped, Property, Result};

use std::any::type_name;
use tracing::trace;

struct Binding<M> {
    index: usize,
    column: String,
    property: Property<M>,
    parser: Parser,
}

/// Binds each column to the property chosen by [`select_property`].
/// Columns without a matching property are ignored.
pub(crate) fn object<M: Mapped>(handles: &Handles, columns: &[Column]) -> Result<RowBinder<M>> {
    let properties = M::properties();
    let mut bindings = Vec::with_capacity(columns.len());

    for (index, column) in columns.iter().enumerate() {
        let Some(property) = select_property(&properties, &column.name) else {
            trace!(ty = type_name::<M>(), column = %column.name, "no property for column");
            continue;
        };

        let handle = handles.lookup(property.type_info())?;

        bindings.push(Binding {
            index,
            column: column.name.clone(),
            property: property.clone(),
            parser: Parser::resolve(&handle, column.ty),
        });
    }

    Ok(RowBinder::new(move |reader| {
        let mut target = M::default();

        for binding in &bindings {
            let value = reader.value(binding.index)?;

            if value.is_null() {
                binding.property.reset(&mut target);
                continue;
            }

            binding
                .parser
                .parse_into(&binding.property, &mut target, value)
                .map_err(|err| {
                    err.context(err!(
                        "column `{}` -> property `{}`",
                        binding.column,
                        binding.property.name()
                    ))
                })?;
        }

        Ok(target)
    }))
}
