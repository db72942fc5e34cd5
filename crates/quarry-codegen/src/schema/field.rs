use super::{Column, Diagnostics, Direction, Name};

#[derive(Debug)]
pub(crate) struct Field {
    /// Field attributes
    pub(crate) attrs: FieldAttr,

    /// Field name
    pub(crate) name: Name,

    /// Field type
    pub(crate) ty: syn::Type,
}

#[derive(Debug)]
pub(crate) struct FieldAttr {
    /// Optional column name, wire type and size: `#[column(...)]`
    pub(crate) column: Option<Column>,

    /// Parameter direction: `#[direction(...)]`
    pub(crate) direction: Option<Direction>,

    /// True if the field is annotated with `#[skip]`
    pub(crate) skip: bool,
}

impl Field {
    pub(super) fn from_ast(field: &syn::Field) -> syn::Result<Self> {
        let Some(ident) = &field.ident else {
            return Err(syn::Error::new_spanned(field, "mapped fields must be named"));
        };

        let mut diagnostics = Diagnostics::default();
        let mut attrs = FieldAttr {
            column: None,
            direction: None,
            skip: false,
        };

        for attr in &field.attrs {
            if attr.path().is_ident("column") {
                if attrs.column.is_some() {
                    diagnostics.spanned(attr, "duplicate #[column] attribute");
                } else {
                    attrs.column = diagnostics.check(Column::from_ast(attr));
                }
            } else if attr.path().is_ident("direction") {
                if attrs.direction.is_some() {
                    diagnostics.spanned(attr, "duplicate #[direction] attribute");
                } else {
                    attrs.direction = diagnostics.check(Direction::from_ast(attr));
                }
            } else if attr.path().is_ident("skip") {
                if attrs.skip {
                    diagnostics.spanned(attr, "duplicate #[skip] attribute");
                } else {
                    attrs.skip = diagnostics.check(attr.meta.require_path_only()).is_some();
                }
            }
        }

        if attrs.skip && (attrs.column.is_some() || attrs.direction.is_some()) {
            diagnostics.spanned(
                field,
                "#[skip] cannot be combined with #[column] or #[direction]",
            );
        }

        diagnostics.finish(Field {
            attrs,
            name: Name::from_ident(ident),
            ty: field.ty.clone(),
        })
    }
}
