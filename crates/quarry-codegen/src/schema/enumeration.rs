use super::Diagnostics;

const INTEGER_REPRS: &[&str] = &[
    "i8", "i16", "i32", "i64", "u8", "u16", "u32", "u64",
];

/// A field-less enum stored as its integer discriminant.
#[derive(Debug)]
pub(crate) struct Enum {
    pub(crate) ident: syn::Ident,

    /// Integer representation from `#[repr(..)]`, `i32` when absent
    pub(crate) repr: syn::Ident,

    pub(crate) variants: Vec<Variant>,
}

#[derive(Debug)]
pub(crate) struct Variant {
    pub(crate) ident: syn::Ident,

    /// Name matched, ignoring case, against text values
    pub(crate) name: String,
}

impl Enum {
    pub(crate) fn from_ast(ast: &syn::ItemEnum) -> syn::Result<Self> {
        let mut diagnostics = Diagnostics::default();
        let mut repr = None;

        if !ast.generics.params.is_empty() {
            diagnostics.spanned(
                &ast.generics,
                "#[derive(Field)] does not support generic enums",
            );
        }

        for attr in &ast.attrs {
            if !attr.path().is_ident("repr") {
                continue;
            }

            let res = attr.parse_nested_meta(|meta| {
                let Some(ident) = meta.path.get_ident() else {
                    return Ok(());
                };

                if INTEGER_REPRS.contains(&ident.to_string().as_str()) {
                    repr = Some(ident.clone());
                    Ok(())
                } else if ident == "C" {
                    Ok(())
                } else {
                    Err(meta.error("#[derive(Field)] requires an 8 to 64 bit integer repr"))
                }
            });

            diagnostics.check(res);
        }

        let mut variants = vec![];

        for variant in &ast.variants {
            if !matches!(variant.fields, syn::Fields::Unit) {
                diagnostics.spanned(
                    variant,
                    "#[derive(Field)] requires variants without fields",
                );
                continue;
            }

            variants.push(Variant {
                ident: variant.ident.clone(),
                name: variant.ident.to_string(),
            });
        }

        if ast.variants.is_empty() {
            diagnostics.spanned(
                &ast.ident,
                "#[derive(Field)] requires at least one variant",
            );
        }

        diagnostics.finish(Enum {
            ident: ast.ident.clone(),
            repr: repr.unwrap_or_else(|| syn::Ident::new("i32", proc_macro2::Span::call_site())),
            variants,
        })
    }
}
