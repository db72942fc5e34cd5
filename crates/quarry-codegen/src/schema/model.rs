use super::{Diagnostics, Field};

#[derive(Debug)]
pub(crate) struct Model {
    /// Struct identifier
    pub(crate) ident: syn::Ident,

    /// Struct generics
    pub(crate) generics: syn::Generics,

    /// Mapped fields, in declaration order
    pub(crate) fields: Vec<Field>,
}

impl Model {
    pub(crate) fn from_ast(ast: &syn::ItemStruct) -> syn::Result<Self> {
        let syn::Fields::Named(node) = &ast.fields else {
            return Err(syn::Error::new_spanned(
                &ast.fields,
                "#[derive(Mapped)] requires a struct with named fields",
            ));
        };

        let mut diagnostics = Diagnostics::default();
        let fields: Vec<_> = node
            .named
            .iter()
            .filter_map(|field| diagnostics.check(Field::from_ast(field)))
            .collect();

        diagnostics.finish(Model {
            ident: ast.ident.clone(),
            generics: ast.generics.clone(),
            fields,
        })
    }
}
