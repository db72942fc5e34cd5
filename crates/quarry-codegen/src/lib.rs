mod expand;
mod schema;

use proc_macro2::TokenStream;

/// Expands `#[derive(Mapped)]`.
pub fn generate_mapped(input: TokenStream) -> syn::Result<TokenStream> {
    let item: syn::ItemStruct = syn::parse2(input)?;
    let model = schema::Model::from_ast(&item)?;

    Ok(expand::mapped(&model))
}

/// Expands `#[derive(Field)]` on a field-less enum.
pub fn generate_field(input: TokenStream) -> syn::Result<TokenStream> {
    let item: syn::ItemEnum = syn::parse2(input)?;
    let enumeration = schema::Enum::from_ast(&item)?;

    Ok(expand::field(&enumeration))
}
