extern crate proc_macro;

use proc_macro::TokenStream;

/// Implements `Mapped` for a struct with named fields.
///
/// Each field becomes a property named after the UpperCamelCase form of the
/// field. Field attributes:
///
/// - `#[column("name", type = i64, size = 50)]`: column and parameter name,
///   wire type override and declared size. Every part is optional.
/// - `#[direction(output)]`: parameter direction, one of `input`, `output`,
///   `input_output` or `return_value`.
/// - `#[skip]`: leave the field out of parameters and row binding.
#[proc_macro_derive(Mapped, attributes(column, direction, skip))]
pub fn derive_mapped(input: TokenStream) -> TokenStream {
    match quarry_codegen::generate_mapped(input.into()) {
        Ok(output) => output.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

/// Implements `Field` for a field-less enum, stored as its `#[repr]`
/// integer (`i32` by default). Text values are matched against variant
/// names, ignoring case.
#[proc_macro_derive(Field)]
pub fn derive_field(input: TokenStream) -> TokenStream {
    match quarry_codegen::generate_field(input.into()) {
        Ok(output) => output.into(),
        Err(e) => e.to_compile_error().into(),
    }
}
