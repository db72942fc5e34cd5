mod field;
mod mapped;

use crate::schema::{Enum, Model};

use proc_macro2::TokenStream;
use quote::quote;

pub(super) fn mapped(model: &Model) -> TokenStream {
    let quarry = quote!(_quarry::codegen_support);
    wrap_in_const(mapped::expand(model, &quarry))
}

pub(super) fn field(enumeration: &Enum) -> TokenStream {
    let quarry = quote!(_quarry::codegen_support);
    wrap_in_const(field::expand(enumeration, &quarry))
}

fn wrap_in_const(code: TokenStream) -> TokenStream {
    quote! {
        const _: () = {
            use quarry as _quarry;
            #code
        };
    }
}
