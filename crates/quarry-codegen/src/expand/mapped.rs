use crate::schema::{Field, Model};

use proc_macro2::TokenStream;
use quote::quote;

pub(super) fn expand(model: &Model, quarry: &TokenStream) -> TokenStream {
    let ident = &model.ident;
    let (impl_generics, ty_generics, where_clause) = model.generics.split_for_impl();
    let properties = model.fields.iter().map(|field| expand_property(field, quarry));

    quote! {
        impl #impl_generics #quarry::Mapped for #ident #ty_generics #where_clause {
            fn properties() -> #quarry::Vec<#quarry::Property<Self>> {
                vec![ #( #properties ),* ]
            }
        }
    }
}

fn expand_property(field: &Field, quarry: &TokenStream) -> TokenStream {
    let field_ident = &field.name.ident;
    let name = &field.name.property;
    let ty = &field.ty;

    let mut modifiers = vec![];

    if let Some(column) = &field.attrs.column {
        if let Some(column_name) = &column.name {
            modifiers.push(quote!(.column(#column_name)));
        }

        if let Some(column_ty) = &column.ty {
            modifiers.push(quote!(.wire_type(#quarry::#column_ty)));
        }

        if let Some(size) = &column.size {
            modifiers.push(quote!(.size(#size)));
        }
    }

    if let Some(direction) = &field.attrs.direction {
        modifiers.push(quote!(.direction(#quarry::#direction)));
    }

    if field.attrs.skip {
        modifiers.push(quote!(.skip()));
    }

    quote! {
        #quarry::Property::new::<#ty>(
            #name,
            |target: &Self| &target.#field_ident,
            |target: &mut Self, value: #ty| target.#field_ident = value,
        )
        #( #modifiers )*
    }
}
