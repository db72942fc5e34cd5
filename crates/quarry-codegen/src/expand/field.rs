use crate::schema::Enum;

use proc_macro2::TokenStream;
use quote::quote;

pub(super) fn expand(enumeration: &Enum, quarry: &TokenStream) -> TokenStream {
    let ident = &enumeration.ident;
    let repr = &enumeration.repr;
    let variants: Vec<_> = enumeration.variants.iter().map(|v| &v.ident).collect();
    let names = enumeration.variants.iter().map(|v| &v.name);

    quote! {
        impl #quarry::Field for #ident {
            fn type_info() -> #quarry::TypeInfo {
                #quarry::TypeInfo::enumeration::<Self>(<#repr as #quarry::Field>::type_info)
            }

            fn to_value(&self) -> #quarry::Result<#quarry::Value> {
                let discriminant: #repr = match self {
                    #( Self::#variants => Self::#variants as #repr, )*
                };
                #quarry::Field::to_value(&discriminant)
            }

            fn from_value(value: #quarry::Value) -> #quarry::Result<Self> {
                if let #quarry::Option::Some(name) = value.as_str() {
                    #(
                        if name.eq_ignore_ascii_case(#names) {
                            return #quarry::Result::Ok(Self::#variants);
                        }
                    )*
                }

                let discriminant = <#repr as #quarry::Field>::from_value(value.clone())?;
                #(
                    if discriminant == Self::#variants as #repr {
                        return #quarry::Result::Ok(Self::#variants);
                    }
                )*

                #quarry::Result::Err(#quarry::Error::unsupported_conversion(
                    &value,
                    #quarry::type_name::<Self>(),
                ))
            }
        }
    }
}
