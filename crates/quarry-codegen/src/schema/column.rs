use quote::quote;

#[derive(Debug)]
pub(crate) struct Column {
    pub(crate) name: Option<syn::LitStr>,
    pub(crate) ty: Option<ColumnType>,
    pub(crate) size: Option<syn::LitInt>,
}

impl Column {
    pub(super) fn from_ast(attr: &syn::Attribute) -> syn::Result<Column> {
        attr.parse_args()
    }
}

mod kw {
    syn::custom_keyword!(size);
}

impl syn::parse::Parse for Column {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        let mut result = Self {
            name: None,
            ty: None,
            size: None,
        };

        // Allowed syntax, in any order:
        //
        // #[column("name")]
        // #[column(type = i64)]
        // #[column(size = 50)]
        // #[column("name", type = string, size = 50)]
        loop {
            let lookahead = input.lookahead1();

            if lookahead.peek(syn::LitStr) {
                if result.name.is_some() {
                    return Err(syn::Error::new(input.span(), "duplicate column name"));
                }
                result.name = Some(input.parse()?);
            } else if lookahead.peek(syn::Token![type]) {
                if result.ty.is_some() {
                    return Err(syn::Error::new(input.span(), "duplicate column type"));
                }
                let _type_token: syn::Token![type] = input.parse()?;
                let _eq_token: syn::Token![=] = input.parse()?;
                result.ty = Some(input.parse()?);
            } else if lookahead.peek(kw::size) {
                if result.size.is_some() {
                    return Err(syn::Error::new(input.span(), "duplicate column size"));
                }
                let _size_token: kw::size = input.parse()?;
                let _eq_token: syn::Token![=] = input.parse()?;
                let lit: syn::LitInt = input.parse()?;
                lit.base10_parse::<usize>()?;
                result.size = Some(lit);
            } else {
                return Err(lookahead.error());
            }

            if input.is_empty() {
                break;
            }
            let _comma_token: syn::Token![,] = input.parse()?;
        }

        Ok(result)
    }
}

/// Wire type override, spelled after the Rust type it mirrors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColumnType {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    String,
    Bytes,
    Uuid,
    Date,
    Timestamp,
}

impl ColumnType {
    fn from_ident(ident: &syn::Ident) -> Option<ColumnType> {
        Some(match ident.to_string().as_str() {
            "bool" => Self::Bool,
            "i8" => Self::I8,
            "i16" => Self::I16,
            "i32" => Self::I32,
            "i64" => Self::I64,
            "u8" => Self::U8,
            "u16" => Self::U16,
            "u32" => Self::U32,
            "u64" => Self::U64,
            "f32" => Self::F32,
            "f64" => Self::F64,
            "string" => Self::String,
            "bytes" => Self::Bytes,
            "uuid" => Self::Uuid,
            "date" => Self::Date,
            "timestamp" => Self::Timestamp,
            _ => return None,
        })
    }
}

impl syn::parse::Parse for ColumnType {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        let ident: syn::Ident = input.parse()?;

        ColumnType::from_ident(&ident).ok_or_else(|| {
            syn::Error::new_spanned(
                &ident,
                "unknown column type; expected one of bool, i8, i16, i32, i64, u8, u16, \
                 u32, u64, f32, f64, string, bytes, uuid, date, timestamp",
            )
        })
    }
}

impl quote::ToTokens for ColumnType {
    fn to_tokens(&self, tokens: &mut proc_macro2::TokenStream) {
        match self {
            Self::Bool => quote! { WireType::Bool },
            Self::I8 => quote! { WireType::I8 },
            Self::I16 => quote! { WireType::I16 },
            Self::I32 => quote! { WireType::I32 },
            Self::I64 => quote! { WireType::I64 },
            Self::U8 => quote! { WireType::U8 },
            Self::U16 => quote! { WireType::U16 },
            Self::U32 => quote! { WireType::U32 },
            Self::U64 => quote! { WireType::U64 },
            Self::F32 => quote! { WireType::F32 },
            Self::F64 => quote! { WireType::F64 },
            Self::String => quote! { WireType::String },
            Self::Bytes => quote! { WireType::Bytes },
            Self::Uuid => quote! { WireType::Uuid },
            Self::Date => quote! { WireType::Date },
            Self::Timestamp => quote! { WireType::Timestamp },
        }
        .to_tokens(tokens);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(attr: syn::Attribute) -> syn::Result<Column> {
        Column::from_ast(&attr)
    }

    #[test]
    fn name_type_and_size() {
        let column = parse(syn::parse_quote!(#[column("email", type = string, size = 50)])).unwrap();

        assert_eq!(column.name.unwrap().value(), "email");
        assert_eq!(column.ty, Some(ColumnType::String));
        assert_eq!(column.size.unwrap().base10_parse::<usize>().unwrap(), 50);
    }

    #[test]
    fn any_order() {
        let column = parse(syn::parse_quote!(#[column(type = i64, "id")])).unwrap();

        assert_eq!(column.name.unwrap().value(), "id");
        assert_eq!(column.ty, Some(ColumnType::I64));
        assert!(column.size.is_none());
    }

    #[test]
    fn rejects_duplicates_and_unknown_types() {
        assert!(parse(syn::parse_quote!(#[column("a", "b")])).is_err());
        assert!(parse(syn::parse_quote!(#[column(type = varchar)])).is_err());
        assert!(parse(syn::parse_quote!(#[column(size = big)])).is_err());
    }
}
