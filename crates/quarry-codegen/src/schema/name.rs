use heck::ToUpperCamelCase;

#[derive(Debug)]
pub(crate) struct Name {
    /// Property name, the UpperCamelCase form of the field identifier
    pub(crate) property: String,

    /// Field identifier
    pub(crate) ident: syn::Ident,
}

impl Name {
    pub(crate) fn from_ident(ident: &syn::Ident) -> Self {
        let src = ident.to_string();
        let src = src.strip_prefix("r#").unwrap_or(&src);

        Self {
            property: src.to_upper_camel_case(),
            ident: ident.clone(),
        }
    }
}
