use quote::quote;

mod kw {
    syn::custom_keyword!(input);
    syn::custom_keyword!(output);
    syn::custom_keyword!(input_output);
    syn::custom_keyword!(return_value);
}

/// Parameter direction from `#[direction(...)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Input,
    Output,
    InputOutput,
    ReturnValue,
}

impl Direction {
    pub(super) fn from_ast(attr: &syn::Attribute) -> syn::Result<Direction> {
        attr.parse_args()
    }
}

impl syn::parse::Parse for Direction {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        let lookahead = input.lookahead1();

        if lookahead.peek(kw::input_output) {
            let _kw: kw::input_output = input.parse()?;
            Ok(Self::InputOutput)
        } else if lookahead.peek(kw::input) {
            let _kw: kw::input = input.parse()?;
            Ok(Self::Input)
        } else if lookahead.peek(kw::output) {
            let _kw: kw::output = input.parse()?;
            Ok(Self::Output)
        } else if lookahead.peek(kw::return_value) {
            let _kw: kw::return_value = input.parse()?;
            Ok(Self::ReturnValue)
        } else {
            Err(lookahead.error())
        }
    }
}

impl quote::ToTokens for Direction {
    fn to_tokens(&self, tokens: &mut proc_macro2::TokenStream) {
        match self {
            Self::Input => quote! { Direction::Input },
            Self::Output => quote! { Direction::Output },
            Self::InputOutput => quote! { Direction::InputOutput },
            Self::ReturnValue => quote! { Direction::ReturnValue },
        }
        .to_tokens(tokens);
    }
}
