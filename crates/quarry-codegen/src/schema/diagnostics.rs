use quote::ToTokens;
use std::fmt::Display;

/// Errors gathered while reading a derive input's attributes. All of them
/// are reported together when the input is finished.
#[derive(Debug, Default)]
pub(crate) struct Diagnostics {
    errors: Option<syn::Error>,
}

impl Diagnostics {
    pub(crate) fn error(&mut self, err: syn::Error) {
        match &mut self.errors {
            Some(errors) => errors.combine(err),
            None => self.errors = Some(err),
        }
    }

    /// Records an error pointing at `tokens`.
    pub(crate) fn spanned(&mut self, tokens: impl ToTokens, message: impl Display) {
        self.error(syn::Error::new_spanned(tokens.into_token_stream(), message));
    }

    /// Unwraps a parse result, recording the error if there is one.
    pub(crate) fn check<T>(&mut self, res: syn::Result<T>) -> Option<T> {
        match res {
            Ok(value) => Some(value),
            Err(err) => {
                self.error(err);
                None
            }
        }
    }

    /// Returns `value` if nothing was recorded.
    pub(crate) fn finish<T>(self, value: T) -> syn::Result<T> {
        match self.errors {
            Some(errors) => Err(errors),
            None => Ok(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote::quote;

    #[test]
    fn reports_every_bad_attribute() {
        let item: syn::ItemStruct = syn::parse_quote! {
            struct Order {
                #[column(1)]
                #[direction(sideways)]
                total: i64,
            }
        };

        let mut diagnostics = Diagnostics::default();
        for attr in &item.fields.iter().next().unwrap().attrs {
            diagnostics.spanned(attr, format!("bad #[{}]", attr.path().get_ident().unwrap()));
        }

        let err = diagnostics.finish(()).unwrap_err();
        let messages: Vec<_> = err.into_iter().map(|err| err.to_string()).collect();
        assert_eq!(messages, ["bad #[column]", "bad #[direction]"]);
    }

    #[test]
    fn check_keeps_successes() {
        let mut diagnostics = Diagnostics::default();

        let ident = diagnostics.check(syn::parse2::<syn::Ident>(quote!(user_id)));
        assert_eq!(ident.unwrap(), "user_id");
        assert!(diagnostics.check(syn::parse2::<syn::Ident>(quote!(1))).is_none());

        assert!(diagnostics.finish(()).is_err());
    }

    #[test]
    fn finish_without_errors() {
        assert_eq!(Diagnostics::default().finish(7).unwrap(), 7);
    }
}
