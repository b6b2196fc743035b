//! The `#[tether_testhelpers::test]` attribute.

use unsynn::*;

keyword! {
    KFn = "fn";
}

unsynn! {
    struct UntilFn {
        items: Any<Cons<Except<KFn>, TokenTree>>,
    }

    struct UntilBody {
        items: Any<Cons<Except<BraceGroup>, TokenTree>>,
    }

    struct Body {
        items: BraceGroup,
    }

    struct TestFn {
        until_fn: UntilFn, _fn: KFn, name: Ident,
        until_body: UntilBody, body: Body
    }
}

impl quote::ToTokens for UntilFn {
    fn to_tokens(&self, tokens: &mut unsynn::TokenStream) {
        self.items.to_tokens(tokens)
    }
}

impl quote::ToTokens for UntilBody {
    fn to_tokens(&self, tokens: &mut unsynn::TokenStream) {
        self.items.to_tokens(tokens)
    }
}

impl quote::ToTokens for Body {
    fn to_tokens(&self, tokens: &mut unsynn::TokenStream) {
        tokens.extend(self.items.0.stream())
    }
}

/// Marks a test that runs with the shared tracing subscriber installed and
/// inside a `test` span carrying the test's name.
///
/// ```ignore
/// use tether_testhelpers::test;
///
/// #[test]
/// fn renders_greeting() {
///     // events logged here are printed with the test name attached
/// }
/// ```
///
/// Another test attribute can be passed through, e.g.
/// `#[tether_testhelpers::test(some_runtime::test)]`.
#[proc_macro_attribute]
pub fn test(
    attr: proc_macro::TokenStream,
    item: proc_macro::TokenStream,
) -> proc_macro::TokenStream {
    let item = TokenStream::from(item);
    let mut tokens = item.to_token_iter();
    let parsed = match tokens.parse::<TestFn>() {
        Ok(parsed) => parsed,
        Err(_) => {
            return quote::quote! {
                ::core::compile_error!("#[tether_testhelpers::test] expects a function");
            }
            .into();
        }
    };

    let TestFn {
        until_fn,
        _fn,
        name,
        until_body,
        body,
    } = parsed;

    let test_attr = if attr.is_empty() {
        quote::quote! { #[::core::prelude::rust_2024::test] }
    } else {
        let attr = TokenStream::from(attr);
        quote::quote! { #[#attr] }
    };

    let test_name = name.to_string();

    quote::quote! {
        #test_attr
        #until_fn fn #name #until_body {
            ::tether_testhelpers::setup();
            let _test_span =
                ::tether_testhelpers::tracing::info_span!("test", name = #test_name).entered();

            #body
        }
    }
    .into()
}
