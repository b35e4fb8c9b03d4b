use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{ItemTrait, TraitItem, parse_macro_input, spanned::Spanned};

pub fn mockable_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        return syn::Error::new(
            TokenStream2::from(attr).span(),
            "#[mockable] takes no arguments",
        )
        .to_compile_error()
        .into();
    }

    let input = parse_macro_input!(item as ItemTrait);

    match expand(&input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => {
            let err = err.to_compile_error();
            TokenStream::from(quote! {
                #input
                #err
            })
        }
    }
}

fn expand(input: &ItemTrait) -> syn::Result<TokenStream2> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new(
            input.generics.span(),
            "#[mockable] does not support generic traits",
        ));
    }

    let trait_ident = &input.ident;
    let trait_name = trait_ident.to_string();
    let strict_ident = format_ident!("Strict{}", trait_ident);
    let vis = &input.vis;

    let mut methods = Vec::new();
    for item in &input.items {
        match item {
            TraitItem::Fn(method) => {
                let sig = &method.sig;
                let method_name = sig.ident.to_string();
                methods.push(quote! {
                    #sig {
                        ::std::panic!(
                            "{}::{} is an unconfigured member of a strict substitute",
                            #trait_name,
                            #method_name
                        )
                    }
                });
            }
            TraitItem::Type(ty) => {
                return Err(syn::Error::new(
                    ty.span(),
                    "#[mockable] traits cannot declare associated types",
                ));
            }
            TraitItem::Const(constant) => {
                return Err(syn::Error::new(
                    constant.span(),
                    "#[mockable] traits cannot declare associated constants",
                ));
            }
            _ => {}
        }
    }

    let unsafety = &input.unsafety;
    let doc = format!("Strict substitute for [`{trait_name}`]: every member panics when called.");

    Ok(quote! {
        #input

        #[doc = #doc]
        #[derive(Debug, Default, Clone, Copy)]
        #vis struct #strict_ident;

        #[allow(unused_variables)]
        #unsafety impl #trait_ident for #strict_ident {
            #(#methods)*
        }

        ::autoconstruct_core::register_substitute!(
            ::std::sync::Arc<dyn #trait_ident>,
            || ::std::sync::Arc::new(#strict_ident) as ::std::sync::Arc<dyn #trait_ident>
        );

        ::autoconstruct_core::register_substitute!(
            ::std::sync::Arc<dyn #trait_ident + ::std::marker::Send + ::std::marker::Sync>,
            || ::std::sync::Arc::new(#strict_ident)
                as ::std::sync::Arc<dyn #trait_ident + ::std::marker::Send + ::std::marker::Sync>
        );

        ::autoconstruct_core::register_substitute!(
            ::std::boxed::Box<dyn #trait_ident>,
            || ::std::boxed::Box::new(#strict_ident) as ::std::boxed::Box<dyn #trait_ident>
        );

        ::autoconstruct_core::register_substitute!(
            ::std::boxed::Box<dyn #trait_ident + ::std::marker::Send + ::std::marker::Sync>,
            || ::std::boxed::Box::new(#strict_ident)
                as ::std::boxed::Box<dyn #trait_ident + ::std::marker::Send + ::std::marker::Sync>
        );
    })
}
