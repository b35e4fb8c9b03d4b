use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    FnArg, GenericArgument, ImplItem, ImplItemFn, ItemImpl, Pat, PathArguments, ReturnType, Type,
    Visibility, parse_macro_input, spanned::Spanned,
};

/// How a constructor hands back its instance.
enum Output {
    Plain,
    Fallible,
}

struct Constructor<'a> {
    function: &'a ImplItemFn,
    output: Output,
}

pub fn auto_construct_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        return syn::Error::new(
            TokenStream2::from(attr).span(),
            "#[auto_construct] takes no arguments",
        )
        .to_compile_error()
        .into();
    }

    let input = parse_macro_input!(item as ItemImpl);

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

fn expand(input: &ItemImpl) -> syn::Result<TokenStream2> {
    if let Some((_, path, _)) = &input.trait_ {
        return Err(syn::Error::new(
            path.span(),
            "#[auto_construct] must be placed on an inherent impl block",
        ));
    }

    let self_ty = &input.self_ty;
    let (impl_generics, _, where_clause) = input.generics.split_for_impl();

    let descriptors = input
        .items
        .iter()
        .filter_map(|item| match item {
            ImplItem::Fn(function) => constructor(function, self_ty),
            _ => None,
        })
        .map(|ctor| descriptor(&ctor))
        .collect::<syn::Result<Vec<_>>>()?;

    Ok(quote! {
        #input

        impl #impl_generics ::autoconstruct_core::Constructible for #self_ty #where_clause {
            fn constructors() -> ::std::vec::Vec<::autoconstruct_core::ConstructorDescriptor<Self>> {
                ::std::vec![
                    #(#descriptors),*
                ]
            }
        }
    })
}

/// Public associated functions without a receiver that return the self type.
fn constructor<'a>(function: &'a ImplItemFn, self_ty: &Type) -> Option<Constructor<'a>> {
    if !matches!(function.vis, Visibility::Public(_)) {
        return None;
    }

    let sig = &function.sig;
    if sig.receiver().is_some() || sig.asyncness.is_some() || !sig.generics.params.is_empty() {
        return None;
    }

    let ReturnType::Type(_, ty) = &sig.output else {
        return None;
    };

    if is_self(ty, self_ty) {
        return Some(Constructor {
            function,
            output: Output::Plain,
        });
    }

    result_ok_type(ty)
        .filter(|ok| is_self(ok, self_ty))
        .map(|_| Constructor {
            function,
            output: Output::Fallible,
        })
}

fn is_self(ty: &Type, self_ty: &Type) -> bool {
    match ty {
        Type::Path(path) if path.qself.is_none() && path.path.is_ident("Self") => true,
        _ => quote!(#ty).to_string() == quote!(#self_ty).to_string(),
    }
}

/// `T` in `Result<T, E>` or `Result<T>`.
fn result_ok_type(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let last = path.path.segments.last()?;
    if last.ident != "Result" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &last.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(ok) => Some(ok),
        _ => None,
    }
}

fn contains_impl_trait(ty: &Type) -> bool {
    match ty {
        Type::ImplTrait(_) => true,
        Type::Reference(reference) => contains_impl_trait(&reference.elem),
        Type::Ptr(ptr) => contains_impl_trait(&ptr.elem),
        Type::Slice(slice) => contains_impl_trait(&slice.elem),
        Type::Array(array) => contains_impl_trait(&array.elem),
        Type::Paren(paren) => contains_impl_trait(&paren.elem),
        Type::Group(group) => contains_impl_trait(&group.elem),
        Type::Tuple(tuple) => tuple.elems.iter().any(contains_impl_trait),
        Type::Path(path) => path.path.segments.iter().any(|segment| {
            let PathArguments::AngleBracketed(args) = &segment.arguments else {
                return false;
            };
            args.args.iter().any(|arg| match arg {
                GenericArgument::Type(ty) => contains_impl_trait(ty),
                _ => false,
            })
        }),
        _ => false,
    }
}

fn descriptor(ctor: &Constructor<'_>) -> syn::Result<TokenStream2> {
    let sig = &ctor.function.sig;
    let fn_name = &sig.ident;
    let fn_name_str = fn_name.to_string();

    let mut params = Vec::new();
    let mut takes = Vec::new();

    for (position, input) in sig.inputs.iter().enumerate() {
        let FnArg::Typed(arg) = input else {
            return Err(syn::Error::new(input.span(), "unexpected receiver"));
        };
        let ty = &arg.ty;
        if contains_impl_trait(ty) {
            return Err(syn::Error::new(
                ty.span(),
                "#[auto_construct] constructors cannot take `impl Trait` parameters; use a concrete type such as `String` or `Arc<dyn Trait>`",
            ));
        }
        let name = match arg.pat.as_ref() {
            Pat::Ident(ident) => ident.ident.to_string(),
            _ => format!("arg{position}"),
        };

        params.push(quote! { .param::<#ty>(#name) });
        takes.push(quote! { args.take::<#ty>(#position)? });
    }

    let call = quote! { Self::#fn_name(#(#takes),*) };
    let body = match ctor.output {
        Output::Plain => quote! { ::std::result::Result::Ok(#call) },
        Output::Fallible => quote! {
            #call.map_err(|err| ::autoconstruct_core::Error::constructor_failed::<Self>(err))
        },
    };

    let args_binding = if takes.is_empty() {
        quote! { _args }
    } else {
        quote! { mut args }
    };

    Ok(quote! {
        ::autoconstruct_core::ConstructorDescriptor::builder(#fn_name_str)
            #(#params)*
            .build(|#args_binding| #body)
    })
}
