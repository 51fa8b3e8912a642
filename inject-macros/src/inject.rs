//! Implementation of #[inject(...)] attribute macro.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse::Parser, parse_macro_input, punctuated::Punctuated, Expr, ExprCall, ItemStruct, Path,
    Token,
};

enum Directive {
    Extends(Path),
    Strict,
    Dependency(TokenStream2),
}

pub fn inject_impl(args: TokenStream, item: TokenStream) -> TokenStream {
    let item = parse_macro_input!(item as ItemStruct);
    let args = match Punctuated::<Expr, Token![,]>::parse_terminated.parse(args) {
        Ok(args) => args,
        Err(err) => return err.to_compile_error().into(),
    };

    expand(&item, args)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(item: &ItemStruct, args: Punctuated<Expr, Token![,]>) -> syn::Result<TokenStream2> {
    let name = &item.ident;
    let (impl_generics, ty_generics, where_clause) = item.generics.split_for_impl();

    let mut parent: Option<Path> = None;
    let mut strict = false;
    let mut steps = Vec::new();

    for arg in args {
        match parse_directive(arg)? {
            Directive::Extends(path) => {
                if parent.is_some() {
                    return Err(syn::Error::new_spanned(path, "duplicate `extends`"));
                }
                parent = Some(path);
            }
            Directive::Strict => strict = true,
            Directive::Dependency(step) => steps.push(step),
        }
    }

    // Parent descriptors go first, so `extends` is applied before the rest
    let extends = parent.map(|path| quote! { .extends(&<#path>::binding()?) });
    let bind = quote! {
        ::inject::Binder::new()
            #extends
            .strict(#strict)
            #(#steps)*
            .bind::<Self>()
    };

    // A static cannot name generic parameters, so only non-generic types cache
    let body = if item.generics.params.is_empty() {
        quote! {
            static BINDING: ::inject::__private::OnceCell<::inject::Binding<#name>> =
                ::inject::__private::OnceCell::new();
            BINDING
                .get_or_try_init(
                    || -> ::core::result::Result<::inject::Binding<#name>, ::inject::InjectError> {
                        #bind
                    },
                )
                .map(::core::clone::Clone::clone)
        }
    } else {
        bind
    };

    Ok(quote! {
        #item

        impl #impl_generics #name #ty_generics #where_clause {
            /// Binds the dependencies declared with `#[inject(...)]`.
            ///
            /// Non-generic types are bound once; later calls share the same
            /// resolved dependencies.
            pub fn binding() -> ::core::result::Result<::inject::Binding<Self>, ::inject::InjectError> {
                #body
            }
        }
    })
}

fn parse_directive(arg: Expr) -> syn::Result<Directive> {
    match &arg {
        Expr::Path(expr) if expr.path.is_ident("strict") => return Ok(Directive::Strict),
        Expr::Assign(assign) if is_ident(&assign.left, "extends") => {
            return match assign.right.as_ref() {
                Expr::Path(expr) => Ok(Directive::Extends(expr.path.clone())),
                other => Err(syn::Error::new_spanned(other, "`extends` expects a type")),
            };
        }
        Expr::Call(call) => {
            if let Some(step) = parse_call(call)? {
                return Ok(Directive::Dependency(step));
            }
        }
        _ => {}
    }

    Ok(Directive::Dependency(
        quote! { .dependency(::inject::Dependency::value(#arg)) },
    ))
}

/// Parses `named(..)`, `factory(..)` and `bound(..)`; other calls are values.
fn parse_call(call: &ExprCall) -> syn::Result<Option<TokenStream2>> {
    let kind = match call.func.as_ref() {
        Expr::Path(expr) => match expr.path.get_ident() {
            Some(ident) => ident.to_string(),
            None => return Ok(None),
        },
        _ => return Ok(None),
    };
    if !matches!(kind.as_str(), "named" | "factory" | "bound") {
        return Ok(None);
    }

    if call.args.len() != 1 {
        return Err(syn::Error::new_spanned(
            call,
            format!("`{}` takes exactly one argument", kind),
        ));
    }
    let arg = &call.args[0];

    if kind == "named" {
        return Ok(Some(quote! { .named(#arg) }));
    }

    let Expr::Path(expr) = arg else {
        return Err(syn::Error::new_spanned(
            arg,
            format!("`{}` expects a type", kind),
        ));
    };
    let path = &expr.path;

    Ok(Some(if kind == "factory" {
        quote! { .factory::<#path>() }
    } else {
        quote! { .bound(&<#path>::binding()?) }
    }))
}

fn is_ident(expr: &Expr, ident: &str) -> bool {
    matches!(expr, Expr::Path(path) if path.path.is_ident(ident))
}
