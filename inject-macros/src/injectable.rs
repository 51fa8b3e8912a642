//! Implementation of #[derive(Injectable)] proc-macro.

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    parse_macro_input, parse_quote, Data, DeriveInput, Field, Fields, GenericArgument, LitStr,
    PathArguments, Type,
};

pub fn derive_injectable_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;

    // Injectable requires Send + Sync + 'static, so every type parameter does too
    let mut generics = input.generics.clone();
    let params = generics
        .type_params()
        .map(|param| param.ident.clone())
        .collect::<Vec<_>>();
    let where_clause = generics.make_where_clause();
    for param in params {
        where_clause.predicates.push(parse_quote! {
            #param: ::core::marker::Send + ::core::marker::Sync + 'static
        });
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let display_name = parse_display_name(input)?;

    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "Injectable can only be derived for structs",
            ));
        }
    };

    // Fields are built in declaration order, each consuming from the same cursor
    let body = match fields {
        Fields::Named(fields) => {
            let inits = fields
                .named
                .iter()
                .map(|field| -> syn::Result<proc_macro2::TokenStream> {
                    let field_name = &field.ident;
                    let value = field_value(field)?;
                    Ok(quote! { #field_name: #value })
                })
                .collect::<syn::Result<Vec<_>>>()?;
            quote! { Self { #(#inits),* } }
        }
        Fields::Unnamed(fields) => {
            let values = fields
                .unnamed
                .iter()
                .map(field_value)
                .collect::<syn::Result<Vec<_>>>()?;
            quote! { Self(#(#values),*) }
        }
        Fields::Unit => quote! { Self },
    };

    Ok(quote! {
        impl #impl_generics ::inject::Injectable for #name #ty_generics #where_clause {
            const NAME: &'static str = #display_name;

            #[allow(unused_variables)]
            fn construct(
                args: &mut ::inject::Args,
            ) -> ::core::result::Result<Self, ::inject::InjectError> {
                ::core::result::Result::Ok(#body)
            }
        }
    })
}

fn field_value(field: &Field) -> syn::Result<proc_macro2::TokenStream> {
    let ty = &field.ty;

    if is_base(field)? {
        return Ok(quote! { <#ty as ::inject::Injectable>::construct(args)? });
    }

    Ok(if let Some(inner) = wrapped_type(ty, "Arc") {
        quote! { args.take_arc::<#inner>()? }
    } else if let Some(inner) = wrapped_type(ty, "Option") {
        quote! { args.take_optional::<#inner>()? }
    } else {
        quote! { args.take::<#ty>()? }
    })
}

/// Returns `T` when `ty` is `wrapper<T>` (matched on the last path segment).
fn wrapped_type<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    if path.qself.is_some() {
        return None;
    }

    let segment = path.path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }

    let PathArguments::AngleBracketed(arguments) = &segment.arguments else {
        return None;
    };
    match arguments.args.first()? {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}

fn parse_display_name(input: &DeriveInput) -> syn::Result<String> {
    let mut name = input.ident.to_string();

    // Parse #[injectable(name = "Display")]
    for attr in &input.attrs {
        if attr.path().is_ident("injectable") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let value: LitStr = meta.value()?.parse()?;
                    name = value.value();
                    Ok(())
                } else {
                    Err(meta.error("expected `name = \"...\"`"))
                }
            })?;
        }
    }

    Ok(name)
}

fn is_base(field: &Field) -> syn::Result<bool> {
    let mut base = false;

    // Parse #[injectable(base)]
    for attr in &field.attrs {
        if attr.path().is_ident("injectable") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("base") {
                    base = true;
                    Ok(())
                } else {
                    Err(meta.error("expected `base`"))
                }
            })?;
        }
    }

    Ok(base)
}
