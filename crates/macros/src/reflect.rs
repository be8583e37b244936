//! Reflect derive macro implementation

use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{parse_quote, DeriveInput};

use crate::parse::{parse_reflect, ReflectArgs, ReflectFieldArgs};

/// Generate the Reflect implementation
pub fn derive_reflect(input: DeriveInput) -> TokenStream {
    match parse_reflect(&input) {
        Ok(args) => generate_impl(args),
        Err(e) => e.write_errors(),
    }
}

fn generate_impl(args: ReflectArgs) -> TokenStream {
    let struct_name = &args.ident;
    let type_name = args
        .name
        .clone()
        .unwrap_or_else(|| struct_name.unraw().to_string());

    let fields = match args.data {
        darling::ast::Data::Struct(fields) => fields.fields,
        _ => {
            return syn::Error::new_spanned(
                &args.ident,
                "Reflect can only be derived for structs with named fields",
            )
            .to_compile_error()
        }
    };

    let mut field_descs = Vec::with_capacity(fields.len());
    for (index, field) in fields.iter().enumerate() {
        match generate_field(index, field) {
            Ok(desc) => field_descs.push(desc),
            Err(e) => return e.to_compile_error(),
        }
    }

    // Every type parameter must itself be describable
    let mut generics = args.generics.clone();
    let type_params: Vec<_> = generics.type_params().map(|p| p.ident.clone()).collect();
    {
        let where_clause = generics.make_where_clause();
        for param in &type_params {
            where_clause
                .predicates
                .push(parse_quote!(#param: ::polycodec_core::reflect::Reflect));
        }
        if !args.no_default {
            let (_, ty_generics, _) = args.generics.split_for_impl();
            where_clause
                .predicates
                .push(parse_quote!(#struct_name #ty_generics: ::core::default::Default));
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let zero = if args.no_default {
        quote! {}
    } else {
        quote! { .with_zero(::polycodec_core::reflect::zero_of::<Self>) }
    };

    let mut hooks = Vec::new();
    if args.marshal {
        hooks.push(quote! { ::polycodec_core::reflect::Method::marshal::<Self>() });
    }
    if args.unmarshal {
        hooks.push(quote! { ::polycodec_core::reflect::Method::unmarshal::<Self>() });
    }
    let methods = if hooks.is_empty() {
        quote! {}
    } else {
        quote! { .with_methods(::std::vec![#(#hooks),*]) }
    };

    quote! {
        impl #impl_generics ::polycodec_core::reflect::Reflect for #struct_name #ty_generics #where_clause {
            fn type_desc() -> ::polycodec_core::reflect::TypeDesc {
                ::polycodec_core::reflect::TypeDesc::sized::<Self>(
                    #type_name,
                    ::polycodec_core::reflect::Kind::Struct(::std::vec![#(#field_descs),*]),
                )
                #zero
                #methods
            }
        }
    }
}

fn generate_field(index: usize, field: &ReflectFieldArgs) -> syn::Result<TokenStream> {
    let ident = field
        .ident
        .as_ref()
        .ok_or_else(|| syn::Error::new_spanned(&field.ty, "expected a named field"))?;
    let name = ident.unraw().to_string();
    let ty = &field.ty;
    let exported = field.is_exported();
    let json = tag_value(&field.json);
    let binary = tag_value(&field.binary);
    let codec = tag_value(&field.codec);

    Ok(quote! {
        ::polycodec_core::reflect::StructField {
            name: #name,
            ty: <#ty as ::polycodec_core::reflect::Reflect>::type_of(),
            index: #index,
            exported: #exported,
            tag: ::polycodec_core::reflect::Tag {
                json: #json,
                binary: #binary,
                codec: #codec,
            },
        }
    })
}

fn tag_value(value: &Option<String>) -> TokenStream {
    match value {
        Some(s) => quote! { ::core::option::Option::Some(#s) },
        None => quote! { ::core::option::Option::None },
    }
}
