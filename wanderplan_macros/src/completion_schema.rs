use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::{parse_macro_input, spanned::Spanned, ItemStruct, LitStr};

use crate::schema_extraction::{
    collect_doc_comments, collect_field_docs, ensure_named_struct, infer_description,
    infer_schema_name, parse_completion_schema_args,
};

pub fn completion_schema(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = match parse_completion_schema_args(attr) {
        Ok(args) => args,
        Err(err) => return err.to_compile_error().into(),
    };
    let item_struct = parse_macro_input!(item as ItemStruct);

    match expand(&item_struct, args) {
        Ok(impl_tokens) => quote! {
            #item_struct
            #impl_tokens
        }
        .into(),
        Err(err) => {
            let compile_error = err.to_compile_error();
            quote! {
                #item_struct
                #compile_error
            }
            .into()
        }
    }
}

fn expand(
    item_struct: &ItemStruct,
    args: crate::schema_extraction::CompletionSchemaArgs,
) -> syn::Result<TokenStream2> {
    ensure_named_struct(item_struct)?;
    if !item_struct.generics.params.is_empty() {
        return Err(syn::Error::new(
            item_struct.generics.span(),
            "`#[completion_schema]` does not support generic structs",
        ));
    }

    let schema_name = infer_schema_name(item_struct, args.name.as_ref());
    let description = match infer_description(
        args.description.as_ref(),
        collect_doc_comments(&item_struct.attrs),
    ) {
        Some(lit) => quote! { Some(#lit) },
        None => quote! { None },
    };

    let field_docs = collect_field_docs(item_struct)?.into_iter().map(|(field, doc)| {
        let field = LitStr::new(&field, Span::call_site());
        let doc = LitStr::new(&doc, Span::call_site());
        quote! { (#field, #doc) }
    });

    let ident = &item_struct.ident;
    let type_name = LitStr::new(&ident.to_string(), Span::call_site());

    Ok(quote! {
        impl wanderplan::schema::CompletionSchema for #ident {
            fn schema() -> &'static wanderplan::schema::SchemaHandle {
                static HANDLE: std::sync::OnceLock<wanderplan::schema::SchemaHandle> =
                    std::sync::OnceLock::new();
                HANDLE.get_or_init(|| {
                    let mut root = schemars::schema_for!(Self);
                    wanderplan::schema::apply_doc_comments(
                        &mut root,
                        #schema_name,
                        #description,
                        &[#(#field_docs),*],
                    );
                    wanderplan::schema::SchemaHandle::new::<Self>(
                        #schema_name,
                        #type_name,
                        root,
                    )
                })
            }
        }
    })
}
