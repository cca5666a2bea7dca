use proc_macro2::{Span, TokenStream as TokenStream2};
use syn::{
    parenthesized, parse::Parser, punctuated::Punctuated, spanned::Spanned, token, Attribute,
    Expr, ExprLit, Field, Fields, ItemStruct, Lit, LitStr, Meta, MetaNameValue, Token,
};

#[derive(Default)]
pub struct CompletionSchemaArgs {
    pub name: Option<LitStr>,
    pub description: Option<LitStr>,
}

pub fn parse_completion_schema_args(
    attr: proc_macro::TokenStream,
) -> syn::Result<CompletionSchemaArgs> {
    let mut result = CompletionSchemaArgs::default();
    if attr.is_empty() {
        return Ok(result);
    }

    let parser = Punctuated::<MetaNameValue, Token![,]>::parse_terminated;
    for nested in parser.parse(attr)? {
        let ident = nested
            .path
            .get_ident()
            .ok_or_else(|| syn::Error::new_spanned(&nested.path, "expected identifier"))?;
        let value = string_literal(&nested.value)
            .ok_or_else(|| syn::Error::new_spanned(&nested.value, "expected string literal"))?;

        let slot = match ident.to_string().as_str() {
            "name" => &mut result.name,
            "description" => &mut result.description,
            other => {
                return Err(syn::Error::new(
                    ident.span(),
                    format!("unsupported argument `{other}`"),
                ))
            }
        };

        if slot.is_some() {
            return Err(syn::Error::new(
                ident.span(),
                format!("duplicate `{ident}` argument"),
            ));
        }
        *slot = Some(value);
    }

    Ok(result)
}

pub fn ensure_named_struct(item: &ItemStruct) -> syn::Result<()> {
    match &item.fields {
        Fields::Named(_) => Ok(()),
        _ => Err(syn::Error::new(
            item.struct_token.span(),
            "`#[completion_schema]` only supports structs with named fields",
        )),
    }
}

fn string_literal(expr: &Expr) -> Option<LitStr> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(lit), ..
        }) => Some(lit.clone()),
        _ => None,
    }
}

/// Joins `///` lines; doc attributes arrive as `#[doc = "..."]`.
pub fn collect_doc_comments(attrs: &[Attribute]) -> Option<String> {
    let docs: Vec<String> = attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(nv) => string_literal(&nv.value),
            _ => None,
        })
        .map(|lit| lit.value().trim().to_string())
        .filter(|line| !line.is_empty())
        .collect();

    if docs.is_empty() {
        None
    } else {
        Some(docs.join(" "))
    }
}

/// Reads `key = "value"` (or the `serialize` half of `key(...)`) out of the
/// `#[serde(...)]` attributes. Unrelated serde arguments are skipped whole.
fn serde_string_arg(attrs: &[Attribute], key: &str) -> syn::Result<Option<String>> {
    let mut found = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            let wanted = meta.path.is_ident(key);
            if meta.input.peek(Token![=]) {
                let value: Expr = meta.value()?.parse()?;
                if wanted {
                    let lit = string_literal(&value)
                        .ok_or_else(|| syn::Error::new_spanned(&value, "expected string literal"))?;
                    found = Some(lit.value());
                }
            } else if meta.input.peek(token::Paren) {
                if wanted {
                    meta.parse_nested_meta(|inner| {
                        let value: Expr = inner.value()?.parse()?;
                        if inner.path.is_ident("serialize") {
                            found = string_literal(&value).map(|lit| lit.value());
                        }
                        Ok(())
                    })?;
                } else {
                    let content;
                    parenthesized!(content in meta.input);
                    content.parse::<TokenStream2>()?;
                }
            }
            Ok(())
        })?;
    }
    Ok(found)
}

/// Property names as serde will emit them, paired with their doc comments.
pub fn collect_field_docs(item: &ItemStruct) -> syn::Result<Vec<(String, String)>> {
    let rename_all = serde_string_arg(&item.attrs, "rename_all")?;

    let Fields::Named(fields) = &item.fields else {
        return Ok(Vec::new());
    };

    let mut docs = Vec::new();
    for field in &fields.named {
        let Some(doc) = collect_doc_comments(&field.attrs) else {
            continue;
        };
        if let Some(name) = wire_name(field, rename_all.as_deref())? {
            docs.push((name, doc));
        }
    }
    Ok(docs)
}

fn wire_name(field: &Field, rename_all: Option<&str>) -> syn::Result<Option<String>> {
    if let Some(explicit) = serde_string_arg(&field.attrs, "rename")? {
        return Ok(Some(explicit));
    }

    let Some(ident) = field.ident.as_ref() else {
        return Ok(None);
    };
    let ident = ident.to_string();
    let ident = ident.trim_start_matches("r#");
    Ok(Some(match rename_all {
        Some("camelCase") => camel_case(ident),
        Some("lowercase") => ident.to_lowercase(),
        Some("UPPERCASE") => ident.to_uppercase(),
        Some("kebab-case") => ident.replace('_', "-"),
        _ => ident.to_string(),
    }))
}

fn camel_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper_next = false;
    for ch in snake.chars() {
        if ch == '_' {
            upper_next = !out.is_empty();
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

pub fn infer_schema_name(item: &ItemStruct, explicit: Option<&LitStr>) -> LitStr {
    explicit
        .cloned()
        .unwrap_or_else(|| LitStr::new(&item.ident.to_string(), Span::call_site()))
}

pub fn infer_description(explicit: Option<&LitStr>, doc: Option<String>) -> Option<LitStr> {
    explicit
        .cloned()
        .or_else(|| doc.map(|text| LitStr::new(&text, Span::call_site())))
}
