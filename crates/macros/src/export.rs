use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{FnArg, Ident, ItemFn, LitStr, Pat, Type, parse_macro_input};

pub fn export(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut requires: Option<Ident> = None;
    let mut name: Option<LitStr> = None;
    let attr_parser = syn::meta::parser(|meta| {
        if meta.path.is_ident("requires") {
            requires = Some(meta.value()?.parse()?);
            Ok(())
        } else if meta.path.is_ident("name") {
            name = Some(meta.value()?.parse()?);
            Ok(())
        } else {
            Err(meta.error("unsupported export attribute"))
        }
    });
    parse_macro_input!(attr with attr_parser);

    let item_fn: ItemFn = parse_macro_input!(item);
    let attrs = item_fn.attrs;
    let vis = item_fn.vis;
    let ident = item_fn.sig.ident;
    let unsafety = item_fn.sig.unsafety;
    let body = item_fn.block;
    let inputs = item_fn.sig.inputs;
    let output = item_fn.sig.output;

    let export_name = name.unwrap_or_else(|| LitStr::new(&ident.to_string(), ident.span()));
    let const_ident = Ident::new(&ident.to_string().to_uppercase(), ident.span());
    let arity = inputs.len();
    let args = Ident::new("args", Span::mixed_site());

    let mut slots = Vec::with_capacity(arity);
    let mut input_conversion = Vec::with_capacity(arity);

    for (n, input) in inputs.iter().enumerate() {
        let FnArg::Typed(pat_type) = input else {
            return quote! {
                ::std::compile_error!("receivers are not allowed in exports");
            }
            .into();
        };
        let Pat::Ident(_) = &*pat_type.pat else {
            return quote! {
                ::std::compile_error!("only ident patterns are allowed in exports");
            }
            .into();
        };
        let slot = Ident::new(&format!("a{n}"), Span::mixed_site());
        let ty = &pat_type.ty;
        let decode = match &**ty {
            Type::Reference(r) if r.mutability.is_some() => {
                quote! { crate::FromHostMut::from_host_mut(#slot) }
            }
            _ => quote! { crate::FromHost::from_host(&*#slot) },
        };
        input_conversion.push(quote! {
            let #slot: #ty = #decode.map_err(|expected: crate::Expected| {
                crate::MarshalError::BadArgument {
                    export: #export_name,
                    index: #n,
                    expected: expected.0,
                }
            })?;
        });
        slots.push(slot);
    }

    let requires_value = match &requires {
        Some(feature) => quote! { ::std::option::Option::Some(crate::Feature::#feature) },
        None => quote! { ::std::option::Option::None },
    };
    let requires_check = requires.as_ref().map(|feature| {
        quote! { crate::require(#export_name, crate::Feature::#feature)?; }
    });
    let call = match unsafety {
        Some(_) => quote! { unsafe { __impl(#(#slots,)*) } },
        None => quote! { __impl(#(#slots,)*) },
    };

    quote! {
        #(#attrs)*
        #vis const #const_ident: crate::Export = crate::Export {
            name: #export_name,
            arity: #arity,
            requires: #requires_value,
            call: {
                fn __wrapper(
                    #args: &mut [crate::Value],
                ) -> ::std::result::Result<crate::Value, crate::MarshalError> {
                    #[allow(non_snake_case, clippy::too_many_arguments)]
                    #unsafety fn __impl(#inputs) #output #body
                    #requires_check
                    let got = #args.len();
                    let [#(#slots),*] = #args else {
                        return ::std::result::Result::Err(crate::MarshalError::Arity {
                            export: #export_name,
                            expected: #arity,
                            got,
                        });
                    };
                    #(#input_conversion)*
                    ::std::result::Result::Ok(crate::ToHost::to_host(#call))
                }
                __wrapper
            },
        };
    }
    .into()
}
