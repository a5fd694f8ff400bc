mod export;

/// Turns a function into a host-callable export.
///
/// The function is replaced by a constant of type `crate::Export`, named after the function in upper case, whose
/// `call` decodes each argument from a `crate::Value`, runs the original body and encodes the result. Arguments of
/// type `&mut T` are decoded through `crate::FromHostMut` so that the body may update the host value in place;
/// every other argument goes through `crate::FromHost`.
///
/// `#[export(requires = Feature)]` gates the export on an optional capability.
#[proc_macro_attribute]
pub fn export(
    attr: proc_macro::TokenStream,
    item: proc_macro::TokenStream,
) -> proc_macro::TokenStream {
    export::export(attr, item)
}
