use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{parse_macro_input, ItemFn, LitStr, Path};

#[derive(Default)]
struct ComponentArgs {
    name: Option<LitStr>,
    on_create: Option<Path>,
    on_attach: Option<Path>,
    on_attach_async: Option<Path>,
}

/// Attribute macro turning a render function into a component constructor.
///
/// The annotated function keeps its body and becomes the component's render
/// function; its name now refers to a zero-argument constructor returning a
/// `tagtree::render::Component`.
///
/// # Attributes
/// - `name = "..."` - Component name (defaults to the function name)
/// - `on_create = path` - `fn(&Element) -> Result<Option<Element>, RenderError>`
/// - `on_attach = path` - `fn(&mut Document, NodeId)`
/// - `on_attach_async = path` - `fn(&mut Document, NodeId) -> impl Future<Output = ()>`
///
/// # Example
/// ```ignore
/// #[component(on_attach = focus)]
/// pub fn search_box(
///     doc: &mut Document,
///     props: &Props,
///     _children: Vec<Element>,
/// ) -> Result<Element, RenderError> {
///     let input = h!(doc, "input", Some(props.clone()))?;
///     Ok(input.into())
/// }
///
/// let node = create(&mut doc, search_box(), None, vec![])?;
/// ```
#[proc_macro_attribute]
pub fn component(attr: TokenStream, input: TokenStream) -> TokenStream {
    let mut args = ComponentArgs::default();
    let parser = syn::meta::parser(|meta| {
        if meta.path.is_ident("name") {
            args.name = Some(meta.value()?.parse()?);
        } else if meta.path.is_ident("on_create") {
            args.on_create = Some(meta.value()?.parse()?);
        } else if meta.path.is_ident("on_attach") {
            args.on_attach = Some(meta.value()?.parse()?);
        } else if meta.path.is_ident("on_attach_async") {
            args.on_attach_async = Some(meta.value()?.parse()?);
        } else {
            return Err(meta.error("unsupported component attribute"));
        }
        Ok(())
    });
    parse_macro_input!(attr with parser);

    let input = parse_macro_input!(input as ItemFn);
    match expand(args, input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(args: ComponentArgs, input: ItemFn) -> syn::Result<proc_macro2::TokenStream> {
    if !input.sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.sig.generics,
            "components cannot be generic",
        ));
    }
    if input.sig.asyncness.is_some() {
        return Err(syn::Error::new_spanned(
            input.sig.asyncness,
            "component render functions must be synchronous; use on_attach_async",
        ));
    }
    if input.sig.inputs.len() != 3 {
        return Err(syn::Error::new_spanned(
            &input.sig.inputs,
            "expected (doc: &mut Document, props: &Props, children: Vec<Element>)",
        ));
    }
    if args.on_attach.is_some() && args.on_attach_async.is_some() {
        return Err(syn::Error::new_spanned(
            &input.sig.ident,
            "use either on_attach or on_attach_async, not both",
        ));
    }

    let ident = &input.sig.ident;
    let vis = &input.vis;
    let name = args
        .name
        .unwrap_or_else(|| LitStr::new(&ident.to_string(), ident.span()));

    // Doc comments stay on the constructor; everything else on the render fn.
    let (docs, attrs): (Vec<_>, Vec<_>) = input
        .attrs
        .iter()
        .partition(|attr| attr.path().is_ident("doc"));

    let mut render_sig = input.sig.clone();
    render_sig.ident = format_ident!("__{}_render", ident);
    let render_ident = &render_sig.ident;
    let block = &input.block;

    let on_create = args.on_create.map(|path| {
        quote! { let component = component.on_create(#path); }
    });
    let on_attach = args.on_attach.map(|path| {
        quote! { let component = component.on_attach(#path); }
    });
    let on_attach_async = args.on_attach_async.map(|path| {
        quote! { let component = component.on_attach_async(#path); }
    });

    Ok(quote! {
        #(#docs)*
        #vis fn #ident() -> ::tagtree::render::Component {
            #(#attrs)*
            #render_sig #block

            let component = ::tagtree::render::Component::new(#name, #render_ident);
            #on_create
            #on_attach
            #on_attach_async
            component
        }
    })
}
