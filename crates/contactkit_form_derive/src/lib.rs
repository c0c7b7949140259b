use proc_macro::TokenStream;
use proc_macro2::{Ident, Span, TokenStream as TokenStream2};
use proc_macro_crate::{FoundCrate, crate_name};
use quote::quote;
use syn::{Data, DeriveInput, Field, Fields, LitInt, LitStr, parse_macro_input};

/// Derives `contactkit::form::FormModel` for a struct of `String` fields.
///
/// Each named field becomes a declared form field. Validation rules are read from
/// `#[field(...)]`:
///
/// ```ignore
/// #[derive(Clone, FormModel)]
/// struct Signup {
///     #[field(required = "Name is required", min_len = 2, min_len_message = "Too short")]
///     name: String,
/// }
/// ```
#[proc_macro_derive(FormModel, attributes(field))]
pub fn derive_form_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    if !input.generics.params.is_empty() {
        return syn::Error::new_spanned(
            input.ident,
            "FormModel derive currently supports only non-generic structs",
        )
        .to_compile_error()
        .into();
    }

    let model_ident = input.ident;

    let named_fields = match input.data {
        Data::Struct(data) => match data.fields {
            Fields::Named(fields) => fields.named,
            _ => {
                return syn::Error::new_spanned(
                    &model_ident,
                    "FormModel derive requires a struct with named fields",
                )
                .to_compile_error()
                .into();
            }
        },
        _ => {
            return syn::Error::new_spanned(
                &model_ident,
                "FormModel derive is only supported on structs",
            )
            .to_compile_error()
            .into();
        }
    };

    let contactkit = contactkit_path();
    let mut keys = Vec::new();
    let mut rules = Vec::new();
    let mut assignments = Vec::new();

    for field in &named_fields {
        let Some(field_ident) = field.ident.as_ref() else {
            continue;
        };
        let field_name = field_ident.to_string();
        let attrs = match FieldAttrs::parse(field, field_ident) {
            Ok(attrs) => attrs,
            Err(error) => return error.to_compile_error().into(),
        };

        let key = quote!(#contactkit::form::FieldKey::new(#field_name));
        if let Some(rule) = attrs.rule_tokens(&contactkit, &key) {
            rules.push(rule);
        }
        keys.push(key);
        assignments.push(quote! {
            #field_ident: values.get(#field_name).unwrap_or_default().to_owned()
        });
    }

    quote! {
        impl #contactkit::form::FormModel for #model_ident {
            fn field_keys() -> &'static [#contactkit::form::FieldKey] {
                const FIELDS: &[#contactkit::form::FieldKey] = &[#(#keys),*];
                FIELDS
            }

            fn rules() -> #contactkit::form::FormResult<#contactkit::form::RuleSet> {
                let rules = ::std::vec![#(#rules),*];
                #contactkit::form::RuleSet::new(rules)
            }

            fn from_values(values: &#contactkit::form::FormValues) -> Self {
                Self {
                    #(#assignments,)*
                }
            }
        }
    }
    .into()
}

#[derive(Default)]
struct FieldAttrs {
    required: Option<LitStr>,
    min_len: Option<LitInt>,
    min_len_message: Option<LitStr>,
    pattern: Option<LitStr>,
    pattern_message: Option<LitStr>,
}

impl FieldAttrs {
    fn parse(field: &Field, ident: &Ident) -> syn::Result<Self> {
        let mut attrs = Self::default();
        for attr in &field.attrs {
            if !attr.path().is_ident("field") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("required") {
                    attrs.required = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("min_len") {
                    attrs.min_len = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("min_len_message") {
                    attrs.min_len_message = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("pattern") {
                    attrs.pattern = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("pattern_message") {
                    attrs.pattern_message = Some(meta.value()?.parse()?);
                } else {
                    return Err(meta.error("unsupported `field` attribute key"));
                }
                Ok(())
            })?;
        }

        if attrs.min_len.is_some() != attrs.min_len_message.is_some() {
            return Err(syn::Error::new_spanned(
                ident,
                "`min_len` and `min_len_message` must be given together",
            ));
        }
        if attrs.pattern.is_some() != attrs.pattern_message.is_some() {
            return Err(syn::Error::new_spanned(
                ident,
                "`pattern` and `pattern_message` must be given together",
            ));
        }
        Ok(attrs)
    }

    fn rule_tokens(&self, contactkit: &TokenStream2, key: &TokenStream2) -> Option<TokenStream2> {
        if self.required.is_none() && self.min_len.is_none() && self.pattern.is_none() {
            return None;
        }

        let mut rule = quote!(#contactkit::form::FieldRule::new(#key));
        if let Some(message) = &self.required {
            rule = quote!(#rule.required(#message));
        }
        if let (Some(min), Some(message)) = (&self.min_len, &self.min_len_message) {
            rule = quote!(#rule.min_len(#min, #message));
        }
        if let (Some(pattern), Some(message)) = (&self.pattern, &self.pattern_message) {
            rule = quote!(#rule.pattern(#pattern, #message)?);
        }
        Some(rule)
    }
}

fn contactkit_path() -> TokenStream2 {
    match crate_name("contactkit") {
        Ok(FoundCrate::Name(name)) => {
            let ident = Ident::new(&name, Span::call_site());
            quote!(::#ident)
        }
        Ok(FoundCrate::Itself) => quote!(crate),
        Err(_) => quote!(::contactkit),
    }
}
