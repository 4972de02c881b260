// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

extern crate proc_macro;

use std::collections::HashSet;

use proc_macro::TokenStream;
use quote::quote;
use syn::meta::ParseNestedMeta;
use syn::{
    parse_macro_input, parse_quote, Data, DeriveInput, Fields, GenericArgument, Generics, LitBool,
    LitStr, PathArguments, Type,
};

/// Value types the mapper reads through `ColumnValue::from`.
const SUPPORTED_TYPES: &[&str] = &["bool", "i64", "f64", "i32", "String", "SystemTime"];

/// Accepted `time_unit` spellings and the `TimeUnit` variant they select.
const TIME_UNITS: &[(&str, &str)] = &[
    ("nanoseconds", "Nanoseconds"),
    ("microseconds", "Microseconds"),
    ("milliseconds", "Milliseconds"),
    ("seconds", "Seconds"),
    ("minutes", "Minutes"),
    ("hours", "Hours"),
];

/// How a column value is read from its struct field
enum ValueKind {
    /// One of `SUPPORTED_TYPES`
    Supported,
    /// Any other `Display` type, carried as text (usable as a tag only)
    Other(String),
}

/// `#[measurement(...)]` contents
struct MeasurementAttr {
    name: LitStr,
    database: Option<LitStr>,
    retention_policy: Option<LitStr>,
    time_unit: syn::Ident,
}

/// One field carrying `#[column(...)]`
struct ColumnInfo {
    field: syn::Ident,
    wire_name: String,
    tag: bool,
    nullable: bool,
    optional: bool,
    value_type: Type,
    kind: ValueKind,
}

/// `#[derive(Measurement)]` macro: generates the `influx_mapper::Measurement` impl
///
/// Struct attribute (omit it and every mapper operation rejects the type):
/// - `name = "..."` (required)
/// - `database = "..."`, `retention_policy = "..."`
/// - `time_unit = "nanoseconds" | "microseconds" | "milliseconds" | "seconds" | "minutes" | "hours"`
///
/// Field attribute, on each mapped field:
/// - `name = "..."` wire name (defaults to the field name)
/// - `tag` / `tag = bool`, `nullable` / `nullable = bool`
///
/// Field types: bool, i64, f64, i32, String, SystemTime, `Option` of those.
/// Any other `Display` type is accepted and can only be written as a tag.
///
/// Example:
/// ```ignore
/// use influx_mapper::Measurement;
///
/// #[derive(Measurement)]
/// #[measurement(name = "cpu", database = "metrics", time_unit = "seconds")]
/// struct Cpu {
///     #[column(name = "time")]
///     time: Option<SystemTime>,
///     #[column(name = "host", tag)]
///     host: String,
///     #[column(name = "idle", nullable)]
///     idle: Option<f64>,
/// }
/// ```
#[proc_macro_derive(Measurement, attributes(measurement, column))]
pub fn derive_measurement(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(f) => &f.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Only named fields are supported",
                ))
            }
        },
        _ => return Err(syn::Error::new_spanned(input, "Only structs are supported")),
    };

    let measurement = parse_measurement_attr(input)?;

    let mut columns = Vec::new();
    let mut wire_names = HashSet::new();
    for field in fields {
        let Some(column) = parse_column(field)? else {
            continue;
        };
        if !wire_names.insert(column.wire_name.clone()) {
            return Err(syn::Error::new_spanned(
                field,
                format!("Duplicate column name: {}", column.wire_name),
            ));
        }
        columns.push(column);
    }

    let generics = bounded_generics(&input.generics, &columns);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let descriptor_body = match &measurement {
        Some(attr) => {
            let measurement_name = &attr.name;
            let database = option_tokens(attr.database.as_ref());
            let retention_policy = option_tokens(attr.retention_policy.as_ref());
            let time_unit = &attr.time_unit;
            quote! {
                static DESCRIPTOR: ::influx_mapper::MeasurementDescriptor =
                    ::influx_mapper::MeasurementDescriptor {
                        name: #measurement_name,
                        database: #database,
                        retention_policy: #retention_policy,
                        time_unit: ::influx_mapper::TimeUnit::#time_unit,
                    };
                ::std::option::Option::Some(&DESCRIPTOR)
            }
        }
        None => quote! { ::std::option::Option::None },
    };

    let column_count = columns.len();
    let column_descriptors: Vec<_> = columns
        .iter()
        .map(|c| {
            let wire_name = &c.wire_name;
            let field_name = c.field.to_string();
            let tag = c.tag;
            let nullable = c.nullable;
            quote! {
                ::influx_mapper::ColumnDescriptor {
                    name: #wire_name,
                    field: #field_name,
                    tag: #tag,
                    nullable: #nullable,
                }
            }
        })
        .collect();

    let read_arms: Vec<_> = columns
        .iter()
        .map(|c| {
            let field_name = c.field.to_string();
            let read = read_expr(c);
            quote! { #field_name => ::std::result::Result::Ok(#read), }
        })
        .collect();

    Ok(quote! {
        impl #impl_generics ::influx_mapper::Measurement for #name #ty_generics #where_clause {
            fn descriptor() -> ::std::option::Option<&'static ::influx_mapper::MeasurementDescriptor> {
                #descriptor_body
            }

            fn columns() -> &'static [::influx_mapper::ColumnDescriptor] {
                static COLUMNS: [::influx_mapper::ColumnDescriptor; #column_count] = [
                    #(#column_descriptors),*
                ];
                &COLUMNS
            }

            #[allow(clippy::clone_on_copy)]
            fn read_field(
                &self,
                field: &str,
            ) -> ::std::result::Result<
                ::std::option::Option<::influx_mapper::ColumnValue>,
                ::influx_mapper::FieldAccessError,
            > {
                match field {
                    #(#read_arms)*
                    other => ::std::result::Result::Err(::influx_mapper::FieldAccessError::UnknownField {
                        type_name: ::std::any::type_name::<Self>(),
                        field: ::std::string::ToString::to_string(other),
                    }),
                }
            }
        }
    })
}

/// Expression producing `Option<ColumnValue>` for one column
fn read_expr(column: &ColumnInfo) -> proc_macro2::TokenStream {
    let field = &column.field;
    match (&column.kind, column.optional) {
        (ValueKind::Supported, false) => quote! {
            ::std::option::Option::Some(::influx_mapper::ColumnValue::from(
                ::std::clone::Clone::clone(&self.#field),
            ))
        },
        (ValueKind::Supported, true) => quote! {
            ::std::clone::Clone::clone(&self.#field).map(::influx_mapper::ColumnValue::from)
        },
        (ValueKind::Other(type_name), false) => quote! {
            ::std::option::Option::Some(::influx_mapper::ColumnValue::Other {
                type_name: #type_name,
                text: ::std::string::ToString::to_string(&self.#field),
            })
        },
        (ValueKind::Other(type_name), true) => quote! {
            self.#field.as_ref().map(|value| ::influx_mapper::ColumnValue::Other {
                type_name: #type_name,
                text: ::std::string::ToString::to_string(value),
            })
        },
    }
}

/// Bounds a generic struct needs: `Measurement` is `'static + Send + Sync`,
/// and text columns are rendered through `Display`.
fn bounded_generics(generics: &Generics, columns: &[ColumnInfo]) -> Generics {
    let mut generics = generics.clone();
    if generics.type_params().next().is_none() {
        return generics;
    }

    for param in generics.type_params_mut() {
        param.bounds.push(parse_quote!('static));
        param.bounds.push(parse_quote!(::std::marker::Send));
        param.bounds.push(parse_quote!(::std::marker::Sync));
    }

    let where_clause = generics.make_where_clause();
    for column in columns {
        if let ValueKind::Other(_) = column.kind {
            let ty = &column.value_type;
            where_clause
                .predicates
                .push(parse_quote!(#ty: ::std::fmt::Display));
        }
    }
    generics
}

fn option_tokens(value: Option<&LitStr>) -> proc_macro2::TokenStream {
    match value {
        Some(lit) => quote! { ::std::option::Option::Some(#lit) },
        None => quote! { ::std::option::Option::None },
    }
}

/// Parse `#[measurement(...)]`; `None` when the struct has no such attribute
fn parse_measurement_attr(input: &DeriveInput) -> syn::Result<Option<MeasurementAttr>> {
    let Some(attr) = input.attrs.iter().find(|a| a.path().is_ident("measurement")) else {
        return Ok(None);
    };

    let mut name = None;
    let mut database = None;
    let mut retention_policy = None;
    let mut time_unit = None;

    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("name") {
            name = Some(non_empty(meta.value()?.parse()?)?);
        } else if meta.path.is_ident("database") {
            database = Some(non_empty(meta.value()?.parse()?)?);
        } else if meta.path.is_ident("retention_policy") {
            retention_policy = Some(non_empty(meta.value()?.parse()?)?);
        } else if meta.path.is_ident("time_unit") {
            let lit: LitStr = meta.value()?.parse()?;
            let value = lit.value();
            let Some((_, variant)) = TIME_UNITS.iter().find(|(s, _)| *s == value) else {
                return Err(syn::Error::new_spanned(
                    &lit,
                    format!(
                        "Unknown time_unit: {value}. Expected one of: nanoseconds, microseconds, \
                         milliseconds, seconds, minutes, hours."
                    ),
                ));
            };
            time_unit = Some(syn::Ident::new(variant, lit.span()));
        } else {
            return Err(meta.error("Unsupported measurement attribute"));
        }
        Ok(())
    })?;

    let Some(name) = name else {
        return Err(syn::Error::new_spanned(
            attr,
            "#[measurement] requires a name, e.g. #[measurement(name = \"cpu\")]",
        ));
    };

    Ok(Some(MeasurementAttr {
        name,
        database,
        retention_policy,
        time_unit: time_unit
            .unwrap_or_else(|| syn::Ident::new("Milliseconds", proc_macro2::Span::call_site())),
    }))
}

/// Parse `#[column(...)]` on a field; `None` when the field is not a column
fn parse_column(field: &syn::Field) -> syn::Result<Option<ColumnInfo>> {
    let Some(attr) = field.attrs.iter().find(|a| a.path().is_ident("column")) else {
        return Ok(None);
    };
    let Some(ident) = field.ident.as_ref() else {
        return Err(syn::Error::new_spanned(field, "Field must have a name"));
    };

    let mut wire_name = None;
    let mut tag = false;
    let mut nullable = false;

    // `#[column]` alone is a plain field column named after the struct field.
    if !matches!(attr.meta, syn::Meta::Path(_)) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                wire_name = Some(non_empty(meta.value()?.parse()?)?.value());
            } else if meta.path.is_ident("tag") {
                tag = parse_flag(&meta)?;
            } else if meta.path.is_ident("nullable") {
                nullable = parse_flag(&meta)?;
            } else {
                return Err(meta.error("Unsupported column attribute"));
            }
            Ok(())
        })?;
    }

    let (optional, value_type) = match option_inner(&field.ty) {
        Some(inner) => (true, inner),
        None => (false, &field.ty),
    };

    Ok(Some(ColumnInfo {
        field: ident.clone(),
        wire_name: wire_name.unwrap_or_else(|| ident.to_string()),
        tag,
        nullable,
        optional,
        value_type: value_type.clone(),
        kind: value_kind(value_type),
    }))
}

/// `tag` alone means true; `tag = false` is accepted too
fn parse_flag(meta: &ParseNestedMeta<'_>) -> syn::Result<bool> {
    if meta.input.peek(syn::Token![=]) {
        let lit: LitBool = meta.value()?.parse()?;
        Ok(lit.value)
    } else {
        Ok(true)
    }
}

fn non_empty(lit: LitStr) -> syn::Result<LitStr> {
    if lit.value().is_empty() {
        Err(syn::Error::new_spanned(&lit, "Value must not be empty"))
    } else {
        Ok(lit)
    }
}

/// Inner type of `Option<T>` (also `std::option::Option<T>`)
fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(inner) if args.args.len() == 1 => Some(inner),
        _ => None,
    }
}

fn value_kind(ty: &Type) -> ValueKind {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            let ident = segment.ident.to_string();
            if segment.arguments.is_empty() && SUPPORTED_TYPES.contains(&ident.as_str()) {
                return ValueKind::Supported;
            }
        }
    }
    ValueKind::Other(quote!(#ty).to_string().replace(' ', ""))
}
