use swc_core::{
    common::DUMMY_SP,
    ecma::ast::{IdentName, JSXAttr, JSXAttrName, JSXAttrOrSpread, JSXAttrValue, Lit, Str},
};

/// Build a `key="value"` JSX attribute.
pub fn string_attr(key: &str, value: &str) -> JSXAttrOrSpread {
    JSXAttrOrSpread::JSXAttr(JSXAttr {
        span: DUMMY_SP,
        name: JSXAttrName::Ident(IdentName::new(key.into(), DUMMY_SP)),
        value: Some(string_value(value)),
    })
}

fn string_value(value: &str) -> JSXAttrValue {
    JSXAttrValue::Lit(Lit::Str(Str {
        span: DUMMY_SP,
        value: value.into(),
        raw: None,
    }))
}

fn is_named(attr: &JSXAttr, key: &str) -> bool {
    matches!(&attr.name, JSXAttrName::Ident(ident) if ident.sym.as_ref() == key)
}

/// Set `key` to `value` on an element's attribute list.
///
/// An existing attribute with that exact name is overwritten in place, so
/// re-running the transform never stacks duplicates. Otherwise the attribute
/// is appended after everything already present, spreads included, which
/// keeps JSX's last-write-wins order in favor of the injected value.
pub fn set_attribute(attrs: &mut Vec<JSXAttrOrSpread>, key: &str, value: &str) {
    let existing = attrs.iter_mut().find_map(|attr| match attr {
        JSXAttrOrSpread::JSXAttr(jsx_attr) if is_named(jsx_attr, key) => Some(jsx_attr),
        _ => None,
    });
    match existing {
        Some(jsx_attr) => jsx_attr.value = Some(string_value(value)),
        None => attrs.push(string_attr(key, value)),
    }
}
