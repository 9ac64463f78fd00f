//! Parsing and inspection helpers shared by the unit tests.

use swc_core::{
    common::{sync::Lrc, FileName, SourceMap},
    ecma::{
        ast::*,
        parser::{parse_file_as_module, parse_file_as_script, EsSyntax, Syntax},
        visit::{Visit, VisitWith},
    },
};

use crate::{config::PluginConfig, ComponentAnnotator};

fn jsx() -> Syntax {
    Syntax::Es(EsSyntax {
        jsx: true,
        ..Default::default()
    })
}

pub fn parse(src: &str) -> Module {
    let cm: Lrc<SourceMap> = Default::default();
    let fm = cm.new_source_file(FileName::Anon.into(), src.to_string());
    let mut recovered = vec![];
    parse_file_as_module(&fm, jsx(), EsVersion::latest(), None, &mut recovered)
        .expect("fixture parses")
}

/// Parse without module scope: no `import`/`export`.
pub fn parse_script(src: &str) -> Script {
    let cm: Lrc<SourceMap> = Default::default();
    let fm = cm.new_source_file(FileName::Anon.into(), src.to_string());
    let mut recovered = vec![];
    parse_file_as_script(&fm, jsx(), EsVersion::latest(), None, &mut recovered)
        .expect("fixture parses as a script")
}

pub fn transform_with(src: &str, config: PluginConfig) -> Module {
    let mut module = parse(src);
    ComponentAnnotator::new(config, "test.jsx").annotate_module(&mut module);
    module
}

pub fn transform(src: &str) -> Module {
    transform_with(src, PluginConfig::default())
}

/// One rendered element: its tag as written and its attributes in order.
/// String attributes print as `name=value`, spreads as `...`, anything else
/// as the bare name.
#[derive(Debug, Clone)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<String>,
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&str> {
        let prefix = format!("{name}=");
        self.attrs.iter().find_map(|a| a.strip_prefix(&prefix))
    }
}

/// Every element in the module, in document order.
pub fn elements(module: &Module) -> Vec<Element> {
    let mut collector = Collector::default();
    module.visit_with(&mut collector);
    collector.out
}

pub fn script_elements(script: &Script) -> Vec<Element> {
    let mut collector = Collector::default();
    script.visit_with(&mut collector);
    collector.out
}

/// The `nth` element (zero-based) with the given tag.
pub fn nth(elements: &[Element], tag: &str, n: usize) -> Element {
    elements
        .iter()
        .filter(|e| e.tag == tag)
        .nth(n)
        .cloned()
        .unwrap_or_else(|| panic!("no element #{n} with tag {tag}"))
}

#[derive(Default)]
struct Collector {
    out: Vec<Element>,
}

fn tag_name(name: &JSXElementName) -> String {
    fn object(obj: &JSXObject) -> String {
        match obj {
            JSXObject::Ident(i) => i.sym.to_string(),
            JSXObject::JSXMemberExpr(m) => format!("{}.{}", object(&m.obj), m.prop.sym),
        }
    }
    match name {
        JSXElementName::Ident(i) => i.sym.to_string(),
        JSXElementName::JSXMemberExpr(m) => format!("{}.{}", object(&m.obj), m.prop.sym),
        JSXElementName::JSXNamespacedName(n) => format!("{}:{}", n.ns.sym, n.name.sym),
    }
}

impl Visit for Collector {
    fn visit_jsx_element(&mut self, n: &JSXElement) {
        let attrs = n
            .opening
            .attrs
            .iter()
            .map(|attr| match attr {
                JSXAttrOrSpread::SpreadElement(_) => "...".to_string(),
                JSXAttrOrSpread::JSXAttr(a) => {
                    let name = match &a.name {
                        JSXAttrName::Ident(i) => i.sym.to_string(),
                        JSXAttrName::JSXNamespacedName(n) => format!("{}:{}", n.ns.sym, n.name.sym),
                    };
                    match &a.value {
                        Some(JSXAttrValue::Lit(Lit::Str(s))) => format!("{name}={}", s.value),
                        _ => name,
                    }
                }
            })
            .collect();
        self.out.push(Element {
            tag: tag_name(&n.opening.name),
            attrs,
        });
        n.visit_children_with(self);
    }
}
