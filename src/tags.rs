//! Tag classification and the per-module table of framework bindings it
//! resolves against.

use std::collections::HashSet;

use swc_core::ecma::ast::*;

use crate::registry::TopLevelItem;

const FRAMEWORK_SOURCES: &[&str] = &["react"];
const COMPONENT_BASES: &[&str] = &["Component", "PureComponent"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    Fragment(FragmentKind),
    Component(ComponentRef),
    Markup(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    /// `<>...</>`
    Anonymous,
    /// `<Fragment>` or `<React.Fragment>`, under any local alias
    Named,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentRef {
    Simple(String),
    Path(Vec<String>),
}

impl ComponentRef {
    /// The identity string written into the element attribute.
    pub fn identity(&self) -> String {
        match self {
            ComponentRef::Simple(name) => name.clone(),
            ComponentRef::Path(segments) => segments.join("."),
        }
    }
}

pub fn starts_uppercase(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

// -----------------------------------------------------------------------------
// Framework bindings
// -----------------------------------------------------------------------------

/// Local names that resolve to framework identities in one module.
#[derive(Debug, Clone)]
pub struct FrameworkSymbols {
    fragments: HashSet<String>,
    namespaces: HashSet<String>,
    component_bases: HashSet<String>,
    styled: HashSet<String>,
}

impl Default for FrameworkSymbols {
    fn default() -> Self {
        Self {
            fragments: HashSet::from(["Fragment".to_string()]),
            namespaces: HashSet::from(["React".to_string()]),
            component_bases: COMPONENT_BASES.iter().map(|s| s.to_string()).collect(),
            styled: HashSet::from(["styled".to_string()]),
        }
    }
}

impl FrameworkSymbols {
    /// Resolve framework bindings from a file's imports, then from top-level
    /// aliases such as `const Frag = React.Fragment` or
    /// `const { Fragment: F } = React`.
    pub fn collect<T: TopLevelItem>(items: &[T], styled_sources: &[String]) -> Self {
        let mut out = Self::default();
        for import in items.iter().filter_map(TopLevelItem::import) {
            out.import(import, styled_sources);
        }
        for item in items {
            if let Some(Decl::Var(var)) = item.declaration() {
                for declarator in &var.decls {
                    out.alias(declarator);
                }
            }
        }
        out
    }

    fn import(&mut self, n: &ImportDecl, styled_sources: &[String]) {
        if n.type_only {
            return;
        }
        let source = n.src.value.as_ref();
        let from_framework = FRAMEWORK_SOURCES.contains(&source);
        let from_styled = styled_sources.iter().any(|s| s == source);

        for s in &n.specifiers {
            match s {
                ImportSpecifier::Named(named) if from_framework && !named.is_type_only => {
                    let imported = match &named.imported {
                        Some(ModuleExportName::Ident(i)) => i.sym.to_string(),
                        Some(ModuleExportName::Str(s)) => s.value.to_string(),
                        None => named.local.sym.to_string(),
                    };
                    self.bind(&imported, named.local.sym.to_string());
                }
                ImportSpecifier::Default(def) if from_framework => {
                    self.namespaces.insert(def.local.sym.to_string());
                }
                ImportSpecifier::Namespace(ns) if from_framework => {
                    self.namespaces.insert(ns.local.sym.to_string());
                }
                ImportSpecifier::Default(def) if from_styled => {
                    self.styled.insert(def.local.sym.to_string());
                }
                _ => {}
            }
        }
    }

    /// Record `local` as a binding of the framework export `exported`.
    fn bind(&mut self, exported: &str, local: String) {
        if exported == "Fragment" {
            self.fragments.insert(local);
        } else if COMPONENT_BASES.contains(&exported) {
            self.component_bases.insert(local);
        }
    }

    fn alias(&mut self, declarator: &VarDeclarator) {
        let Some(init) = declarator.init.as_deref() else {
            return;
        };
        let init = unparen(init);
        match &declarator.name {
            Pat::Ident(binding) => {
                let local = binding.id.sym.to_string();
                match init {
                    Expr::Ident(source) => {
                        let source = source.sym.as_ref();
                        if self.fragments.contains(source) {
                            self.fragments.insert(local);
                        } else if self.component_bases.contains(source) {
                            self.component_bases.insert(local);
                        } else if self.namespaces.contains(source) {
                            self.namespaces.insert(local);
                        }
                    }
                    Expr::Member(member) => {
                        if let Some(exported) = self.namespace_member(member) {
                            self.bind(exported, local);
                        }
                    }
                    _ => {}
                }
            }
            Pat::Object(object) => {
                let from_namespace =
                    matches!(init, Expr::Ident(ns) if self.namespaces.contains(ns.sym.as_ref()));
                if !from_namespace {
                    return;
                }
                for prop in &object.props {
                    match prop {
                        ObjectPatProp::KeyValue(kv) => {
                            let (PropName::Ident(key), Pat::Ident(value)) = (&kv.key, &*kv.value) else {
                                continue;
                            };
                            self.bind(key.sym.as_ref(), value.id.sym.to_string());
                        }
                        ObjectPatProp::Assign(assign) => {
                            let local = assign.key.sym.to_string();
                            self.bind(&local, local.clone());
                        }
                        ObjectPatProp::Rest(_) => {}
                    }
                }
            }
            _ => {}
        }
    }

    /// `React.Fragment` -> `Fragment`, when the object is a framework namespace.
    fn namespace_member<'e>(&self, member: &'e MemberExpr) -> Option<&'e str> {
        let Expr::Ident(obj) = &*member.obj else {
            return None;
        };
        if !self.namespaces.contains(obj.sym.as_ref()) {
            return None;
        }
        match &member.prop {
            MemberProp::Ident(prop) => Some(prop.sym.as_ref()),
            _ => None,
        }
    }

    pub fn is_styled_wrapper(&self, local: &str) -> bool {
        self.styled.contains(local)
    }

    /// Whether a class `extends` expression names a framework component base.
    pub fn is_component_base(&self, super_class: &Expr) -> bool {
        match super_class {
            Expr::Ident(ident) => self.component_bases.contains(ident.sym.as_ref()),
            Expr::Member(member) => {
                matches!(&*member.obj, Expr::Ident(obj) if self.namespaces.contains(obj.sym.as_ref()))
                    && matches!(&member.prop, MemberProp::Ident(prop) if COMPONENT_BASES.contains(&prop.sym.as_ref()))
            }
            Expr::Paren(paren) => self.is_component_base(&paren.expr),
            _ => false,
        }
    }

    fn is_named_fragment(&self, name: &JSXElementName) -> bool {
        match name {
            JSXElementName::Ident(ident) => self.fragments.contains(ident.sym.as_ref()),
            JSXElementName::JSXMemberExpr(member) => {
                member.prop.sym.as_ref() == "Fragment"
                    && matches!(&member.obj, JSXObject::Ident(obj) if self.namespaces.contains(obj.sym.as_ref()))
            }
            JSXElementName::JSXNamespacedName(_) => false,
        }
    }

    /// Classify an element's tag; `None` is the empty `<>` tag.
    pub fn classify(&self, name: Option<&JSXElementName>) -> Tag {
        let Some(name) = name else {
            return Tag::Fragment(FragmentKind::Anonymous);
        };
        if self.is_named_fragment(name) {
            return Tag::Fragment(FragmentKind::Named);
        }
        match name {
            JSXElementName::Ident(ident) => {
                let sym = ident.sym.to_string();
                if starts_uppercase(&sym) {
                    Tag::Component(ComponentRef::Simple(sym))
                } else {
                    Tag::Markup(sym)
                }
            }
            JSXElementName::JSXMemberExpr(member) => {
                let mut segments = vec![];
                member_segments(member, &mut segments);
                Tag::Component(ComponentRef::Path(segments))
            }
            JSXElementName::JSXNamespacedName(ns) => {
                Tag::Markup(format!("{}:{}", ns.ns.sym, ns.name.sym))
            }
        }
    }
}

fn member_segments(member: &JSXMemberExpr, out: &mut Vec<String>) {
    match &member.obj {
        JSXObject::Ident(ident) => out.push(ident.sym.to_string()),
        JSXObject::JSXMemberExpr(inner) => member_segments(inner, out),
    }
    out.push(member.prop.sym.to_string());
}

fn unparen(expr: &Expr) -> &Expr {
    match expr {
        Expr::Paren(paren) => unparen(&paren.expr),
        other => other,
    }
}
