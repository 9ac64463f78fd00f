//! Finds the top-level component definitions of a module or script.

use swc_core::ecma::ast::*;

use crate::{tags::starts_uppercase, tags::FrameworkSymbols, SourceContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    Function,
    Arrow,
    Class,
}

/// The part of a definition whose returned elements get annotated.
pub enum RenderBody<'m> {
    Block(&'m mut BlockStmt),
    /// Expression-bodied arrow function.
    Expr(&'m mut Expr),
}

pub struct ComponentEntry<'m> {
    pub name: String,
    pub kind: ComponentKind,
    /// False when the name is in the ignore set.
    pub eligible: bool,
    pub body: RenderBody<'m>,
}

/// A named definition reachable from the top level of a file.
pub enum Definition<'m> {
    Decl(&'m mut Decl),
    DefaultFn(String, &'m mut Function),
    DefaultClass(String, &'m mut Class),
}

/// One top-level entry of a module (`ModuleItem`) or script (`Stmt`).
pub trait TopLevelItem {
    fn import(&self) -> Option<&ImportDecl>;

    /// The declaration, exported or not, for read-only scans.
    fn declaration(&self) -> Option<&Decl>;

    fn definition(&mut self) -> Option<Definition<'_>>;
}

impl TopLevelItem for Stmt {
    fn import(&self) -> Option<&ImportDecl> {
        None
    }

    fn declaration(&self) -> Option<&Decl> {
        self.as_decl()
    }

    fn definition(&mut self) -> Option<Definition<'_>> {
        match self {
            Stmt::Decl(decl) => Some(Definition::Decl(decl)),
            _ => None,
        }
    }
}

impl TopLevelItem for ModuleItem {
    fn import(&self) -> Option<&ImportDecl> {
        match self {
            ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => Some(import),
            _ => None,
        }
    }

    fn declaration(&self) -> Option<&Decl> {
        match self {
            ModuleItem::Stmt(stmt) => stmt.declaration(),
            ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => Some(&export.decl),
            _ => None,
        }
    }

    fn definition(&mut self) -> Option<Definition<'_>> {
        match self {
            ModuleItem::Stmt(stmt) => stmt.definition(),
            ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => {
                Some(Definition::Decl(&mut export.decl))
            }
            ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(export)) => match &mut export.decl {
                DefaultDecl::Fn(FnExpr {
                    ident: Some(ident),
                    function,
                }) => Some(Definition::DefaultFn(ident.sym.to_string(), function)),
                DefaultDecl::Class(ClassExpr {
                    ident: Some(ident),
                    class,
                }) => Some(Definition::DefaultClass(ident.sym.to_string(), class)),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Scan a file's top-level declarations for components.
///
/// Declarations that don't look like components are skipped silently.
pub fn collect_components<'m, T: TopLevelItem>(
    items: &'m mut [T],
    symbols: &FrameworkSymbols,
    ctx: &SourceContext,
) -> Vec<ComponentEntry<'m>> {
    let mut registry = Registry {
        symbols,
        ctx,
        out: vec![],
    };
    for item in items.iter_mut() {
        match item.definition() {
            Some(Definition::Decl(decl)) => registry.decl(decl),
            Some(Definition::DefaultFn(name, function)) => registry.function(name, function),
            Some(Definition::DefaultClass(name, class)) => registry.class(name, class),
            None => {}
        }
    }
    registry.out
}

struct Registry<'s, 'm> {
    symbols: &'s FrameworkSymbols,
    ctx: &'s SourceContext,
    out: Vec<ComponentEntry<'m>>,
}

impl<'m> Registry<'_, 'm> {
    fn push(&mut self, name: String, kind: ComponentKind, body: RenderBody<'m>) {
        let eligible = !self.ctx.is_ignored(&name);
        self.out.push(ComponentEntry {
            name,
            kind,
            eligible,
            body,
        });
    }

    fn decl(&mut self, decl: &'m mut Decl) {
        match decl {
            Decl::Fn(fn_decl) => {
                let name = fn_decl.ident.sym.to_string();
                self.function(name, &mut fn_decl.function);
            }
            Decl::Class(class_decl) => {
                let name = class_decl.ident.sym.to_string();
                self.class(name, &mut class_decl.class);
            }
            Decl::Var(var) => {
                for declarator in var.decls.iter_mut() {
                    self.declarator(declarator);
                }
            }
            _ => {}
        }
    }

    fn function(&mut self, name: String, function: &'m mut Function) {
        if !starts_uppercase(&name) {
            return;
        }
        if let Some(body) = function.body.as_mut() {
            if block_returns_jsx(body) {
                self.push(name, ComponentKind::Function, RenderBody::Block(body));
            }
        }
    }

    fn declarator(&mut self, declarator: &'m mut VarDeclarator) {
        let Pat::Ident(binding) = &declarator.name else {
            return;
        };
        let name = binding.id.sym.to_string();
        if !starts_uppercase(&name) {
            return;
        }
        let Some(init) = declarator.init.as_deref_mut() else {
            return;
        };
        match unparen_mut(init) {
            Expr::Arrow(arrow) => match &mut *arrow.body {
                BlockStmtOrExpr::BlockStmt(block) => {
                    if block_returns_jsx(block) {
                        self.push(name, ComponentKind::Arrow, RenderBody::Block(block));
                    }
                }
                BlockStmtOrExpr::Expr(expr) => {
                    if produces_jsx(expr) {
                        self.push(name, ComponentKind::Arrow, RenderBody::Expr(expr));
                    }
                }
            },
            Expr::Fn(fn_expr) => self.function(name, &mut fn_expr.function),
            _ => {}
        }
    }

    fn class(&mut self, name: String, class: &'m mut Class) {
        // A lowercase tag would render as an intrinsic element, never as this class.
        if !starts_uppercase(&name) {
            return;
        }
        let extends_base = class
            .super_class
            .as_deref()
            .is_some_and(|base| self.symbols.is_component_base(base));
        if !extends_base {
            return;
        }
        let render = class.body.iter_mut().find_map(|member| match member {
            ClassMember::Method(method)
                if !method.is_static
                    && method.kind == MethodKind::Method
                    && matches!(&method.key, PropName::Ident(key) if key.sym.as_ref() == "render") =>
            {
                method.function.body.as_mut()
            }
            _ => None,
        });
        if let Some(body) = render {
            if block_returns_jsx(body) {
                self.push(name, ComponentKind::Class, RenderBody::Block(body));
            }
        }
    }
}

pub(crate) fn unparen_mut(expr: &mut Expr) -> &mut Expr {
    match expr {
        Expr::Paren(paren) => unparen_mut(&mut paren.expr),
        other => other,
    }
}

// -----------------------------------------------------------------------------
// "Returns element output" detection
// -----------------------------------------------------------------------------

fn block_returns_jsx(block: &BlockStmt) -> bool {
    block.stmts.iter().any(stmt_returns_jsx)
}

fn stmt_returns_jsx(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::Return(ret) => ret.arg.as_deref().is_some_and(produces_jsx),
        Stmt::Block(block) => block_returns_jsx(block),
        Stmt::If(if_stmt) => {
            stmt_returns_jsx(&if_stmt.cons) || if_stmt.alt.as_deref().is_some_and(stmt_returns_jsx)
        }
        Stmt::Switch(switch) => switch
            .cases
            .iter()
            .any(|case| case.cons.iter().any(stmt_returns_jsx)),
        Stmt::Try(try_stmt) => {
            block_returns_jsx(&try_stmt.block)
                || try_stmt.handler.as_ref().is_some_and(|h| block_returns_jsx(&h.body))
                || try_stmt.finalizer.as_ref().is_some_and(block_returns_jsx)
        }
        Stmt::Labeled(labeled) => stmt_returns_jsx(&labeled.body),
        Stmt::While(s) => stmt_returns_jsx(&s.body),
        Stmt::DoWhile(s) => stmt_returns_jsx(&s.body),
        Stmt::For(s) => stmt_returns_jsx(&s.body),
        Stmt::ForIn(s) => stmt_returns_jsx(&s.body),
        Stmt::ForOf(s) => stmt_returns_jsx(&s.body),
        _ => false,
    }
}

/// Whether evaluating `expr` can yield element-tree output.
pub(crate) fn produces_jsx(expr: &Expr) -> bool {
    match expr {
        Expr::JSXElement(_) | Expr::JSXFragment(_) => true,
        Expr::Paren(paren) => produces_jsx(&paren.expr),
        Expr::Cond(cond) => produces_jsx(&cond.cons) || produces_jsx(&cond.alt),
        Expr::Bin(bin) if is_logical(bin.op) => produces_jsx(&bin.left) || produces_jsx(&bin.right),
        Expr::Call(call) => mapped_callback(call).is_some_and(callback_returns_jsx),
        _ => false,
    }
}

pub(crate) fn is_logical(op: BinaryOp) -> bool {
    matches!(
        op,
        BinaryOp::LogicalAnd | BinaryOp::LogicalOr | BinaryOp::NullishCoalescing
    )
}

/// The callback of a `list.map(cb)` call.
pub(crate) fn mapped_callback(call: &CallExpr) -> Option<&Expr> {
    let Callee::Expr(callee) = &call.callee else {
        return None;
    };
    let Expr::Member(member) = &**callee else {
        return None;
    };
    if !matches!(&member.prop, MemberProp::Ident(prop) if prop.sym.as_ref() == "map") {
        return None;
    }
    call.args.first().filter(|arg| arg.spread.is_none()).map(|arg| &*arg.expr)
}

fn callback_returns_jsx(callback: &Expr) -> bool {
    match callback {
        Expr::Arrow(arrow) => match &*arrow.body {
            BlockStmtOrExpr::BlockStmt(block) => block_returns_jsx(block),
            BlockStmtOrExpr::Expr(expr) => produces_jsx(expr),
        },
        Expr::Fn(fn_expr) => fn_expr.function.body.as_ref().is_some_and(block_returns_jsx),
        Expr::Paren(paren) => callback_returns_jsx(&paren.expr),
        _ => false,
    }
}
