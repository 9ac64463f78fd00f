//! Walks a component's returned element tree and attaches identity attributes.
//!
//! The walk is pre-order and carries the slot it is visiting as an explicit
//! [`Position`]. The returned node is the root; anonymous fragments and
//! embedded expressions hand their own position down to what they contain,
//! while any real element demotes its children to nested position. Named
//! fragments end the walk for their whole subtree.

use swc_core::ecma::ast::*;

use crate::{
    attrs::set_attribute,
    config::AttrKeys,
    registry::{is_logical, RenderBody},
    tags::{FrameworkSymbols, Tag},
    SourceContext,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Root,
    Nested,
}

pub struct Annotator<'a> {
    pub symbols: &'a FrameworkSymbols,
    pub keys: &'a AttrKeys,
    pub ctx: &'a SourceContext,
    /// Name of the component whose body is being walked.
    pub component: &'a str,
}

impl Annotator<'_> {
    pub fn annotate(&self, body: RenderBody<'_>) {
        match body {
            RenderBody::Block(block) => self.visit_stmts(&mut block.stmts, Position::Root),
            RenderBody::Expr(expr) => self.visit_expr(expr, Position::Root),
        }
    }

    /// Visit every `return` reachable from these statements without entering
    /// nested functions.
    fn visit_stmts(&self, stmts: &mut [Stmt], pos: Position) {
        for stmt in stmts {
            self.visit_stmt(stmt, pos);
        }
    }

    fn visit_stmt(&self, stmt: &mut Stmt, pos: Position) {
        match stmt {
            Stmt::Return(ret) => {
                if let Some(arg) = ret.arg.as_deref_mut() {
                    self.visit_expr(arg, pos);
                }
            }
            Stmt::Block(block) => self.visit_stmts(&mut block.stmts, pos),
            Stmt::If(if_stmt) => {
                self.visit_stmt(&mut if_stmt.cons, pos);
                if let Some(alt) = if_stmt.alt.as_deref_mut() {
                    self.visit_stmt(alt, pos);
                }
            }
            Stmt::Switch(switch) => {
                for case in switch.cases.iter_mut() {
                    self.visit_stmts(&mut case.cons, pos);
                }
            }
            Stmt::Try(try_stmt) => {
                self.visit_stmts(&mut try_stmt.block.stmts, pos);
                if let Some(handler) = try_stmt.handler.as_mut() {
                    self.visit_stmts(&mut handler.body.stmts, pos);
                }
                if let Some(finalizer) = try_stmt.finalizer.as_mut() {
                    self.visit_stmts(&mut finalizer.stmts, pos);
                }
            }
            Stmt::Labeled(labeled) => self.visit_stmt(&mut labeled.body, pos),
            Stmt::While(s) => self.visit_stmt(&mut s.body, pos),
            Stmt::DoWhile(s) => self.visit_stmt(&mut s.body, pos),
            Stmt::For(s) => self.visit_stmt(&mut s.body, pos),
            Stmt::ForIn(s) => self.visit_stmt(&mut s.body, pos),
            Stmt::ForOf(s) => self.visit_stmt(&mut s.body, pos),
            _ => {}
        }
    }

    /// Embedded expressions are transparent: any branch that yields elements
    /// is visited in the position the expression itself occupies.
    fn visit_expr(&self, expr: &mut Expr, pos: Position) {
        match expr {
            Expr::JSXElement(element) => self.visit_element(element, pos),
            Expr::JSXFragment(fragment) => self.visit_children(&mut fragment.children, pos),
            Expr::Paren(paren) => self.visit_expr(&mut paren.expr, pos),
            Expr::Cond(cond) => {
                self.visit_expr(&mut cond.cons, pos);
                self.visit_expr(&mut cond.alt, pos);
            }
            Expr::Bin(bin) if is_logical(bin.op) => {
                self.visit_expr(&mut bin.left, pos);
                self.visit_expr(&mut bin.right, pos);
            }
            Expr::Call(call) => {
                if let Some(callback) = mapped_callback_mut(call) {
                    self.visit_callback(callback, pos);
                }
            }
            _ => {}
        }
    }

    // A mapped callback's returns take the position of the `.map()` call.
    fn visit_callback(&self, callback: &mut Expr, pos: Position) {
        match callback {
            Expr::Arrow(arrow) => match &mut *arrow.body {
                BlockStmtOrExpr::BlockStmt(block) => self.visit_stmts(&mut block.stmts, pos),
                BlockStmtOrExpr::Expr(expr) => self.visit_expr(expr, pos),
            },
            Expr::Fn(fn_expr) => {
                if let Some(block) = fn_expr.function.body.as_mut() {
                    self.visit_stmts(&mut block.stmts, pos);
                }
            }
            Expr::Paren(paren) => self.visit_callback(&mut paren.expr, pos),
            _ => {}
        }
    }

    fn visit_children(&self, children: &mut [JSXElementChild], pos: Position) {
        for child in children {
            match child {
                JSXElementChild::JSXElement(element) => self.visit_element(element, pos),
                JSXElementChild::JSXFragment(fragment) => {
                    self.visit_children(&mut fragment.children, pos)
                }
                JSXElementChild::JSXExprContainer(container) => {
                    if let JSXExpr::Expr(expr) = &mut container.expr {
                        self.visit_expr(expr, pos);
                    }
                }
                _ => {}
            }
        }
    }

    fn visit_element(&self, element: &mut JSXElement, pos: Position) {
        let attrs = &mut element.opening.attrs;
        match (self.symbols.classify(Some(&element.opening.name)), pos) {
            (Tag::Fragment(_), _) => {
                tracing::trace!(component = self.component, "named fragment subtree left untouched");
                return;
            }
            // Ignored names stay bare wherever they are referenced.
            (Tag::Component(reference), _) if self.ctx.is_ignored(&reference.identity()) => {
                tracing::trace!(
                    component = self.component,
                    reference = %reference.identity(),
                    "ignored reference left untouched"
                );
            }
            (Tag::Markup(_) | Tag::Component(_), Position::Root) => {
                set_attribute(attrs, &self.keys.component, self.component);
                set_attribute(attrs, &self.keys.source_file, &self.ctx.file_id);
            }
            (Tag::Component(reference), Position::Nested) => {
                set_attribute(attrs, &self.keys.element, &reference.identity());
                set_attribute(attrs, &self.keys.source_file, &self.ctx.file_id);
            }
            (Tag::Markup(_), Position::Nested) => {}
        }
        self.visit_children(&mut element.children, Position::Nested);
    }
}

fn mapped_callback_mut(call: &mut CallExpr) -> Option<&mut Expr> {
    if crate::registry::mapped_callback(call).is_none() {
        return None;
    }
    call.args.first_mut().map(|arg| &mut *arg.expr)
}
