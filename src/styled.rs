//! Rewrites `styled(Component)` so the wrapped component annotates itself:
//!
//! ```jsx
//! styled(Button)
//! // becomes
//! styled((props) => <Button data-element="Button" data-source-file="x.jsx" {...props} />)
//! ```

use std::collections::HashSet;

use swc_core::{
    common::{SyntaxContext, DUMMY_SP},
    ecma::{
        ast::*,
        visit::{VisitMut, VisitMutWith},
    },
};

use crate::{
    attrs::set_attribute,
    config::AttrKeys,
    tags::{starts_uppercase, FrameworkSymbols},
};

const PROPS_PARAM: &str = "props";

pub struct StyledRewriter<'a> {
    pub symbols: &'a FrameworkSymbols,
    pub keys: &'a AttrKeys,
    pub file_id: &'a str,
    /// Eligible component names registered in this module.
    pub components: &'a HashSet<String>,
    pub rewritten: usize,
}

impl StyledRewriter<'_> {
    fn is_wrapper_call(&self, call: &CallExpr) -> bool {
        matches!(&call.callee, Callee::Expr(callee)
            if matches!(&**callee, Expr::Ident(ident) if self.symbols.is_styled_wrapper(ident.sym.as_ref())))
    }

    /// The bare component identifier passed as the sole argument, if any.
    fn wrapped_component<'c>(&self, call: &'c CallExpr) -> Option<&'c Ident> {
        let [arg] = call.args.as_slice() else {
            return None;
        };
        if arg.spread.is_some() {
            return None;
        }
        match &*arg.expr {
            Expr::Ident(ident)
                if starts_uppercase(&ident.sym) && self.components.contains(ident.sym.as_ref()) =>
            {
                Some(ident)
            }
            _ => None,
        }
    }

    /// `(props) => <Component {identity attrs} {...props} />`
    fn render_proxy(&self, component: &Ident) -> Expr {
        let props = Ident::new(PROPS_PARAM.into(), DUMMY_SP, SyntaxContext::empty());

        let mut attrs = vec![];
        set_attribute(&mut attrs, &self.keys.element, component.sym.as_ref());
        set_attribute(&mut attrs, &self.keys.source_file, self.file_id);
        attrs.push(JSXAttrOrSpread::SpreadElement(SpreadElement {
            dot3_token: DUMMY_SP,
            expr: Box::new(Expr::Ident(props.clone())),
        }));

        let element = JSXElement {
            span: DUMMY_SP,
            opening: JSXOpeningElement {
                name: JSXElementName::Ident(component.clone()),
                attrs,
                self_closing: true,
                type_args: None,
                span: DUMMY_SP,
            },
            children: vec![],
            closing: None,
        };

        Expr::Arrow(ArrowExpr {
            span: DUMMY_SP,
            ctxt: SyntaxContext::empty(),
            params: vec![Pat::Ident(BindingIdent {
                id: props,
                type_ann: None,
            })],
            body: Box::new(BlockStmtOrExpr::Expr(Box::new(Expr::JSXElement(Box::new(
                element,
            ))))),
            is_async: false,
            is_generator: false,
            type_params: None,
            return_type: None,
        })
    }
}

impl VisitMut for StyledRewriter<'_> {
    fn visit_mut_call_expr(&mut self, call: &mut CallExpr) {
        call.visit_mut_children_with(self);

        if !self.is_wrapper_call(call) {
            return;
        }
        let Some(component) = self.wrapped_component(call).cloned() else {
            return;
        };
        tracing::trace!(component = %component.sym, "rewriting styled wrapper argument");
        call.args[0].expr = Box::new(self.render_proxy(&component));
        self.rewritten += 1;
    }
}

#[cfg(test)]
mod tests {
    use crate::config::PluginConfig;
    use crate::testing::{elements, nth, parse, transform, transform_with};
    use crate::ComponentAnnotator;

    const FIXTURE: &str = r#"
import React from 'react';
import styled from '@emotion/styled';

const Button = ({ children, ...props }) => {
  return <button {...props}>{children}</button>;
};
const StyledButton = styled(Button);

const Card = (props) => (
  <div className="card"><h2>{props.title}</h2></div>
);
const StyledCard = styled(Card)`color: red;`;

const MyComponent = () => (
  <div>
    <h1>Styled</h1>
    <StyledButton>Click me</StyledButton>
    <StyledCard title="My Card" />
  </div>
);
"#;

    #[test]
    fn wraps_registered_components() {
        let out = elements(&transform(FIXTURE));

        assert_eq!(
            nth(&out, "button", 0).attrs,
            vec!["...", "data-component=Button", "data-source-file=test.jsx"]
        );
        assert_eq!(
            nth(&out, "Button", 0).attrs,
            vec!["data-element=Button", "data-source-file=test.jsx", "..."]
        );
        assert_eq!(
            nth(&out, "Card", 0).attrs,
            vec!["data-element=Card", "data-source-file=test.jsx", "..."]
        );
        assert_eq!(nth(&out, "div", 0).attr("data-component"), Some("Card"));
        assert_eq!(nth(&out, "div", 1).attr("data-component"), Some("MyComponent"));
        assert_eq!(
            nth(&out, "StyledButton", 0).attrs,
            vec!["data-element=StyledButton", "data-source-file=test.jsx"]
        );
        assert_eq!(
            nth(&out, "StyledCard", 0).attrs,
            vec!["title=My Card", "data-element=StyledCard", "data-source-file=test.jsx"]
        );
        assert!(nth(&out, "h1", 0).attrs.is_empty());
    }

    #[test]
    fn proxy_is_not_annotated_as_a_component() {
        let out = elements(&transform(FIXTURE));
        let proxy = nth(&out, "Button", 0);
        assert!(proxy.attr("data-component").is_none());
    }

    #[test]
    fn rewriting_twice_changes_nothing() {
        let mut module = transform(FIXTURE);
        let first = elements(&module);
        ComponentAnnotator::new(PluginConfig::default(), "test.jsx").annotate_module(&mut module);
        let second = elements(&module);
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.tag, b.tag);
            assert_eq!(a.attrs, b.attrs);
        }
    }

    #[test]
    fn other_arguments_are_left_alone() {
        let src = r#"
import styled from '@emotion/styled';
const Button = () => <button />;
const a = styled('div');
const b = styled(notAComponent);
const c = styled(Unknown);
const d = styled((p) => <Button {...p} />);
const e = styled(Button, { shouldForwardProp: () => true });
const f = wrap(Button);
"#;
        let out = elements(&transform(src));
        // Only the explicit arrow's element and the component root exist.
        assert_eq!(out.len(), 2);
        assert_eq!(nth(&out, "Button", 0).attrs, vec!["..."]);
    }

    #[test]
    fn ignored_components_are_not_wrapped() {
        let src = "import styled from 'styled-components';\nconst Box = () => <div />;\nconst S = styled(Box);";
        let config = PluginConfig {
            ignored_components: vec!["Box".into()],
            ..Default::default()
        };
        let out = elements(&transform_with(src, config));
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn lowercase_classes_are_not_wrapped() {
        let src = r#"
import { Component } from 'react';
import styled from 'styled-components';
class card extends Component { render() { return <div />; } }
const S = styled(card);
"#;
        let out = elements(&transform(src));
        assert_eq!(out.len(), 1);
        assert!(nth(&out, "div", 0).attrs.is_empty());
    }

    #[test]
    fn aliased_wrapper_import_and_disable_switch() {
        let src = "import css from '@emotion/styled';\nconst Box = () => <div />;\nconst S = css(Box);";
        let out = elements(&transform(src));
        assert_eq!(nth(&out, "Box", 0).attr("data-element"), Some("Box"));

        let disabled = PluginConfig {
            rewrite_styled: false,
            ..Default::default()
        };
        let out = elements(&transform_with(src, disabled));
        assert_eq!(out.len(), 1);

        // Parse-only sanity: the source itself has a single element.
        assert_eq!(elements(&parse(src)).len(), 1);
    }
}
