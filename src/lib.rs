use std::collections::HashSet;

use swc_core::{
    ecma::{
        ast::*,
        visit::{VisitMut, VisitMutWith},
    },
    plugin::{
        metadata::TransformPluginMetadataContextKind, plugin_transform,
        proxies::TransformPluginProgramMetadata,
    },
};

pub mod annotate;
pub mod attrs;
pub mod config;
pub mod filename;
pub mod registry;
pub mod styled;
pub mod tags;

#[cfg(test)]
mod testing;

use annotate::Annotator;
use config::{AttrKeys, PluginConfig};
use registry::{collect_components, TopLevelItem};
use styled::StyledRewriter;
use tags::FrameworkSymbols;

// -----------------------------------------------------------------------------
// Per-file context
// -----------------------------------------------------------------------------

/// What the engine knows about the file it is transforming.
#[derive(Debug, Clone)]
pub struct SourceContext {
    pub file_id: String,
    pub ignored_names: HashSet<String>,
}

impl SourceContext {
    pub fn new(file_id: impl Into<String>, ignored_names: HashSet<String>) -> Self {
        Self {
            file_id: file_id.into(),
            ignored_names,
        }
    }

    #[inline]
    pub fn is_ignored(&self, component_name: &str) -> bool {
        self.ignored_names.contains(component_name)
    }
}

// -----------------------------------------------------------------------------
// Transform
// -----------------------------------------------------------------------------

pub struct ComponentAnnotator {
    ctx: SourceContext,
    keys: AttrKeys,
    rewrite_styled: bool,
    styled_sources: Vec<String>,
}

impl ComponentAnnotator {
    /// `file_name` is the host's name for the file; only its last segment (or
    /// `dir/index.*`) ends up in the source-file attribute.
    pub fn new(config: PluginConfig, file_name: &str) -> Self {
        let keys = config.attr_keys();
        let ignored = config.ignored_components.into_iter().collect();
        Self {
            ctx: SourceContext::new(filename::source_file_id(file_name), ignored),
            keys,
            rewrite_styled: config.rewrite_styled,
            styled_sources: config.styled_sources,
        }
    }

    pub fn context(&self) -> &SourceContext {
        &self.ctx
    }

    /// Annotate every eligible component in `module`, then rewrite styling
    /// wrapper calls around them.
    pub fn annotate_module(&self, module: &mut Module) {
        let pass = self.annotate_items(&mut module.body);
        let rewritten = self.rewrite_wrappers(&pass, |rewriter| module.visit_mut_with(rewriter));
        self.summarize(&pass, rewritten, "annotated module");
    }

    /// Same as [`Self::annotate_module`] for input parsed without module scope.
    pub fn annotate_script(&self, script: &mut Script) {
        let pass = self.annotate_items(&mut script.body);
        let rewritten = self.rewrite_wrappers(&pass, |rewriter| script.visit_mut_with(rewriter));
        self.summarize(&pass, rewritten, "annotated script");
    }

    fn annotate_items<T: TopLevelItem>(&self, items: &mut [T]) -> AnnotationPass {
        let symbols = FrameworkSymbols::collect(items, &self.styled_sources);

        let mut eligible = HashSet::new();
        let mut skipped = 0;
        for entry in collect_components(items, &symbols, &self.ctx) {
            if !entry.eligible {
                tracing::trace!(component = %entry.name, "ignored component left untouched");
                skipped += 1;
                continue;
            }
            Annotator {
                symbols: &symbols,
                keys: &self.keys,
                ctx: &self.ctx,
                component: &entry.name,
            }
            .annotate(entry.body);
            eligible.insert(entry.name);
        }

        AnnotationPass {
            symbols,
            eligible,
            skipped,
        }
    }

    fn rewrite_wrappers(&self, pass: &AnnotationPass, run: impl FnOnce(&mut StyledRewriter<'_>)) -> usize {
        if !self.rewrite_styled || pass.eligible.is_empty() {
            return 0;
        }
        let mut rewriter = StyledRewriter {
            symbols: &pass.symbols,
            keys: &self.keys,
            file_id: &self.ctx.file_id,
            components: &pass.eligible,
            rewritten: 0,
        };
        run(&mut rewriter);
        rewriter.rewritten
    }

    fn summarize(&self, pass: &AnnotationPass, rewritten: usize, message: &str) {
        tracing::debug!(
            file = %self.ctx.file_id,
            annotated = pass.eligible.len(),
            skipped = pass.skipped,
            rewritten,
            "{message}"
        );
    }
}

struct AnnotationPass {
    symbols: FrameworkSymbols,
    eligible: HashSet<String>,
    skipped: usize,
}

impl VisitMut for ComponentAnnotator {
    fn visit_mut_module(&mut self, module: &mut Module) {
        self.annotate_module(module);
    }

    fn visit_mut_script(&mut self, script: &mut Script) {
        self.annotate_script(script);
    }
}

// -----------------------------------------------------------------------------
// Entrypoint
// -----------------------------------------------------------------------------

fn load_config(metadata: &TransformPluginProgramMetadata) -> PluginConfig {
    let Some(raw) = metadata.get_transform_plugin_config() else {
        return PluginConfig::default();
    };
    PluginConfig::from_json(&raw).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "invalid plugin config, using defaults");
        PluginConfig::default()
    })
}

#[plugin_transform]
pub fn process_transform(mut program: Program, metadata: TransformPluginProgramMetadata) -> Program {
    let config = load_config(&metadata);
    let filename = metadata
        .get_context(&TransformPluginMetadataContextKind::Filename)
        .unwrap_or_else(|| "unknown".to_string());

    let mut annotator = ComponentAnnotator::new(config, &filename);
    program.visit_mut_with(&mut annotator);
    program
}
