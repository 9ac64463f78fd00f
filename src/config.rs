use regex::Regex;
use serde::{Deserialize, Serialize};

// JSX attribute names: identifier start, then identifier chars, dashes, dots or colons.
const ATTR_NAME_PATTERN: &str = r"^[A-Za-z_$][A-Za-z0-9_$.:-]*$";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid plugin config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("attribute name pattern failed to compile: {0}")]
    Pattern(#[from] regex::Error),

    /// An override key is empty or not a valid JSX attribute name.
    #[error("`{option}` is not a valid JSX attribute name: {value:?}")]
    InvalidAttrName { option: &'static str, value: String },

    #[error("source file attribute `{0}` collides with an identity attribute")]
    ConflictingAttrNames(String),
}

/// Which family of reserved attribute keys a deployment emits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttrConvention {
    /// `data-component`, `data-element`, `data-source-file`
    #[default]
    Plain,
    /// `data-sentry-component`, `data-sentry-element`, `data-sentry-source-file`
    Sentry,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    #[serde(rename = "attr-convention")]
    pub convention: AttrConvention,

    /// Use React Native attribute names (camelCase) instead of web attributes (kebab-case)
    pub native: bool,

    /// Component names whose bodies are never annotated
    #[serde(rename = "ignored-components")]
    pub ignored_components: Vec<String>,

    #[serde(rename = "component-attr")]
    pub component_attr: Option<String>,

    #[serde(rename = "element-attr")]
    pub element_attr: Option<String>,

    #[serde(rename = "source-file-attr")]
    pub source_file_attr: Option<String>,

    /// Rewrite `styled(Component)` arguments into self-annotating render functions
    #[serde(rename = "rewrite-styled")]
    pub rewrite_styled: bool,

    /// Modules whose default export is a styling wrapper
    #[serde(rename = "styled-sources")]
    pub styled_sources: Vec<String>,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            convention: AttrConvention::Plain,
            native: false,
            ignored_components: vec![],
            component_attr: None,
            element_attr: None,
            source_file_attr: None,
            rewrite_styled: true,
            styled_sources: vec!["@emotion/styled".into(), "styled-components".into()],
        }
    }
}

/// The three reserved keys, resolved once per file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrKeys {
    pub component: String,
    pub element: String,
    pub source_file: String,
}

impl PluginConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: PluginConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let pattern = Regex::new(ATTR_NAME_PATTERN)?;
        let overrides = [
            ("component-attr", &self.component_attr),
            ("element-attr", &self.element_attr),
            ("source-file-attr", &self.source_file_attr),
        ];
        for (option, value) in overrides {
            if let Some(value) = value {
                if !pattern.is_match(value) {
                    return Err(ConfigError::InvalidAttrName {
                        option,
                        value: value.clone(),
                    });
                }
            }
        }

        // Root elements carry component + source file, nested references carry
        // element + source file, so only the source file key must stay distinct.
        let keys = self.attr_keys();
        if keys.source_file == keys.component || keys.source_file == keys.element {
            return Err(ConfigError::ConflictingAttrNames(keys.source_file));
        }
        Ok(())
    }

    pub fn attr_keys(&self) -> AttrKeys {
        let (component, element, source_file) = match (self.convention, self.native) {
            (AttrConvention::Plain, false) => ("data-component", "data-element", "data-source-file"),
            (AttrConvention::Plain, true) => ("dataComponent", "dataElement", "dataSourceFile"),
            (AttrConvention::Sentry, false) => (
                "data-sentry-component",
                "data-sentry-element",
                "data-sentry-source-file",
            ),
            (AttrConvention::Sentry, true) => (
                "dataSentryComponent",
                "dataSentryElement",
                "dataSentrySourceFile",
            ),
        };
        AttrKeys {
            component: self.component_attr.as_deref().unwrap_or(component).to_string(),
            element: self.element_attr.as_deref().unwrap_or(element).to_string(),
            source_file: self.source_file_attr.as_deref().unwrap_or(source_file).to_string(),
        }
    }
}
