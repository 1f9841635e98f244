//! Library context: loaded modules, schema, and options.

use serde::Deserialize;

use crate::error::TreeError;
use crate::schema::SchemaTree;

/// Internal module owning the reserved sorted-index attribute.
pub const YANG_MODULE: &str = "yang";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContextOptions {
    /// Load the internal `yang` module. Without it no sorted index can be
    /// anchored and system-ordered groups are kept sorted by linear search.
    pub yang_module: bool,
    /// Upper bound on index nodes per sibling group.
    pub index_node_limit: Option<usize>,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            yang_module: true,
            index_node_limit: None,
        }
    }
}

impl ContextOptions {
    pub fn from_json(input: &str) -> Result<Self, TreeError> {
        Ok(serde_json::from_str(input)?)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Module {
    pub name: String,
}

#[derive(Debug)]
pub struct Context {
    options: ContextOptions,
    modules: Vec<Module>,
    schema: SchemaTree,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    pub fn new() -> Self {
        Self::with_options(ContextOptions::default())
    }

    pub fn with_options(options: ContextOptions) -> Self {
        let mut modules = Vec::new();
        if options.yang_module {
            modules.push(Module {
                name: YANG_MODULE.to_string(),
            });
        }
        tracing::debug!(yang_module = options.yang_module, "context created");
        Self {
            options,
            modules,
            schema: SchemaTree::default(),
        }
    }

    pub fn options(&self) -> &ContextOptions {
        &self.options
    }

    /// Registers a module by name; loading the same name twice is a no-op.
    pub fn load_module(&mut self, name: &str) -> &Module {
        let pos = match self.modules.iter().position(|m| m.name == name) {
            Some(pos) => pos,
            None => {
                self.modules.push(Module {
                    name: name.to_string(),
                });
                self.modules.len() - 1
            }
        };
        &self.modules[pos]
    }

    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.name == name)
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn schema(&self) -> &SchemaTree {
        &self.schema
    }

    pub fn schema_mut(&mut self) -> &mut SchemaTree {
        &mut self.schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yang_module_follows_options() {
        assert!(Context::new().module(YANG_MODULE).is_some());
        let ctx = Context::with_options(ContextOptions {
            yang_module: false,
            ..ContextOptions::default()
        });
        assert!(ctx.module(YANG_MODULE).is_none());
    }

    #[test]
    fn options_parse_with_defaults() {
        let opts = ContextOptions::from_json(r#"{"index_node_limit": 8}"#).unwrap();
        assert!(opts.yang_module);
        assert_eq!(opts.index_node_limit, Some(8));
        assert!(ContextOptions::from_json(r#"{"bogus": 1}"#).is_err());
    }

    #[test]
    fn load_module_is_idempotent() {
        let mut ctx = Context::new();
        ctx.load_module("ietf-interfaces");
        ctx.load_module("ietf-interfaces");
        assert_eq!(ctx.modules().len(), 2);
    }
}
