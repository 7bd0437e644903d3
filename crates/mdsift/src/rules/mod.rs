//! Rule system for the Markdown renderer.
//!
//! Rendering is an ordered predicate-table lookup: override rules first,
//! then the default GFM ruleset; the first filter that matches a node wins.
//! Both tables are built once per renderer and never mutated during a
//! conversion.

mod gfm;
mod overrides;
mod rule;

pub use gfm::default_rules;
pub use rule::{Context, Filter, FilterFn, ReplacementFn, Rule};

use indexmap::IndexMap;

use crate::node::Element;
use crate::render::RenderOptions;

/// The rule tables consulted for every element.
pub struct Rules {
    /// Override rules, in insertion order (checked first).
    overrides: IndexMap<String, Rule>,
    /// Default GFM rules.
    defaults: Vec<Rule>,
}

impl Rules {
    /// Build the standard tables: transparent inline containers and the
    /// flattening table renderer ahead of the GFM defaults.
    pub fn new() -> Self {
        let mut table = IndexMap::new();
        table.insert(
            "transparent-containers".to_string(),
            overrides::transparent_containers(),
        );
        table.insert("flatten-tables".to_string(), overrides::flatten_tables());

        Self {
            overrides: table,
            defaults: default_rules(),
        }
    }

    /// Add (or replace) an override rule. Later additions are checked after
    /// earlier ones but still before every default rule.
    pub fn add(&mut self, key: &str, rule: Rule) {
        self.overrides.insert(key.to_string(), rule);
    }

    /// Find the first rule matching a node, override-then-default order.
    pub fn for_node<'a>(
        &'a self,
        el: &Element,
        ctx: &Context,
        options: &RenderOptions,
    ) -> Option<&'a Rule> {
        self.overrides
            .values()
            .chain(self.defaults.iter())
            .find(|rule| rule.filter.matches(el, ctx, options))
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_win_over_defaults() {
        let rules = Rules::new();
        let options = RenderOptions::default();
        let ctx = Context::default();

        let table = Element::new("table");
        let rule = rules.for_node(&table, &ctx, &options).expect("table rule");
        assert!(rule.replace(&table, "ignored", &ctx, &options).is_empty());
    }

    #[test]
    fn test_added_rule_is_consulted() {
        let mut rules = Rules::new();
        rules.add(
            "shout",
            Rule::for_tag("marquee", |_, content, _, _| format!("{}!", content)),
        );
        let options = RenderOptions::default();
        let ctx = Context::default();

        let marquee = Element::new("marquee");
        let rule = rules.for_node(&marquee, &ctx, &options).expect("added rule");
        assert_eq!(rule.replace(&marquee, "hey", &ctx, &options), "hey!");
    }

    #[test]
    fn test_unknown_tag_has_no_rule() {
        let rules = Rules::new();
        let options = RenderOptions::default();
        let ctx = Context::default();
        assert!(rules
            .for_node(&Element::new("custom-widget"), &ctx, &options)
            .is_none());
    }
}
