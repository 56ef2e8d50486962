//! Layer folding into an effective configuration

use crate::block::{EffectiveConfig, ResolvedRule};
use crate::error::ResolutionError;
use crate::store::LayerStore;
use std::path::Path;

/// Fold all layers applicable to `path`, in store order, into one
/// [`EffectiveConfig`].
///
/// Dedicated ignore lists are checked ahead of everything else and
/// short-circuit to [`ResolutionError::Ignored`] wherever they sit in the
/// store. An exclude match on any other layer withdraws the path as well.
/// Covered layers merge their maps last-writer-wins per key; rule severities
/// are validated as they are merged, never coerced.
pub fn fold(store: &LayerStore, path: &Path) -> Result<EffectiveConfig, ResolutionError> {
    for layer in store.layers() {
        if layer.is_ignore_only() && layer.excludes(path) {
            return Err(ResolutionError::Ignored);
        }
    }

    let mut effective = EffectiveConfig::default();
    let mut covered = false;

    for (block_index, layer) in store.layers().iter().enumerate() {
        if layer.is_ignore_only() {
            continue;
        }
        if layer.excludes(path) {
            return Err(ResolutionError::Ignored);
        }
        if !layer.covers(path) {
            continue;
        }
        covered = true;

        let block = layer.block();
        for (key, value) in &block.language_options {
            effective
                .language_options
                .insert(key.clone(), value.clone());
        }
        for (name, plugin) in &block.plugins {
            effective.plugins.insert(name.clone(), plugin.clone());
        }
        for (name, setting) in &block.rules {
            let severity = setting.level().ok_or_else(|| ResolutionError::Validation {
                rule: name.clone(),
                block_index,
                message: format!("unknown severity '{}'", setting.severity),
            })?;
            effective.rules.insert(
                name.clone(),
                ResolvedRule {
                    severity,
                    options: setting.options.clone(),
                },
            );
        }
    }

    if !covered {
        return Err(ResolutionError::NoApplicableLayer);
    }
    Ok(effective)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{ConfigBlock, RuleSetting, Severity};
    use serde_json::json;

    fn store_of(blocks: Vec<ConfigBlock>) -> LayerStore {
        let mut store = LayerStore::new();
        for block in blocks {
            store.append(block).unwrap();
        }
        store.seal();
        store
    }

    fn rule_block(include: &[&str], rules: &[(&str, RuleSetting)]) -> ConfigBlock {
        let mut block = ConfigBlock {
            include: include.iter().map(|s| s.to_string()).collect(),
            ..ConfigBlock::default()
        };
        for (name, setting) in rules {
            block.rules.insert(name.to_string(), setting.clone());
        }
        block
    }

    #[test]
    fn test_later_layer_wins_per_key() {
        let store = store_of(vec![
            rule_block(&[], &[("semi", RuleSetting::warn())]),
            rule_block(&["**/*.ts"], &[("semi", RuleSetting::error())]),
        ]);

        let effective = fold(&store, Path::new("a.ts")).unwrap();
        assert_eq!(effective.rules["semi"].severity, Severity::Error);

        // The later layer does not cover .js, so the earlier setting stands
        let effective = fold(&store, Path::new("a.js")).unwrap();
        assert_eq!(effective.rules["semi"].severity, Severity::Warn);
    }

    #[test]
    fn test_options_replaced_not_merged() {
        let store = store_of(vec![
            rule_block(
                &[],
                &[("max-len", RuleSetting::warn_with([json!({"code": 120})]))],
            ),
            rule_block(
                &[],
                &[("max-len", RuleSetting::error_with([json!({"tabs": 2})]))],
            ),
        ]);

        let effective = fold(&store, Path::new("a.js")).unwrap();
        let rule = &effective.rules["max-len"];
        assert_eq!(rule.severity, Severity::Error);
        // Full replacement: the earlier "code" option payload is gone
        assert_eq!(rule.options, vec![json!({"tabs": 2})]);
    }

    #[test]
    fn test_off_entry_is_kept() {
        let store = store_of(vec![
            rule_block(&[], &[("no-console", RuleSetting::warn())]),
            rule_block(&[], &[("no-console", RuleSetting::off())]),
        ]);

        let effective = fold(&store, Path::new("a.js")).unwrap();
        assert_eq!(effective.rules["no-console"].severity, Severity::Off);
        assert_eq!(effective.enabled_rules().count(), 0);
    }

    #[test]
    fn test_ignore_only_layer_short_circuits_regardless_of_position() {
        // Ignore block appended last still vetoes layers appended before it
        let store = store_of(vec![
            rule_block(&[], &[("semi", RuleSetting::warn())]),
            ConfigBlock::ignore(["dist/**"]),
        ]);

        assert_eq!(
            fold(&store, Path::new("dist/out.js")),
            Err(ResolutionError::Ignored)
        );
        assert!(fold(&store, Path::new("src/out.js")).is_ok());
    }

    #[test]
    fn test_exclude_on_rule_layer_withdraws_path() {
        let mut block = rule_block(&["**/*.ts"], &[("semi", RuleSetting::error())]);
        block.exclude = vec!["**/*.d.ts".to_string()];
        let store = store_of(vec![rule_block(&[], &[("semi", RuleSetting::warn())]), block]);

        assert_eq!(
            fold(&store, Path::new("types.d.ts")),
            Err(ResolutionError::Ignored)
        );
        assert!(fold(&store, Path::new("main.ts")).is_ok());
    }

    #[test]
    fn test_no_applicable_layer() {
        let store = store_of(vec![rule_block(
            &["**/*.js"],
            &[("semi", RuleSetting::error())],
        )]);
        assert_eq!(
            fold(&store, Path::new("main.py")),
            Err(ResolutionError::NoApplicableLayer)
        );
    }

    #[test]
    fn test_empty_store_has_no_applicable_layer() {
        let store = store_of(Vec::new());
        assert_eq!(
            fold(&store, Path::new("main.js")),
            Err(ResolutionError::NoApplicableLayer)
        );
    }

    #[test]
    fn test_malformed_severity_names_rule_and_layer() {
        let bad = RuleSetting {
            severity: "fatal".to_string(),
            options: Vec::new(),
        };
        let store = store_of(vec![
            rule_block(&[], &[("semi", RuleSetting::warn())]),
            rule_block(&[], &[("quotes", bad)]),
        ]);

        match fold(&store, Path::new("a.js")) {
            Err(ResolutionError::Validation {
                rule,
                block_index,
                message,
            }) => {
                assert_eq!(rule, "quotes");
                assert_eq!(block_index, 1);
                assert!(message.contains("fatal"));
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_rule_in_uncovered_layer_is_inert() {
        let bad = RuleSetting {
            severity: "fatal".to_string(),
            options: Vec::new(),
        };
        let store = store_of(vec![
            rule_block(&["**/*.js"], &[("semi", RuleSetting::warn())]),
            rule_block(&["**/*.ts"], &[("quotes", bad)]),
        ]);

        // The malformed layer never covers .js paths
        assert!(fold(&store, Path::new("a.js")).is_ok());
        assert!(matches!(
            fold(&store, Path::new("a.ts")),
            Err(ResolutionError::Validation { .. })
        ));
    }

    #[test]
    fn test_language_options_and_plugins_last_writer_wins() {
        use crate::block::PluginRef;

        let mut first = rule_block(&[], &[]);
        first
            .language_options
            .insert("ecmaVersion".to_string(), json!(2020));
        first
            .plugins
            .insert("import".to_string(), PluginRef::new("v1"));

        let mut second = rule_block(&[], &[]);
        second
            .language_options
            .insert("ecmaVersion".to_string(), json!("latest"));
        second
            .language_options
            .insert("sourceType".to_string(), json!("module"));
        second
            .plugins
            .insert("import".to_string(), PluginRef::new("v2"));

        let store = store_of(vec![first, second]);
        let effective = fold(&store, Path::new("a.js")).unwrap();

        assert_eq!(effective.language_options["ecmaVersion"], json!("latest"));
        assert_eq!(effective.language_options["sourceType"], json!("module"));
        assert_eq!(effective.plugins["import"], PluginRef::new("v2"));
    }

    #[test]
    fn test_fold_is_deterministic() {
        let store = store_of(vec![
            rule_block(
                &[],
                &[
                    ("semi", RuleSetting::error()),
                    ("quotes", RuleSetting::warn_with([json!("single")])),
                ],
            ),
            rule_block(&["**/*.ts"], &[("no-shadow", RuleSetting::error())]),
        ]);

        let first = fold(&store, Path::new("a.ts")).unwrap();
        let second = fold(&store, Path::new("a.ts")).unwrap();
        assert_eq!(first, second);

        // Iteration order follows the store sequence, not hash order
        let keys: Vec<&str> = first.rules.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["semi", "quotes", "no-shadow"]);
    }

    #[test]
    fn test_duplicate_append_is_idempotent() {
        let block = rule_block(
            &[],
            &[("semi", RuleSetting::error_with([json!("always")]))],
        );
        let once = store_of(vec![block.clone()]);
        let twice = store_of(vec![block.clone(), block]);

        assert_eq!(
            fold(&once, Path::new("a.js")).unwrap(),
            fold(&twice, Path::new("a.js")).unwrap()
        );
    }
}
