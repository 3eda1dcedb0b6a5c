//! Per-network clean-up of upstream stop names.
//!
//! Upstream tagging is not always consistent within a network: the same
//! station may be spelled two ways, or carry qualifiers that should not
//! appear on the map. Rules are registered per network name and applied in
//! registration order before a name is normalised.

use std::collections::BTreeMap;

use super::{BERLIN_S_BAHN, PARIS_METRO};

/// A single text rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "rule", rename_all = "snake_case"))]
pub enum RewriteRule {
    /// Replace a name that matches `from` exactly.
    Rename {
        /// Name to replace.
        from: String,
        /// Replacement.
        to: String,
    },
    /// Delete every occurrence of `text`.
    Remove {
        /// Text to delete.
        text: String,
    },
    /// Delete `prefix` from the start of the name.
    StripPrefix {
        /// Leading text to delete.
        prefix: String,
    },
    /// Delete a final ` (…)` qualifier without nested parentheses.
    StripTrailingParenthetical,
}

impl RewriteRule {
    /// Apply the rule to `name`.
    ///
    /// # Examples
    /// ```
    /// use metromap_core::RewriteRule;
    ///
    /// let rule = RewriteRule::StripTrailingParenthetical;
    /// assert_eq!(rule.apply("Westend (Berlin)"), "Westend");
    /// assert_eq!(rule.apply("Westend"), "Westend");
    /// ```
    #[must_use]
    pub fn apply(&self, name: &str) -> String {
        match self {
            Self::Rename { from, to } if name == from.as_str() => to.clone(),
            Self::Rename { .. } => name.to_owned(),
            Self::Remove { text } if text.is_empty() => name.to_owned(),
            Self::Remove { text } => name.replace(text.as_str(), ""),
            Self::StripPrefix { prefix } => {
                name.strip_prefix(prefix.as_str()).unwrap_or(name).to_owned()
            }
            Self::StripTrailingParenthetical => strip_trailing_parenthetical(name).to_owned(),
        }
    }
}

fn strip_trailing_parenthetical(name: &str) -> &str {
    let Some(body) = name.strip_suffix(')') else {
        return name;
    };
    let Some((head, inner)) = body.rsplit_once('(') else {
        return name;
    };
    if inner.contains(')') {
        return name;
    }
    head.strip_suffix(' ').unwrap_or(name)
}

/// Registry of rewrite rules keyed by network name.
///
/// # Examples
/// ```
/// use metromap_core::NameRewrites;
///
/// let rewrites = NameRewrites::builtin();
/// assert_eq!(
///     rewrites.apply("S-Bahnlinien in Berlin", "S Westkreuz (Berlin)"),
///     "Westkreuz"
/// );
/// assert_eq!(rewrites.apply("Other", "S Westkreuz"), "S Westkreuz");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct NameRewrites {
    rules: BTreeMap<String, Vec<RewriteRule>>,
}

impl NameRewrites {
    /// Clean-ups for the networks whose upstream names are known to need
    /// them.
    #[must_use]
    pub fn builtin() -> Self {
        let mut rewrites = Self::default();
        rewrites.register(
            PARIS_METRO,
            RewriteRule::Rename {
                from: "Réaumur Sébastopol".to_owned(),
                to: "Réaumur - Sébastopol".to_owned(),
            },
        );
        rewrites.register(
            PARIS_METRO,
            RewriteRule::Rename {
                from: "Saint-Denis-Université".to_owned(),
                to: "Saint-Denis - Université".to_owned(),
            },
        );
        rewrites.register(
            PARIS_METRO,
            RewriteRule::Remove {
                text: " (Hopital Henri Mondor)".to_owned(),
            },
        );
        rewrites.register(
            BERLIN_S_BAHN,
            RewriteRule::StripPrefix {
                prefix: "S ".to_owned(),
            },
        );
        rewrites.register(BERLIN_S_BAHN, RewriteRule::StripTrailingParenthetical);
        rewrites
    }

    /// Append `rule` to the rules of `network`.
    pub fn register(&mut self, network: impl Into<String>, rule: RewriteRule) {
        self.rules.entry(network.into()).or_default().push(rule);
    }

    /// Append every rule of `other` after the existing rules.
    pub fn extend(&mut self, other: Self) {
        for (network, rules) in other.rules {
            self.rules.entry(network).or_default().extend(rules);
        }
    }

    /// Rules registered for `network`, in application order.
    #[must_use]
    pub fn rules_for(&self, network: &str) -> &[RewriteRule] {
        self.rules.get(network).map_or(&[], Vec::as_slice)
    }

    /// Rewrite `name` with the rules of `network`.
    #[must_use]
    pub fn apply(&self, network: &str, name: &str) -> String {
        self.rules_for(network)
            .iter()
            .fold(name.to_owned(), |current, rule| rule.apply(&current))
    }
}
