//! Direct-edit rule engine.
//!
//! An ordered list of plain (trigger, effect) records evaluated
//! independently against the user's instruction. Triggers are
//! case-insensitive substring matches; effects are overwrite-style, so
//! applying the same instruction twice lands in the same state. No
//! trigger matching is a silent no-op, not an error.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use retouch_dom::{Document, NodeId};

/// `pon "…"` / `poner "…"` / `texto "…"`: the quoted capture becomes
/// the node's text content.
static QUOTED_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)(?:pon|poner|texto)\s+"([^"]*)""#).expect("valid regex"));

/// Color names recognized by the color rule, mapped to CSS values.
const NAMED_COLORS: [(&str, &str); 14] = [
    ("rojo", "red"),
    ("red", "red"),
    ("azul", "blue"),
    ("blue", "blue"),
    ("verde", "green"),
    ("green", "green"),
    ("amarillo", "yellow"),
    ("yellow", "yellow"),
    ("naranja", "orange"),
    ("orange", "orange"),
    ("negro", "black"),
    ("black", "black"),
    ("blanco", "white"),
    ("white", "white"),
];

/// What fires a rule.
#[derive(Debug, Clone, Copy)]
pub enum Trigger {
    /// Any of these substrings appears in the lowercased instruction.
    Keyword(&'static [&'static str]),
    /// The quoted-text pattern matches.
    QuotedText,
}

/// What a fired rule does to the node.
#[derive(Debug, Clone, Copy)]
pub enum Effect {
    /// Set the text color to the first color name found in the
    /// instruction.
    NamedColor,
    /// Overwrite one style property with a fixed value.
    SetStyle {
        property: &'static str,
        value: &'static str,
    },
    /// Replace the node's text content with the quoted capture.
    ReplaceText,
}

/// One direct-edit rule.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub trigger: Trigger,
    pub effect: Effect,
}

const RULES: [Rule; 4] = [
    Rule {
        name: "color",
        trigger: Trigger::Keyword(&[
            "color", "colour", "rojo", "red", "azul", "blue", "verde", "green", "amarillo",
            "yellow", "naranja", "orange", "negro", "black", "blanco", "white",
        ]),
        effect: Effect::NamedColor,
    },
    Rule {
        name: "size",
        trigger: Trigger::Keyword(&["grande", "bigger", "larger", "enlarge", "agranda"]),
        effect: Effect::SetStyle {
            property: "font-size",
            value: "1.5em",
        },
    },
    Rule {
        name: "hide",
        trigger: Trigger::Keyword(&["hide", "oculta", "ocultar", "esconde"]),
        effect: Effect::SetStyle {
            property: "display",
            value: "none",
        },
    },
    Rule {
        name: "text",
        trigger: Trigger::QuotedText,
        effect: Effect::ReplaceText,
    },
];

/// The built-in rule list, in evaluation order.
pub fn default_rules() -> &'static [Rule] {
    &RULES
}

/// Evaluate every rule against `instruction` and apply the ones that
/// fire to `node`. Rules stack within one instruction. Returns the
/// names of the rules that mutated the node.
pub fn apply_rules(doc: &mut Document, node: NodeId, instruction: &str) -> Vec<&'static str> {
    let lowercase = instruction.to_lowercase();
    let mut applied = Vec::new();

    for rule in default_rules() {
        let fired = match rule.trigger {
            Trigger::Keyword(words) => words.iter().any(|w| lowercase.contains(w)),
            Trigger::QuotedText => QUOTED_TEXT.is_match(instruction),
        };
        if !fired {
            continue;
        }
        let mutated = match rule.effect {
            Effect::SetStyle { property, value } => {
                doc.set_style_property(node, property, value);
                true
            }
            Effect::NamedColor => match first_named_color(&lowercase) {
                Some(color) => {
                    doc.set_style_property(node, "color", color);
                    true
                }
                None => false,
            },
            Effect::ReplaceText => match QUOTED_TEXT.captures(instruction) {
                Some(capture) => {
                    doc.set_text_content(node, &capture[1]);
                    true
                }
                None => false,
            },
        };
        if mutated {
            debug!(rule = rule.name, "direct-edit rule applied");
            applied.push(rule.name);
        }
    }
    applied
}

/// First color name occurring in the lowercased instruction.
fn first_named_color(lowercase: &str) -> Option<&'static str> {
    NAMED_COLORS
        .iter()
        .filter_map(|(word, value)| lowercase.find(word).map(|at| (at, *value)))
        .min_by_key(|(at, _)| *at)
        .map(|(_, value)| value)
}

#[cfg(test)]
#[path = "rules_tests.rs"]
mod tests;
