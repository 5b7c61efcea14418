//! Region grammars for the delimiter-based dialects
//!
//! Each dialect is a table of `(area type, start pattern, end pattern)` rows plus the leaf kind
//! given to text outside any region. Rows are data, not code: the [engine](super::engine) walks
//! whichever table it is handed.
//!
//! Order matters: when two start patterns match at the same offset the earlier row wins, so
//! `(** $$` is tried as math before `(** ` is tried as text. A start pattern may capture a
//! `title` group; it becomes the title of a collapsible.
//!
//! Every pattern accepts `\r\n` where the canonical serialization writes `\n`.

use crate::flow::ast::area::{AreaType, LeafKind};
use once_cell::sync::Lazy;
use regex::Regex;

/// One region kind of a dialect
#[derive(Debug)]
pub struct RegionRule {
    pub area_type: AreaType,
    pub start: Regex,
    pub end: Regex,
}

#[derive(Debug)]
pub struct Grammar {
    pub name: &'static str,
    /// Kind of the text between regions
    pub default_kind: LeafKind,
    pub rules: Vec<RegionRule>,
}

impl Grammar {
    fn compile(
        name: &'static str,
        default_kind: LeafKind,
        patterns: &[(AreaType, &str, &str)],
    ) -> Self {
        let rules = patterns
            .iter()
            .map(|(area_type, start, end)| RegionRule {
                area_type: *area_type,
                start: Regex::new(start).unwrap(),
                end: Regex::new(end).unwrap(),
            })
            .collect();
        Self {
            name,
            default_kind,
            rules,
        }
    }
}

/// Coq source: prose in `(** *)` comments, everything else is code
const COQ_PATTERNS: &[(AreaType, &str, &str)] = &[
    (AreaType::Math, r"\(\*\* \$\$", r"\$\$ \*\)"),
    (AreaType::Text, r"\(\*\* ", r" \*\)"),
    (
        AreaType::Collapsible,
        r"\(\* begin details(?: : (?P<title>[^\r\n]*?))? \*\)",
        r"\(\* end details \*\)",
    ),
    (
        AreaType::Input,
        r"\(\* begin input \*\)",
        r"\(\* end input \*\)",
    ),
];

/// Markdown with fenced Coq blocks and tag-like containers, everything else is prose
const COQMD_PATTERNS: &[(AreaType, &str, &str)] = &[
    (AreaType::Code, r"\r?\n?```coq[ \t]*\r?\n", r"\r?\n```(?:\r?\n)?"),
    (AreaType::Math, r"\$\$", r"\$\$"),
    (
        AreaType::Collapsible,
        r#"<hint(?:\s+title="(?P<title>[^"]*)")?\s*>"#,
        r"</hint>",
    ),
    (AreaType::Input, r"<input-area>", r"</input-area>"),
];

/// Plain Lean source: prose in `/-! -/` module docs, everything else is code
const PURE_LEAN_PATTERNS: &[(AreaType, &str, &str)] = &[
    (AreaType::Math, r"/-! \$\$", r"\$\$ -/"),
    (AreaType::Text, r"/-! ", r" -/"),
    (
        AreaType::Collapsible,
        r"/- begin details(?: : (?P<title>[^\r\n]*?))? -/",
        r"/- end details -/",
    ),
    (AreaType::Input, r"/- begin input -/", r"/- end input -/"),
];

pub static COQ: Lazy<Grammar> =
    Lazy::new(|| Grammar::compile("coq", LeafKind::Code, COQ_PATTERNS));

pub static COQMD: Lazy<Grammar> =
    Lazy::new(|| Grammar::compile("coqmd", LeafKind::Text, COQMD_PATTERNS));

pub static PURE_LEAN: Lazy<Grammar> =
    Lazy::new(|| Grammar::compile("pure-lean", LeafKind::Code, PURE_LEAN_PATTERNS));
