//! Treeviz formatter for area trees
//!
//! Treeviz is a one line per area view of a document, for quick inspection of what a parser or
//! the extractor produced. Nesting is drawn with connectors:
//!
//! <prefix><connector> <icon> <label> (label truncated to 30 characters)
//!
//! Example:
//!
//!   ⧉ file:///samples/naturals.mv
//!   ├─ ¶ # Natural numbers⏎⏎Addition is...
//!   ├─ ƒ Theorem plus_0 : forall n, n + ...
//!   ├─ ⊟ Hint
//!   │ ├─ ¶ ⏎Use induction on `n`.
//!   │ └─ ƒ induction n.
//!   └─ ✎ unattempted
//!     └─ ƒ Proof.⏎  intros n.⏎Admitted.
//!
//! Icons
//!     Document: ⧉
//!     Text: ¶
//!     Code: ƒ
//!     Math: √
//!     Collapsible: ⊟
//!     Input: ✎
//!
//! Newlines inside labels are shown as ⏎. With the `show-ranges` parameter every line is prefixed
//! with the area's range in the serialized document, when one has been computed.

use crate::error::FormatError;
use crate::format::Format;
use proofflow_parser::flow::ast::{Area, AreaType, LeafArea, ProofFlowDocument, Range};
use std::collections::HashMap;

const LABEL_WIDTH: usize = 30;

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

fn get_icon(area_type: AreaType) -> &'static str {
    match area_type {
        AreaType::Text => "¶",
        AreaType::Code => "ƒ",
        AreaType::Math => "√",
        AreaType::Collapsible => "⊟",
        AreaType::Input => "✎",
    }
}

fn label(area: &Area) -> String {
    let raw = match area {
        Area::Input(input) => format!("{:?}", input.status()).to_lowercase(),
        Area::Collapsible(collapsible) if collapsible.title().is_empty() => "(untitled)".into(),
        _ => area.content().to_string(),
    };
    truncate(&raw.replace('\n', "⏎"), LABEL_WIDTH)
}

fn range_prefix(range: Option<&Range>, show_ranges: bool) -> String {
    match (show_ranges, range) {
        (false, _) => String::new(),
        (true, Some(range)) => format!("{:<12} ", range.to_string()),
        (true, None) => format!("{:<12} ", "-"),
    }
}

fn format_line(
    output: &mut String,
    prefix: &str,
    is_last: bool,
    icon: &str,
    label: &str,
    range: Option<&Range>,
    show_ranges: bool,
) {
    let connector = if is_last { "└─" } else { "├─" };
    output.push_str(&format!(
        "{}{}{} {} {}\n",
        range_prefix(range, show_ranges),
        prefix,
        connector,
        icon,
        label
    ));
}

fn format_children(output: &mut String, children: &[LeafArea], prefix: &str, show_ranges: bool) {
    for (i, child) in children.iter().enumerate() {
        let content = truncate(&child.content().replace('\n', "⏎"), LABEL_WIDTH);
        format_line(
            output,
            prefix,
            i == children.len() - 1,
            get_icon(child.kind().into()),
            &content,
            child.range(),
            show_ranges,
        );
    }
}

pub fn to_treeviz_str(doc: &ProofFlowDocument) -> String {
    to_treeviz_str_with_params(doc, &HashMap::new())
}

pub fn to_treeviz_str_with_params(
    doc: &ProofFlowDocument,
    params: &HashMap<String, String>,
) -> String {
    let show_ranges = params
        .get("show-ranges")
        .map(|v| v != "false")
        .unwrap_or(false);

    let mut output = format!("{}⧉ {}\n", range_prefix(None, show_ranges), doc.uri());
    let count = doc.areas().len();
    for (i, area) in doc.areas().iter().enumerate() {
        let is_last = i == count - 1;
        format_line(
            &mut output,
            "",
            is_last,
            get_icon(area.area_type()),
            &label(area),
            area.range(),
            show_ranges,
        );
        let child_prefix = if is_last { "  " } else { "│ " };
        format_children(&mut output, area.children(), child_prefix, show_ranges);
    }
    output
}

/// Format implementation for the treeviz view
pub struct TreevizFormat;

impl Format for TreevizFormat {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn description(&self) -> &str {
        "Visual tree representation with indentation and Unicode icons"
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(&self, doc: &ProofFlowDocument) -> Result<String, FormatError> {
        Ok(to_treeviz_str(doc))
    }
}
