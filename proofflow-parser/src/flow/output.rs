//! Output grammars
//!
//!     An output grammar ([OutputConfig]) is the table of literal delimiters wrapped around each
//!     area type when a document is serialized. It is pure data: the serializer and the position
//!     mapper are the only consumers, and both must be handed the same table for the ranges they
//!     produce to line up.
//!
//!     Keys are the area type names plus the synthetic `collapsibletitle`, used for collapsible
//!     areas with a non-empty title. Its prefix contains the placeholder [TITLE_PLACEHOLDER],
//!     replaced by the title at serialization time.
//!
//! Canonical Grammars
//!
//!     | Grammar    | Text            | Code              | Math              | Containers                       |
//!     |------------|-----------------|-------------------|-------------------|----------------------------------|
//!     | coq        | `(** … *)`      | raw               | `(** $$ … $$ *)`  | `(* begin details : T *)` / input |
//!     | coqmd      | raw             | ```` ```coq ```` fences | `$$ … $$`   | `<hint title="T">` / `<input-area>` |
//!     | lean       | `:::text`       | `:::code`         | `:::math`         | `:::collapsible` + `# T` / `:::input` |
//!     | pure-lean  | `/-! … -/`      | raw               | `/-! $$ … $$ -/`  | `/- begin details : T -/` / input |

use super::ast::area::AreaType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Placeholder replaced by the collapsible title in `collapsibletitle.prefix`
pub const TITLE_PLACEHOLDER: &str = "TITLE";

/// Key of the titled-collapsible delimiters
pub const COLLAPSIBLE_TITLE_KEY: &str = "collapsibletitle";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Delimiters {
    pub prefix: String,
    pub suffix: String,
}

impl Delimiters {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }
}

/// Delimiters per area type for one surface syntax
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub text: Delimiters,
    pub code: Delimiters,
    pub math: Delimiters,
    pub collapsible: Delimiters,
    pub collapsibletitle: Delimiters,
    pub input: Delimiters,
}

impl OutputConfig {
    /// Coq source with prose in coqdoc comments
    pub fn coq() -> Self {
        Self {
            text: Delimiters::new("(** ", " *)"),
            code: Delimiters::new("", ""),
            math: Delimiters::new("(** $$", "$$ *)"),
            collapsible: Delimiters::new("(* begin details *)", "(* end details *)"),
            collapsibletitle: Delimiters::new(
                "(* begin details : TITLE *)",
                "(* end details *)",
            ),
            input: Delimiters::new("(* begin input *)", "(* end input *)"),
        }
    }

    /// Markdown with fenced Coq blocks
    pub fn coqmd() -> Self {
        Self {
            text: Delimiters::new("", ""),
            code: Delimiters::new("\n```coq\n", "\n```\n"),
            math: Delimiters::new("$$", "$$"),
            collapsible: Delimiters::new("<hint>", "</hint>"),
            collapsibletitle: Delimiters::new("<hint title=\"TITLE\">", "</hint>"),
            input: Delimiters::new("<input-area>", "</input-area>"),
        }
    }

    /// Lean block syntax
    pub fn lean() -> Self {
        Self {
            text: Delimiters::new(":::text\n", "\n:::\n"),
            code: Delimiters::new(":::code\n", "\n:::\n"),
            math: Delimiters::new(":::math\n", "\n:::\n"),
            collapsible: Delimiters::new(":::collapsible\n", ":::\n"),
            collapsibletitle: Delimiters::new(":::collapsible\n# TITLE\n", ":::\n"),
            input: Delimiters::new(":::input\n", ":::\n"),
        }
    }

    /// Plain Lean source with prose in module doc comments
    pub fn pure_lean() -> Self {
        Self {
            text: Delimiters::new("/-! ", " -/"),
            code: Delimiters::new("", ""),
            math: Delimiters::new("/-! $$", "$$ -/"),
            collapsible: Delimiters::new("/- begin details -/", "/- end details -/"),
            collapsibletitle: Delimiters::new(
                "/- begin details : TITLE -/",
                "/- end details -/",
            ),
            input: Delimiters::new("/- begin input -/", "/- end input -/"),
        }
    }

    /// Delimiters for an area type (the untitled pair for collapsibles)
    pub fn delimiters(&self, area_type: AreaType) -> &Delimiters {
        match area_type {
            AreaType::Text => &self.text,
            AreaType::Code => &self.code,
            AreaType::Math => &self.math,
            AreaType::Collapsible => &self.collapsible,
            AreaType::Input => &self.input,
        }
    }

    /// String-keyed lookup, accepting the area type names and `collapsibletitle`
    pub fn get(&self, key: &str) -> Option<&Delimiters> {
        match key {
            "text" => Some(&self.text),
            "code" => Some(&self.code),
            "math" => Some(&self.math),
            "collapsible" => Some(&self.collapsible),
            COLLAPSIBLE_TITLE_KEY => Some(&self.collapsibletitle),
            "input" => Some(&self.input),
            _ => None,
        }
    }

    /// Prefix opening a collapsible with `title`
    pub fn collapsible_prefix(&self, title: &str) -> String {
        if title.is_empty() {
            self.collapsible.prefix.clone()
        } else {
            self.collapsibletitle
                .prefix
                .replace(TITLE_PLACEHOLDER, title)
        }
    }

    /// Suffix closing a collapsible with `title`
    pub fn collapsible_suffix(&self, title: &str) -> &str {
        if title.is_empty() {
            &self.collapsible.suffix
        } else {
            &self.collapsibletitle.suffix
        }
    }

    pub fn for_file_type(file_type: FileType) -> Option<Self> {
        match file_type {
            FileType::Coq => Some(Self::coq()),
            FileType::CoqMD => Some(Self::coqmd()),
            FileType::Lean => Some(Self::lean()),
            FileType::Unknown => None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::coqmd()
    }
}

/// The dialect of an opened file; selects both the parser and the output grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileType {
    Coq,
    CoqMD,
    Lean,
    Unknown,
}

impl FileType {
    pub fn from_extension(extension: &str) -> Self {
        match extension.to_ascii_lowercase().as_str() {
            "v" => FileType::Coq,
            "mv" => FileType::CoqMD,
            "lean" => FileType::Lean,
            _ => FileType::Unknown,
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(FileType::Unknown)
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, FileType::Unknown)
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileType::Coq => "coq",
            FileType::CoqMD => "coqmd",
            FileType::Lean => "lean",
            FileType::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_keys() {
        let config = OutputConfig::coqmd();
        assert_eq!(config.get("code"), Some(&config.code));
        assert_eq!(
            config.get("collapsibletitle").map(|d| d.prefix.as_str()),
            Some("<hint title=\"TITLE\">")
        );
        assert!(config.get("paragraph").is_none());
    }

    #[test]
    fn test_collapsible_prefix_substitutes_title() {
        let config = OutputConfig::coq();
        assert_eq!(
            config.collapsible_prefix("Hint"),
            "(* begin details : Hint *)"
        );
        assert_eq!(config.collapsible_prefix(""), "(* begin details *)");
    }

    #[test]
    fn test_file_type_from_path() {
        assert_eq!(FileType::from_path("proofs/intro.v"), FileType::Coq);
        assert_eq!(FileType::from_path("intro.MV"), FileType::CoqMD);
        assert_eq!(FileType::from_path("Basic.lean"), FileType::Lean);
        assert_eq!(FileType::from_path("notes.txt"), FileType::Unknown);
        assert_eq!(FileType::from_path("Makefile"), FileType::Unknown);
    }

    #[test]
    fn test_unknown_has_no_grammar() {
        assert!(OutputConfig::for_file_type(FileType::Unknown).is_none());
        assert_eq!(
            OutputConfig::for_file_type(FileType::Lean),
            Some(OutputConfig::lean())
        );
    }
}
