//! Comment syntax per file extension
//!
//! Each syntax compiles to one regex that finds `<marker> TODO <text>`
//! anywhere on a line and captures `<text>`.

use regex::Regex;

/// Comment marker family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentSyntax {
    /// `% TODO` (LaTeX, BibTeX, MATLAB)
    Percent,
    /// `# TODO` (Python, shell, Ruby, YAML, TOML)
    Hash,
    /// `// TODO` (C family, Rust, Go, JS/TS, Java)
    DoubleSlash,
    /// `-- TODO` (SQL, Lua, Haskell)
    DoubleDash,
    /// `<!-- TODO -->` (Markdown, HTML, XML)
    Html,
    /// Any of the above, for unknown extensions
    Any,
}

impl CommentSyntax {
    /// All syntaxes, in compile order
    pub const ALL: [Self; 6] = [
        Self::Percent,
        Self::Hash,
        Self::DoubleSlash,
        Self::DoubleDash,
        Self::Html,
        Self::Any,
    ];

    /// Syntax for a lowercase extension without the leading dot
    #[must_use]
    pub fn for_extension(ext: &str) -> Self {
        match ext {
            "tex" | "sty" | "cls" | "bib" | "dtx" | "ins" | "m" | "erl" => Self::Percent,
            "py" | "sh" | "bash" | "zsh" | "rb" | "pl" | "r" | "toml" | "yaml" | "yml"
            | "cfg" | "conf" | "mk" | "cmake" => Self::Hash,
            "rs" | "c" | "h" | "cc" | "cpp" | "hpp" | "js" | "jsx" | "ts" | "tsx" | "go"
            | "java" | "kt" | "swift" | "scala" | "cs" | "dart" | "php" => Self::DoubleSlash,
            "sql" | "lua" | "hs" | "elm" | "ada" => Self::DoubleDash,
            "md" | "markdown" | "html" | "htm" | "xml" => Self::Html,
            _ => Self::Any,
        }
    }

    /// Regex source for this syntax
    #[must_use]
    pub fn pattern(self) -> &'static str {
        match self {
            Self::Percent => r"%\s*TODO\b\s*(.*)",
            Self::Hash => r"#\s*TODO\b\s*(.*)",
            Self::DoubleSlash => r"//\s*TODO\b\s*(.*)",
            Self::DoubleDash => r"--\s*TODO\b\s*(.*)",
            Self::Html => r"<!--\s*TODO\b\s*(.*)",
            Self::Any => r"(?:<!--|%|#|//|--|;)\s*TODO\b\s*(.*)",
        }
    }

    /// Whether captured text may carry a trailing `-->`
    #[inline]
    #[must_use]
    pub fn closes_comment(self) -> bool {
        matches!(self, Self::Html | Self::Any)
    }
}

/// Compiled marker regexes, one per syntax
#[derive(Debug, Clone)]
pub struct MarkerPatterns {
    compiled: Vec<(CommentSyntax, Regex)>,
}

impl MarkerPatterns {
    /// Compile every syntax pattern
    ///
    /// # Errors
    /// Returns the regex error if a pattern fails to compile.
    pub fn compile() -> Result<Self, regex::Error> {
        let compiled = CommentSyntax::ALL
            .iter()
            .map(|&syntax| Regex::new(syntax.pattern()).map(|re| (syntax, re)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { compiled })
    }

    /// Marker text on `line`, if it carries a marker of `syntax`
    #[must_use]
    pub fn find<'a>(&self, syntax: CommentSyntax, line: &'a str) -> Option<&'a str> {
        let (_, regex) = self.compiled.iter().find(|(s, _)| *s == syntax)?;
        let captured = regex.captures(line)?.get(1)?.as_str();
        let captured = if syntax.closes_comment() {
            captured.trim_end().strip_suffix("-->").unwrap_or(captured)
        } else {
            captured
        };
        Some(captured.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns() -> MarkerPatterns {
        MarkerPatterns::compile().unwrap()
    }

    #[test]
    fn extension_mapping() {
        assert_eq!(CommentSyntax::for_extension("tex"), CommentSyntax::Percent);
        assert_eq!(CommentSyntax::for_extension("py"), CommentSyntax::Hash);
        assert_eq!(CommentSyntax::for_extension("rs"), CommentSyntax::DoubleSlash);
        assert_eq!(CommentSyntax::for_extension("sql"), CommentSyntax::DoubleDash);
        assert_eq!(CommentSyntax::for_extension("md"), CommentSyntax::Html);
        assert_eq!(CommentSyntax::for_extension("weird"), CommentSyntax::Any);
    }

    #[test]
    fn latex_marker() {
        let p = patterns();
        assert_eq!(
            p.find(CommentSyntax::Percent, r"Some text. % TODO BUG: fix X"),
            Some("BUG: fix X")
        );
        assert_eq!(p.find(CommentSyntax::Percent, "%TODO tighten bound"), Some("tighten bound"));
        assert_eq!(p.find(CommentSyntax::Percent, "no marker here"), None);
    }

    #[test]
    fn marker_requires_word_boundary() {
        let p = patterns();
        assert_eq!(p.find(CommentSyntax::Hash, "# TODOS are tracked elsewhere"), None);
    }

    #[test]
    fn trailing_code_comment() {
        let p = patterns();
        assert_eq!(
            p.find(CommentSyntax::Hash, "x = 1  # TODO perf: cache this"),
            Some("perf: cache this")
        );
        assert_eq!(
            p.find(CommentSyntax::DoubleSlash, "let x = 1; // TODO: rename"),
            Some(": rename")
        );
    }

    #[test]
    fn html_comment_is_closed() {
        let p = patterns();
        assert_eq!(
            p.find(CommentSyntax::Html, "<!-- TODO docs: add example -->"),
            Some("docs: add example")
        );
        assert_eq!(
            p.find(CommentSyntax::Any, "<!-- TODO add example -->  "),
            Some("add example")
        );
    }

    #[test]
    fn wrong_syntax_does_not_match() {
        let p = patterns();
        assert_eq!(p.find(CommentSyntax::Percent, "# TODO python style"), None);
    }
}
