//! Format strings: parsing into segments and rendering against a
//! [`RepositoryInfo`].
//!
//! Parsing is a single left-to-right scan, so a substituted value (a
//! branch named `%b`, say) is never scanned again.

use crate::options::Options;
use crate::repository::{Change, RepositoryInfo};

/// A recognized `%` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// `%s`
    System,
    /// `%n`, an alias for `%s`.
    SystemAlt,
    /// `%b`
    Branch,
    /// `%r`
    Revision,
    /// `%h`
    Hash,
    /// `%i`, the collapsed status codes.
    Status,
    /// `%m`
    Modified,
    /// `%u`
    Untracked,
    /// `%a`
    Staged,
    /// `%p`
    RelativePath,
    /// `%P`
    Root,
}

impl Token {
    fn from_char(c: char) -> Option<Self> {
        Some(match c {
            's' => Self::System,
            'n' => Self::SystemAlt,
            'b' => Self::Branch,
            'r' => Self::Revision,
            'h' => Self::Hash,
            'i' => Self::Status,
            'm' => Self::Modified,
            'u' => Self::Untracked,
            'a' => Self::Staged,
            'p' => Self::RelativePath,
            'P' => Self::Root,
            _ => return None,
        })
    }
}

/// One piece of a parsed format string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text copied verbatim, including unrecognized `%x` sequences.
    Literal(String),
    /// A token to substitute.
    Token(Token),
}

/// Which fields a format needs, so readers can skip work.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fields {
    /// `%b`
    pub branch: bool,
    /// `%r` or `%h`
    pub revision: bool,
    /// `%i`, `%m`, `%u` or `%a`
    pub status: bool,
}

impl Fields {
    /// Every field requested.
    pub const ALL: Self = Self { branch: true, revision: true, status: true };

    /// The same request without working-tree status.
    #[must_use]
    pub const fn without_status(self) -> Self {
        Self { status: false, ..self }
    }
}

/// A parsed format string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSpec {
    segments: Vec<Segment>,
}

impl FormatSpec {
    /// Parses `format`. Never fails: anything unrecognized is literal.
    #[must_use]
    pub fn parse(format: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = format.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '%' {
                literal.push(c);
                continue;
            }
            match chars.peek().copied().and_then(Token::from_char) {
                Some(token) => {
                    chars.next();
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Token(token));
                }
                // The following character is left for the next iteration,
                // so "%%s" keeps its first '%' and still substitutes "%s".
                None => literal.push('%'),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Self { segments }
    }

    /// The parsed segments in order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The fields referenced by this format.
    #[must_use]
    pub fn fields(&self) -> Fields {
        let mut fields = Fields::default();
        for segment in &self.segments {
            match segment {
                Segment::Token(Token::Branch) => fields.branch = true,
                Segment::Token(Token::Revision | Token::Hash) => fields.revision = true,
                Segment::Token(Token::Status | Token::Modified | Token::Untracked | Token::Staged) => {
                    fields.status = true;
                }
                _ => {}
            }
        }
        fields
    }

    /// Renders the format against `info`.
    #[must_use]
    pub fn render(&self, info: &RepositoryInfo, options: &Options) -> String {
        let unknown = |value: &Option<String>| {
            value.clone().unwrap_or_else(|| options.unknown_value.clone())
        };
        let flag = |change: Change, c: char| {
            if info.status.as_ref().is_some_and(|s| s.has(change)) {
                c.to_string()
            } else {
                String::new()
            }
        };

        let mut out = String::new();
        for segment in &self.segments {
            let token = match segment {
                Segment::Literal(text) => {
                    out.push_str(text);
                    continue;
                }
                Segment::Token(token) => *token,
            };
            let value = match token {
                Token::System | Token::SystemAlt => info.system.id().to_string(),
                Token::Branch => unknown(&info.branch),
                Token::Revision => unknown(&info.revision),
                Token::Hash => unknown(&info.hash),
                Token::Status => info.status.as_ref().map(crate::repository::Status::codes).unwrap_or_default(),
                Token::Modified => flag(Change::Modified, options.modified_char),
                Token::Untracked => flag(Change::Untracked, options.untracked_char),
                Token::Staged => flag(
                    Change::Staged,
                    options.staged_char.unwrap_or_else(|| info.system.default_staged_char()),
                ),
                Token::RelativePath => {
                    if info.relative_path.as_os_str().is_empty() {
                        ".".to_string()
                    } else {
                        info.relative_path.display().to_string()
                    }
                }
                Token::Root => info.root.display().to_string(),
            };
            out.push_str(&value);
        }
        out
    }
}

/// Parses and renders in one step.
#[must_use]
pub fn render(format: &str, info: &RepositoryInfo, options: &Options) -> String {
    FormatSpec::parse(format).render(info, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{Status, System};
    use std::path::Path;

    fn git_info() -> RepositoryInfo {
        let mut info =
            RepositoryInfo::new(System::Git, Path::new("/work/app"), Path::new("/work/app/src/bin"));
        info.branch = Some("master".into());
        info.revision = Some("eae51cf".into());
        info.hash = Some("eae51cf".into());
        let mut status = Status::default();
        status.insert('M', Change::Modified);
        status.insert('?', Change::Untracked);
        info.status = Some(status);
        info
    }

    #[test]
    fn substitutes_known_tokens() {
        let out = render("%s:%b:%r", &git_info(), &Options::default());
        assert_eq!(out, "git:master:eae51cf");
    }

    #[test]
    fn unrecognized_tokens_pass_through() {
        let out = render("[%x %b %% 100%]", &git_info(), &Options::default());
        assert_eq!(out, "[%x master %% 100%]");
    }

    #[test]
    fn percent_before_token_keeps_the_token() {
        assert_eq!(render("%%s", &git_info(), &Options::default()), "%git");
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        let mut info = git_info();
        info.branch = Some("%h-%s".into());
        let out = render("%b|%h", &info, &Options::default());
        assert_eq!(out, "%h-%s|eae51cf");
    }

    #[test]
    fn missing_fields_use_unknown_value() {
        let mut info = RepositoryInfo::new(System::Cvs, Path::new("/w"), Path::new("/w"));
        info.status = None;
        let options = Options { unknown_value: "UNKNOWN".into(), ..Options::default() };
        assert_eq!(render("%s %b %r %h [%i%m%u%a]", &info, &options), "cvs UNKNOWN UNKNOWN UNKNOWN []");
    }

    #[test]
    fn status_flags_use_configured_chars() {
        let info = git_info();
        assert_eq!(render("%m%u%a", &info, &Options::default()), "+?");
        assert_eq!(render("%i", &info, &Options::default()), "?M");

        let options = Options { modified_char: '!', untracked_char: '…', ..Options::default() };
        assert_eq!(render("%m%u", &info, &options), "!…");
    }

    #[test]
    fn staged_char_defaults_per_system() {
        let mut info = git_info();
        let mut status = Status::default();
        status.insert('A', Change::Staged);
        info.status = Some(status);
        assert_eq!(render("%a", &info, &Options::default()), "*");

        info.system = System::Mercurial;
        assert_eq!(render("%a", &info, &Options::default()), "A");

        let options = Options { staged_char: Some('#'), ..Options::default() };
        assert_eq!(render("%a", &info, &options), "#");
    }

    #[test]
    fn paths_render_relative_and_root() {
        let info = git_info();
        assert_eq!(render("%p @ %P", &info, &Options::default()), "src/bin @ /work/app");

        let at_root = RepositoryInfo::new(System::Git, Path::new("/work/app"), Path::new("/work/app"));
        assert_eq!(render("%p", &at_root, &Options::default()), ".");
    }

    #[test]
    fn every_token_renders_like_its_single_render() {
        let info = git_info();
        let options = Options::default();
        let tokens = ["%s", "%n", "%b", "%r", "%h", "%i", "%m", "%u", "%a", "%p", "%P"];

        let combined = render(&tokens.join("\u{1f}"), &info, &options);
        let parts: Vec<&str> = combined.split('\u{1f}').collect();
        assert_eq!(parts.len(), tokens.len());
        for (token, part) in tokens.iter().zip(parts) {
            assert_eq!(render(token, &info, &options), part, "token {token}");
        }
    }

    #[test]
    fn fields_follow_tokens() {
        assert_eq!(FormatSpec::parse("%s:%n %p").fields(), Fields::default());
        assert_eq!(
            FormatSpec::parse("%b").fields(),
            Fields { branch: true, ..Fields::default() }
        );
        assert_eq!(
            FormatSpec::parse("%h").fields(),
            Fields { revision: true, ..Fields::default() }
        );
        assert_eq!(
            FormatSpec::parse("%u").fields(),
            Fields { status: true, ..Fields::default() }
        );
        assert_eq!(FormatSpec::parse("%b%r%i").fields(), Fields::ALL);
    }

    #[test]
    fn parse_groups_literals() {
        let spec = FormatSpec::parse("(%s) ");
        assert_eq!(
            spec.segments(),
            [
                Segment::Literal("(".into()),
                Segment::Token(Token::System),
                Segment::Literal(") ".into()),
            ]
        );
    }
}
