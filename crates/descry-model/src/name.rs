// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Simple and qualified names.

use std::fmt;
use std::sync::Arc;

/// A simple name. Special names are wrapped in angle brackets (`<module>`)
/// and can never collide with an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(Arc<str>);

impl Name {
    /// An ordinary identifier.
    pub fn identifier(text: &str) -> Self {
        Name(Arc::from(text))
    }

    /// A special name such as `<module>`. Surrounding brackets are added.
    pub fn special(text: &str) -> Self {
        Name(Arc::from(format!("<{}>", text)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_special(&self) -> bool {
        self.0.starts_with('<') && self.0.ends_with('>')
    }
}

impl From<&str> for Name {
    fn from(text: &str) -> Self {
        Name::identifier(text)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A dotted qualified name (`a.b.C`). The root name has no segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct FqName {
    segments: Vec<Name>,
}

impl FqName {
    pub fn root() -> Self {
        FqName { segments: Vec::new() }
    }

    /// Parse dotted text. The empty string is the root name.
    pub fn parse(text: &str) -> Self {
        if text.is_empty() {
            return FqName::root();
        }
        FqName {
            segments: text.split('.').map(Name::identifier).collect(),
        }
    }

    pub fn from_segments(segments: Vec<Name>) -> Self {
        FqName { segments }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[Name] {
        &self.segments
    }

    pub fn child(&self, name: Name) -> FqName {
        let mut segments = self.segments.clone();
        segments.push(name);
        FqName { segments }
    }

    /// The enclosing name, or `None` for the root.
    pub fn parent(&self) -> Option<FqName> {
        if self.is_root() {
            return None;
        }
        Some(FqName {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    pub fn short_name(&self) -> Option<&Name> {
        self.segments.last()
    }

    pub fn starts_with(&self, prefix: &FqName) -> bool {
        self.segments.starts_with(&prefix.segments)
    }
}

impl From<&str> for FqName {
    fn from(text: &str) -> Self {
        FqName::parse(text)
    }
}

impl fmt::Display for FqName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display_round_trip() {
        let fq = FqName::parse("a.b.C");
        assert_eq!(fq.segments().len(), 3);
        assert_eq!(fq.to_string(), "a.b.C");
        assert_eq!(fq.short_name().map(Name::as_str), Some("C"));
    }

    #[test]
    fn empty_text_is_root() {
        let root = FqName::parse("");
        assert!(root.is_root());
        assert_eq!(root.parent(), None);
        assert_eq!(root.to_string(), "");
    }

    #[test]
    fn parent_and_child() {
        let p = FqName::parse("p");
        let c = p.child(Name::identifier("q"));
        assert_eq!(c.to_string(), "p.q");
        assert_eq!(c.parent(), Some(p.clone()));
        assert_eq!(p.parent(), Some(FqName::root()));
        assert!(c.starts_with(&p));
        assert!(!p.starts_with(&c));
    }

    #[test]
    fn special_names() {
        let module = Name::special("module");
        assert_eq!(module.as_str(), "<module>");
        assert!(module.is_special());
        assert!(!Name::identifier("module").is_special());
    }
}
