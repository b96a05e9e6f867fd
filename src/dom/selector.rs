//! CSS selectors used to discover elements.
//!
//! Parsing and matching go through the `selectors` crate with a minimal
//! [`HtmlSelectors`] implementation: type, id, class and attribute
//! selectors, every combinator, and the tree-structural pseudo-classes.
//! Other pseudo-classes and pseudo-elements are rejected at parse time.
//! Selectors render back to CSS through [`Display`](fmt::Display) so
//! browser hosts can hand them to `querySelectorAll` unchanged.

use std::fmt;
use std::str::FromStr;

use cssparser::{
    serialize_identifier, serialize_string, Parser as CssParser,
    ParserInput, ToCss,
};
use selectors::context::QuirksMode;
use selectors::matching::{
    matches_selector_list, IgnoreNthChildForInvalidation, MatchingContext,
    MatchingMode, NeedsSelectorFlags,
};
use selectors::parser::{
    ParseRelative, Parser, SelectorImpl, SelectorList,
    SelectorParseErrorKind,
};
use selectors::{Element, NthIndexCache};

// ── Selector implementation ──

/// Identifier and local name storage.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct CssIdent(pub String);

impl AsRef<str> for CssIdent {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for CssIdent {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl<'a> From<&'a str> for CssIdent {
    fn from(s: &'a str) -> Self {
        Self(s.to_owned())
    }
}

impl ToCss for CssIdent {
    fn to_css<W>(&self, dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        serialize_identifier(&self.0, dest)
    }
}

/// Attribute value storage. Serializes as a quoted CSS string.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct CssString(pub String);

impl AsRef<str> for CssString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'a> From<&'a str> for CssString {
    fn from(s: &'a str) -> Self {
        Self(s.to_owned())
    }
}

impl ToCss for CssString {
    fn to_css<W>(&self, dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        serialize_string(&self.0, dest)
    }
}

/// Uninhabited pseudo-class and pseudo-element type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoPseudo {}

impl ToCss for NoPseudo {
    fn to_css<W>(&self, _dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        match *self {}
    }
}

impl selectors::parser::NonTSPseudoClass for NoPseudo {
    type Impl = HtmlSelectors;

    fn is_active_or_hover(&self) -> bool {
        match *self {}
    }

    fn is_user_action_state(&self) -> bool {
        match *self {}
    }
}

impl selectors::parser::PseudoElement for NoPseudo {
    type Impl = HtmlSelectors;

    fn accepts_state_pseudo_classes(&self) -> bool {
        match *self {}
    }

    fn valid_after_slotted(&self) -> bool {
        match *self {}
    }
}

/// Selector vocabulary for HTML documents without pseudo-elements.
#[derive(Clone, Debug)]
pub enum HtmlSelectors {}

impl SelectorImpl for HtmlSelectors {
    type ExtraMatchingData<'a> = ();
    type AttrValue = CssString;
    type Identifier = CssIdent;
    type LocalName = CssIdent;
    type NamespaceUrl = CssIdent;
    type NamespacePrefix = CssIdent;
    type BorrowedNamespaceUrl = str;
    type BorrowedLocalName = str;
    type NonTSPseudoClass = NoPseudo;
    type PseudoElement = NoPseudo;
}

struct HtmlParser;

impl<'i> Parser<'i> for HtmlParser {
    type Impl = HtmlSelectors;
    type Error = SelectorParseErrorKind<'i>;
}

// ── Selector ──

/// A parsed selector list.
#[derive(Clone)]
pub struct Selector {
    list: SelectorList<HtmlSelectors>,
}

/// Selector parse failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// Nothing to parse.
    Empty,
    /// The text is not a supported selector list.
    Invalid {
        /// Zero-based line of the failure.
        line: u32,
        /// One-based column of the failure.
        column: u32,
        /// Parser diagnostic.
        reason: String,
    },
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty selector"),
            Self::Invalid {
                line,
                column,
                reason,
            } => write!(f, "invalid selector at {line}:{column}: {reason}"),
        }
    }
}

impl std::error::Error for SelectorError {}

impl Selector {
    /// Whether `element` matches any selector in the list.
    #[must_use]
    pub fn matches<E>(&self, element: &E) -> bool
    where
        E: Element<Impl = HtmlSelectors>,
    {
        let mut cache = NthIndexCache::default();
        let mut context = MatchingContext::new(
            MatchingMode::Normal,
            None,
            &mut cache,
            QuirksMode::NoQuirks,
            NeedsSelectorFlags::No,
            IgnoreNthChildForInvalidation::No,
        );
        matches_selector_list(&self.list, element, &mut context)
    }

    /// The list with `.class` appended to every selector, as CSS text.
    #[must_use]
    pub fn with_class(&self, class: &str) -> String {
        let mut suffix = String::from(".");
        let _ = serialize_identifier(class, &mut suffix);
        self.list
            .0
            .iter()
            .map(|selector| format!("{}{suffix}", selector.to_css_string()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(SelectorError::Empty);
        }
        let mut input = ParserInput::new(s);
        let mut parser = CssParser::new(&mut input);
        SelectorList::parse(&HtmlParser, &mut parser, ParseRelative::No)
            .map(|list| Self { list })
            .map_err(|e| SelectorError::Invalid {
                line: e.location.line,
                column: e.location.column,
                reason: format!("{:?}", e.kind),
            })
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.list.to_css(f)
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Selector").field(&self.to_string()).finish()
    }
}

impl PartialEq for Selector {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for Selector {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, ElementId, MemoryDocument};

    fn sel(s: &str) -> Selector {
        s.parse().unwrap()
    }

    /// body > div#Home_Desktop > (div.reveal > span#Card_7, p, p)
    fn chain() -> (MemoryDocument, [ElementId; 5]) {
        let mut doc = MemoryDocument::new();
        let home = doc.append_with_id(doc.body(), "div", "Home_Desktop");
        let reveal = doc.append(home, "div");
        doc.add_class(reveal, "reveal");
        let card = doc.append_with_id(reveal, "span", "Card_7");
        let first = doc.append(home, "p");
        let second = doc.append(home, "p");
        (doc, [home, reveal, card, first, second])
    }

    fn found(doc: &MemoryDocument, s: &str) -> Vec<ElementId> {
        doc.query_all(None, &sel(s))
    }

    #[test]
    fn test_child_and_descendant_combinators() {
        let (doc, [_, reveal, card, first, second]) = chain();
        assert_eq!(found(&doc, "#Home_Desktop > div"), vec![reveal]);
        assert_eq!(found(&doc, "#Home_Desktop span"), vec![card]);
        assert!(found(&doc, "#Home_Desktop > span").is_empty());
        assert_eq!(found(&doc, "div + p"), vec![first]);
        assert_eq!(found(&doc, "div ~ p"), vec![first, second]);
    }

    #[test]
    fn test_id_prefix_and_list() {
        let (doc, [home, _, card, ..]) = chain();
        let s = r#"[id^="Card"], [id^="Product"], #Home_Desktop"#;
        assert_eq!(found(&doc, s), vec![home, card]);
    }

    #[test]
    fn test_compound_and_structural() {
        let (doc, [home, reveal, _, first, second]) = chain();
        assert_eq!(found(&doc, "div.reveal"), vec![reveal]);
        assert!(found(&doc, "span.reveal").is_empty());
        assert_eq!(found(&doc, "#Home_Desktop > :first-child"), vec![reveal]);
        assert_eq!(found(&doc, "p:last-child"), vec![second]);
        assert_eq!(found(&doc, "p:not(:last-child)"), vec![first]);
        assert!(found(&doc, "*").contains(&home));
    }

    #[test]
    fn test_display_round_trip() {
        let src = r#"#Home_Desktop > div, [id^="Card"] .reveal, button"#;
        let rendered = sel(src).to_string();
        assert_eq!(rendered, src);
        assert_eq!(sel(&rendered), sel(src));
    }

    #[test]
    fn test_with_class() {
        let s = sel(r#"[id^="Card"], #Column_1"#);
        assert_eq!(s.with_class("pop"), r#"[id^="Card"].pop, #Column_1.pop"#);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Selector>(), Err(SelectorError::Empty));
        assert_eq!("  ".parse::<Selector>(), Err(SelectorError::Empty));
        for bad in ["a,", "div >", "#", "a:hover", "p::before"] {
            assert!(
                matches!(
                    bad.parse::<Selector>(),
                    Err(SelectorError::Invalid { .. })
                ),
                "{bad} should not parse"
            );
        }
    }
}
