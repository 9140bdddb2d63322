//! Named character entities used to embed scraped text in the table document.
//!
//! The extractor escapes cell text and attribute values with an
//! [`EntityTable`], and the same table writes the document type declaration
//! that lets the strict parser resolve every name it wrote.

use std::collections::HashMap;

/// Markup-significant characters. These are predefined in XML, so they are
/// never declared. `apos` is not an HTML 4 entity but is required for
/// attribute-safe output.
const MARKUP_ENTITIES: [(&str, char); 5] = [
    ("amp", '&'),
    ("lt", '<'),
    ("gt", '>'),
    ("quot", '"'),
    ("apos", '\''),
];

/// Legacy HTML entities for U+00A0 through U+00FF, in code point order.
const LATIN1_ENTITIES: [&str; 96] = [
    "nbsp", "iexcl", "cent", "pound", "curren", "yen", "brvbar", "sect", "uml", "copy", "ordf",
    "laquo", "not", "shy", "reg", "macr", "deg", "plusmn", "sup2", "sup3", "acute", "micro",
    "para", "middot", "cedil", "sup1", "ordm", "raquo", "frac14", "frac12", "frac34", "iquest",
    "Agrave", "Aacute", "Acirc", "Atilde", "Auml", "Aring", "AElig", "Ccedil", "Egrave", "Eacute",
    "Ecirc", "Euml", "Igrave", "Iacute", "Icirc", "Iuml", "ETH", "Ntilde", "Ograve", "Oacute",
    "Ocirc", "Otilde", "Ouml", "times", "Oslash", "Ugrave", "Uacute", "Ucirc", "Uuml", "Yacute",
    "THORN", "szlig", "agrave", "aacute", "acirc", "atilde", "auml", "aring", "aelig", "ccedil",
    "egrave", "eacute", "ecirc", "euml", "igrave", "iacute", "icirc", "iuml", "eth", "ntilde",
    "ograve", "oacute", "ocirc", "otilde", "ouml", "divide", "oslash", "ugrave", "uacute",
    "ucirc", "uuml", "yacute", "thorn", "yuml",
];

const LATIN1_FIRST: u32 = 0xA0;

/// Character → entity-name mapping, plus the declarations for the names XML
/// does not predefine.
#[derive(Debug, Clone)]
pub struct EntityTable {
    names: HashMap<char, &'static str>,
    declared: Vec<(&'static str, char)>,
}

impl EntityTable {
    /// The HTML legacy entity set: the five markup characters plus Latin-1.
    pub fn html() -> Self {
        let declared: Vec<(&'static str, char)> = LATIN1_ENTITIES
            .iter()
            .zip(LATIN1_FIRST..)
            .filter_map(|(name, code)| char::from_u32(code).map(|c| (*name, c)))
            .collect();

        let names = MARKUP_ENTITIES
            .into_iter()
            .chain(declared.iter().copied())
            .map(|(name, c)| (c, name))
            .collect();

        Self { names, declared }
    }

    /// Entity name for `c`, if it has one.
    pub fn name_of(&self, c: char) -> Option<&'static str> {
        self.names.get(&c).copied()
    }

    /// `<!DOCTYPE html [...]>` declaring every entity [`sanitize`](Self::sanitize)
    /// may write that XML does not predefine.
    pub fn doctype(&self) -> String {
        let mut doctype = String::from("<!DOCTYPE html [");
        for (name, c) in &self.declared {
            doctype.push_str("<!ENTITY ");
            doctype.push_str(name);
            doctype.push_str(" \"");
            doctype.push(*c);
            doctype.push_str("\">");
        }
        doctype.push_str("]>");
        doctype
    }

    /// Appends `c` to `out`, as `&name;` when the table has an entity for it.
    pub fn push_escaped(
        &self,
        c: char,
        out: &mut String,
    ) {
        match self.name_of(c) {
            Some(name) => {
                out.push('&');
                out.push_str(name);
                out.push(';');
            }
            None => out.push(c),
        }
    }

    /// Escapes every non-whitespace character of `text` that has an entity.
    /// Whitespace passes through untouched.
    pub fn sanitize(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            if c.is_whitespace() {
                out.push(c);
            } else {
                self.push_escaped(c, &mut out);
            }
        }
        out
    }
}

impl Default for EntityTable {
    fn default() -> Self {
        Self::html()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn table_covers_markup_and_latin1() {
        let table = EntityTable::html();

        assert_eq!(table.name_of('&'), Some("amp"));
        assert_eq!(table.name_of('\u{A0}'), Some("nbsp"));
        assert_eq!(table.name_of('ÿ'), Some("yuml"));
        assert_eq!(table.name_of('×'), Some("times"));
    }

    #[test]
    fn markup_characters_are_escaped() {
        let table = EntityTable::html();

        assert_eq!(table.sanitize(r#"<a & 'b' "c">"#), "&lt;a &amp; &apos;b&apos; &quot;c&quot;&gt;");
    }

    #[test]
    fn plain_ascii_is_unchanged() {
        let table = EntityTable::html();

        assert_eq!(table.sanitize("$9,325 to $37,950"), "$9,325 to $37,950");
    }

    #[test]
    fn latin1_characters_use_named_entities() {
        let table = EntityTable::html();

        assert_eq!(table.sanitize("½ ©"), "&frac12; &copy;");
    }

    #[test]
    fn whitespace_including_nbsp_passes_through() {
        let table = EntityTable::html();

        assert_eq!(table.sanitize("a\u{A0}b\tc"), "a\u{A0}b\tc");
    }

    #[test]
    fn characters_outside_the_table_pass_through() {
        let table = EntityTable::html();

        assert_eq!(table.name_of('€'), None);
        assert_eq!(table.sanitize("€"), "€");
    }

    #[test]
    fn doctype_declares_latin1_but_not_predefined_names() {
        let doctype = EntityTable::html().doctype();

        assert!(doctype.starts_with("<!DOCTYPE html [<!ENTITY nbsp \"\u{A0}\">"));
        assert!(doctype.contains("<!ENTITY frac12 \"½\">"));
        assert!(doctype.ends_with("<!ENTITY yuml \"ÿ\">]>"));
        assert!(!doctype.contains("<!ENTITY amp"));
        assert_eq!(doctype.matches("<!ENTITY").count(), 96);
    }
}
