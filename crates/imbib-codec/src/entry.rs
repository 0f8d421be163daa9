//! BibTeX entry data structures

/// BibTeX entry type
///
/// Aliases are folded into their canonical type; anything unrecognised is
/// kept verbatim (lowercased) so it survives a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntryType {
    Article,
    Book,
    Booklet,
    InBook,
    InCollection,
    InProceedings,
    Manual,
    MastersThesis,
    Misc,
    PhdThesis,
    Proceedings,
    TechReport,
    Unpublished,
    Online,
    Other(String),
}

impl EntryType {
    /// Parse an entry type from a string (case-insensitive)
    pub fn parse(s: &str) -> Self {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "article" => Self::Article,
            "book" => Self::Book,
            "booklet" => Self::Booklet,
            "inbook" => Self::InBook,
            "incollection" => Self::InCollection,
            "inproceedings" | "conference" => Self::InProceedings,
            "manual" => Self::Manual,
            "mastersthesis" => Self::MastersThesis,
            "misc" => Self::Misc,
            "phdthesis" => Self::PhdThesis,
            "proceedings" => Self::Proceedings,
            "techreport" => Self::TechReport,
            "unpublished" => Self::Unpublished,
            "online" | "electronic" | "www" => Self::Online,
            _ => Self::Other(lower),
        }
    }

    /// Canonical lowercase name
    pub fn as_str(&self) -> &str {
        match self {
            Self::Article => "article",
            Self::Book => "book",
            Self::Booklet => "booklet",
            Self::InBook => "inbook",
            Self::InCollection => "incollection",
            Self::InProceedings => "inproceedings",
            Self::Manual => "manual",
            Self::MastersThesis => "mastersthesis",
            Self::Misc => "misc",
            Self::PhdThesis => "phdthesis",
            Self::Proceedings => "proceedings",
            Self::TechReport => "techreport",
            Self::Unpublished => "unpublished",
            Self::Online => "online",
            Self::Other(name) => name,
        }
    }
}

/// A single BibTeX field (key-value pair)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub key: String,
    pub value: String,
}

/// A parsed BibTeX entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub cite_key: String,
    pub entry_type: EntryType,
    pub fields: Vec<Field>,
}

impl Entry {
    pub fn new(cite_key: impl Into<String>, entry_type: EntryType) -> Self {
        Self {
            cite_key: cite_key.into(),
            entry_type,
            fields: Vec::new(),
        }
    }

    pub fn add_field(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.push(Field {
            key: key.into(),
            value: value.into(),
        });
    }

    /// Get a field value by key (case-insensitive)
    pub fn get_field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.key.eq_ignore_ascii_case(key))
            .map(|f| f.value.as_str())
    }

    pub fn title(&self) -> Option<&str> {
        self.get_field("title")
    }
}
