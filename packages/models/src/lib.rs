#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Core data types for the imhonet rating archiver.
//!
//! Defines the rated-subject taxonomy ([`Subject`]), the external search
//! targets each subject links out to ([`Target`]), the persisted record
//! format ([`RatedItem`]), and the ordered, key-deduplicated record
//! collection ([`RateBook`]).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A rated subject section of the catalogue.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Subject {
    /// Feature films.
    Films,
    /// Books.
    Books,
    /// Video games.
    Games,
    /// TV serials.
    Serials,
}

impl Subject {
    /// All subjects, in catalogue order.
    pub const ALL: &[Self] = &[Self::Films, Self::Books, Self::Games, Self::Serials];

    /// External reference sites to build outbound search links for.
    ///
    /// Games have no configured target; films and serials link to
    /// KinoPoisk, books to Goodreads.
    #[must_use]
    pub const fn targets(self) -> &'static [Target] {
        match self {
            Self::Films | Self::Serials => &[Target::Kinopoisk],
            Self::Books => &[Target::Goodreads],
            Self::Games => &[],
        }
    }
}

/// An external reference site that can be searched for a rated title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// Books catalogue.
    Goodreads,
    /// Films catalogue.
    Kinopoisk,
}

impl Target {
    /// Human-readable name used as the link label.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Goodreads => "Goodreads",
            Self::Kinopoisk => "KinoPoisk",
        }
    }

    /// Search query template with a `{term}` placeholder.
    #[must_use]
    pub const fn url_template(self) -> &'static str {
        match self {
            Self::Goodreads => {
                "https://www.goodreads.com/search?utf8=%E2%9C%93&q={term}&search_type=books"
            }
            Self::Kinopoisk => "http://www.kinopoisk.ru/index.php?first=no&what=&kp_query={term}",
        }
    }

    /// Builds the search URL for a term, percent-encoding it into the
    /// query template.
    #[must_use]
    pub fn search_url(self, term: &str) -> String {
        self.url_template()
            .replace("{term}", &urlencoding::encode(term))
    }
}

/// One user rating of one catalogue entry.
///
/// `details_url` is the unique key for merging and deduplication; it is
/// never shown in rendered output. `country` is only present for films,
/// `author` only for books; both are omitted from serialization when
/// absent so records never gain keys across load/dump cycles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatedItem {
    /// Russian-language title, with any trailing `(year)` suffix removed.
    pub title_ru: String,
    /// Original-language title, when the detail page declares one.
    pub title_orig: Option<String>,
    /// Rating on the source-native 1-10 scale.
    pub rating: u8,
    /// Release year.
    pub year: Option<i32>,
    /// Canonical detail-page URL. Unique key of the collection.
    pub details_url: String,
    /// Comma-joined production countries (films only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Author (books only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

/// An insertion-ordered collection of [`RatedItem`]s keyed by
/// `details_url`.
///
/// Inserting an item whose key is already present is a no-op, so the
/// collection never holds duplicate keys and earlier records keep their
/// position.
#[derive(Debug, Default)]
pub struct RateBook {
    items: Vec<RatedItem>,
    keys: HashSet<String>,
}

impl RateBook {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an item unless its `details_url` is already present.
    ///
    /// Returns `true` if the item was inserted.
    pub fn insert(&mut self, item: RatedItem) -> bool {
        if self.keys.contains(&item.details_url) {
            return false;
        }
        self.keys.insert(item.details_url.clone());
        self.items.push(item);
        true
    }

    /// Whether an item with this `details_url` is present.
    #[must_use]
    pub fn contains(&self, details_url: &str) -> bool {
        self.keys.contains(details_url)
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the collection holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates records in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, RatedItem> {
        self.items.iter()
    }
}

impl FromIterator<RatedItem> for RateBook {
    fn from_iter<I: IntoIterator<Item = RatedItem>>(iter: I) -> Self {
        let mut book = Self::new();
        for item in iter {
            book.insert(item);
        }
        book
    }
}

impl<'a> IntoIterator for &'a RateBook {
    type Item = &'a RatedItem;
    type IntoIter = std::slice::Iter<'a, RatedItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
