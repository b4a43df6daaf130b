// SPDX-License-Identifier: AGPL-3.0-or-later

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Language tag used to resolve translated strings, for example "en", "fr" or
/// "pt-BR".
///
/// Tags are normalized to lowercase on construction. Translation lookups only
/// consider the primary subtag, unknown languages fall back to English.
#[derive(Clone, Debug, Serialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Locale(String);

impl<'de> Deserialize<'de> for Locale {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::new(&tag))
    }
}

impl Locale {
    /// Returns a new `Locale` from a language tag.
    pub fn new(tag: &str) -> Self {
        Self(tag.trim().to_lowercase())
    }

    /// Returns the normalized language tag.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the primary language subtag, "pt-BR" gives "pt".
    fn primary_subtag(&self) -> &str {
        self.0
            .split(|character| character == '-' || character == '_')
            .next()
            .unwrap_or(&self.0)
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self("en".into())
    }
}

impl FromStr for Locale {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(value))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Returns the translated display name of the first sheet in a new workbook.
///
/// The display name is resolved once when a sheet record is created and never
/// re-translated afterwards.
pub fn first_sheet_name(locale: &Locale) -> &'static str {
    match locale.primary_subtag() {
        "de" => "Blatt1",
        "es" => "Hoja1",
        "fr" => "Feuille1",
        "it" => "Foglio1",
        "nl" => "Blad1",
        "pt" => "Planilha1",
        _ => "Sheet1",
    }
}
