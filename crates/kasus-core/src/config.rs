// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! User-facing quiz settings. Each setting has a stable string form used
//! for persistence and form values, and a default used whenever a stored
//! value is missing or unrecognized.

use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::fail;

/// Which sub-answers are asked for and graded.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum QuizMode {
    PrepositionOnly,
    CaseOnly,
    #[default]
    Both,
}

impl QuizMode {
    pub const ALL: [QuizMode; 3] = [QuizMode::Both, QuizMode::PrepositionOnly, QuizMode::CaseOnly];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuizMode::PrepositionOnly => "prep",
            QuizMode::CaseOnly => "case",
            QuizMode::Both => "both",
        }
    }

    pub fn asks_preposition(&self) -> bool {
        !matches!(self, QuizMode::CaseOnly)
    }

    pub fn asks_case(&self) -> bool {
        !matches!(self, QuizMode::PrepositionOnly)
    }
}

impl TryFrom<String> for QuizMode {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "prep" => Ok(QuizMode::PrepositionOnly),
            "case" => Ok(QuizMode::CaseOnly),
            "both" => Ok(QuizMode::Both),
            _ => fail(format!("invalid quiz mode: '{value}'")),
        }
    }
}

impl From<QuizMode> for String {
    fn from(mode: QuizMode) -> String {
        mode.as_str().to_string()
    }
}

impl Display for QuizMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How answers are entered. Grading does not depend on the level.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Level {
    /// Pick from buttons. The answer is submitted as soon as every required
    /// sub-answer has been picked.
    #[default]
    MultipleChoice,
    /// Type the preposition and submit explicitly.
    TextInput,
}

impl Level {
    pub const ALL: [Level; 2] = [Level::MultipleChoice, Level::TextInput];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::MultipleChoice => "1",
            Level::TextInput => "2",
        }
    }
}

impl TryFrom<String> for Level {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "1" => Ok(Level::MultipleChoice),
            "2" => Ok(Level::TextInput),
            _ => fail(format!("invalid level: '{value}'")),
        }
    }
}

impl From<Level> for String {
    fn from(level: Level) -> String {
        level.as_str().to_string()
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The quiz settings shared by every item of a session.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct QuizConfiguration {
    pub mode: QuizMode,
    pub level: Level,
}

/// Interface and translation language.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Language {
    #[default]
    En,
    Fr,
    Es,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::En, Language::Fr, Language::Es];

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fr => "fr",
            Language::Es => "es",
        }
    }

    /// The language's name, in that language.
    pub fn native_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Fr => "Français",
            Language::Es => "Español",
        }
    }
}

impl TryFrom<String> for Language {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.code() == value)
            .ok_or_else(|| ErrorReport::new(format!("unsupported language: '{value}'")))
    }
}

impl From<Language> for String {
    fn from(lang: Language) -> String {
        lang.code().to_string()
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
