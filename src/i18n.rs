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


//! Interface strings.

use kasus_core::config::Language;
use kasus_core::config::Level;
use kasus_core::config::QuizMode;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Text {
    AppTitle,
    Settings,
    Dataset,
    Mode,
    Level,
    Language,
    Preposition,
    Case,
    Guess,
    GiveUp,
    Continue,
    Correct,
    Incorrect,
    Example,
    Translation,
    Score,
    Learned,
    NewlyLearned,
    AllLearned,
    Restart,
    Loading,
    Error,
    ChooseDataset,
    NoDatasets,
    Degraded,
    Shutdown,
    SessionEnded,
    Duration,
    Progress,
    Item,
    Consecutive,
    ResetAll,
    ConfirmReset,
}

pub fn tr(language: Language, text: Text) -> &'static str {
    match language {
        Language::En => en(text),
        Language::Fr => fr(text),
        Language::Es => es(text),
    }
}

pub fn mode_label(language: Language, mode: QuizMode) -> &'static str {
    match (language, mode) {
        (Language::En, QuizMode::Both) => "Preposition + Case",
        (Language::En, QuizMode::PrepositionOnly) => "Preposition only",
        (Language::En, QuizMode::CaseOnly) => "Case only",
        (Language::Fr, QuizMode::Both) => "Préposition + Cas",
        (Language::Fr, QuizMode::PrepositionOnly) => "Préposition seulement",
        (Language::Fr, QuizMode::CaseOnly) => "Cas seulement",
        (Language::Es, QuizMode::Both) => "Preposición + Caso",
        (Language::Es, QuizMode::PrepositionOnly) => "Solo preposición",
        (Language::Es, QuizMode::CaseOnly) => "Solo caso",
    }
}

pub fn level_label(language: Language, level: Level) -> &'static str {
    match (language, level) {
        (Language::En, Level::MultipleChoice) => "Multiple Choice",
        (Language::En, Level::TextInput) => "Text Input",
        (Language::Fr, Level::MultipleChoice) => "Choix multiple",
        (Language::Fr, Level::TextInput) => "Saisie texte",
        (Language::Es, Level::MultipleChoice) => "Opción múltiple",
        (Language::Es, Level::TextInput) => "Entrada de texto",
    }
}

fn en(text: Text) -> &'static str {
    match text {
        Text::AppTitle => "German Verb Trainer",
        Text::Settings => "Settings",
        Text::Dataset => "Dataset",
        Text::Mode => "Mode",
        Text::Level => "Level",
        Text::Language => "Language",
        Text::Preposition => "Preposition",
        Text::Case => "Case",
        Text::Guess => "Guess",
        Text::GiveUp => "Give Up",
        Text::Continue => "Continue",
        Text::Correct => "Correct",
        Text::Incorrect => "Incorrect",
        Text::Example => "Example",
        Text::Translation => "Translation",
        Text::Score => "Score",
        Text::Learned => "Learned",
        Text::NewlyLearned => "Learned!",
        Text::AllLearned => "All verbs learned!",
        Text::Restart => "Restart",
        Text::Loading => "Loading...",
        Text::Error => "Error",
        Text::ChooseDataset => "Choose another dataset to continue.",
        Text::NoDatasets => "No datasets found in this collection.",
        Text::Degraded => "Progress could not be saved and may be lost on exit.",
        Text::Shutdown => "Shutdown",
        Text::SessionEnded => "Session Ended",
        Text::Duration => "Duration",
        Text::Progress => "Progress",
        Text::Item => "Verb",
        Text::Consecutive => "Consecutive",
        Text::ResetAll => "Reset All",
        Text::ConfirmReset => "Reset all progress for this dataset? This cannot be undone.",
    }
}

fn fr(text: Text) -> &'static str {
    match text {
        Text::AppTitle => "Entraîneur de verbes allemands",
        Text::Settings => "Paramètres",
        Text::Dataset => "Jeu de données",
        Text::Mode => "Mode",
        Text::Level => "Niveau",
        Text::Language => "Langue",
        Text::Preposition => "Préposition",
        Text::Case => "Cas",
        Text::Guess => "Deviner",
        Text::GiveUp => "Abandonner",
        Text::Continue => "Continuer",
        Text::Correct => "Correct",
        Text::Incorrect => "Incorrect",
        Text::Example => "Exemple",
        Text::Translation => "Traduction",
        Text::Score => "Score",
        Text::Learned => "Appris",
        Text::NewlyLearned => "Appris !",
        Text::AllLearned => "Tous les verbes sont appris !",
        Text::Restart => "Recommencer",
        Text::Loading => "Chargement...",
        Text::Error => "Erreur",
        Text::ChooseDataset => "Choisissez un autre jeu de données pour continuer.",
        Text::NoDatasets => "Aucun jeu de données dans cette collection.",
        Text::Degraded => "La progression n'a pas pu être enregistrée.",
        Text::Shutdown => "Quitter",
        Text::SessionEnded => "Session terminée",
        Text::Duration => "Durée",
        Text::Progress => "Progression",
        Text::Item => "Verbe",
        Text::Consecutive => "Consécutifs",
        Text::ResetAll => "Tout réinitialiser",
        Text::ConfirmReset => "Réinitialiser toute la progression de ce jeu de données ? Cette action est irréversible.",
    }
}

fn es(text: Text) -> &'static str {
    match text {
        Text::AppTitle => "Entrenador de verbos alemanes",
        Text::Settings => "Configuración",
        Text::Dataset => "Conjunto de datos",
        Text::Mode => "Modo",
        Text::Level => "Nivel",
        Text::Language => "Idioma",
        Text::Preposition => "Preposición",
        Text::Case => "Caso",
        Text::Guess => "Adivinar",
        Text::GiveUp => "Rendirse",
        Text::Continue => "Continuar",
        Text::Correct => "Correcto",
        Text::Incorrect => "Incorrecto",
        Text::Example => "Ejemplo",
        Text::Translation => "Traducción",
        Text::Score => "Puntuación",
        Text::Learned => "Aprendido",
        Text::NewlyLearned => "¡Aprendido!",
        Text::AllLearned => "¡Todos los verbos aprendidos!",
        Text::Restart => "Reiniciar",
        Text::Loading => "Cargando...",
        Text::Error => "Error",
        Text::ChooseDataset => "Elige otro conjunto de datos para continuar.",
        Text::NoDatasets => "No hay conjuntos de datos en esta colección.",
        Text::Degraded => "No se pudo guardar el progreso.",
        Text::Shutdown => "Salir",
        Text::SessionEnded => "Sesión terminada",
        Text::Duration => "Duración",
        Text::Progress => "Progreso",
        Text::Item => "Verbo",
        Text::Consecutive => "Consecutivos",
        Text::ResetAll => "Reiniciar todo",
        Text::ConfirmReset => "¿Reiniciar todo el progreso de este conjunto de datos? No se puede deshacer.",
    }
}
