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


use std::fs::create_dir_all;
use std::fs::write;
use std::path::PathBuf;

use kasus_core::error::Fallible;
use tempfile::Builder;

pub const VERBS_CSV: &str = "\
Verb,Preposition,Case,WrongPrepositions,Exemple,Translation_en,ExampleTranslation_en
denken,an,Akk,\"[\"\"auf\"\",\"\"über\"\"]\",Ich denke an dich.,to think of,I am thinking of you.
";

pub const HELPERS_CSV: &str = "\
Verb,Preposition,Case,Exemple,Translation_en
helfen,bei,Dat,Ich helfe dir bei der Arbeit.,to help with
";

pub const SENTENCES_CSV: &str = "\
Sentence,Case,Example
Mit dem neu__ Auto,Dat,Ich fahre mit dem neuen Auto.
";

/// Create a collection directory holding the given files. The directory
/// outlives the test.
pub fn create_collection(files: &[(&str, &str)]) -> Fallible<PathBuf> {
    let dir = Builder::new().prefix("kasus").tempdir()?.keep();
    for (name, contents) in files {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }
        write(path, contents)?;
    }
    Ok(dir.canonicalize()?)
}
