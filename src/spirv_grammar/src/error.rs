// Copyright 2026 The Swvk Developers.
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

//! The three thrown-error types used by the grammar compiler. None of these
//! ever cross the driver ABI; that boundary only speaks the returned-status
//! channel (see `swvk::result`).

use std::fmt;
use std::path::PathBuf;
use swvk_json::Location;

/// A breadcrumb element in a walked JSON path, e.g. `root["operand_kinds"][7]`.
#[derive(Clone, Debug)]
pub enum PathElement {
    Key(&'static str),
    Index(usize),
}

#[derive(Clone, Debug, Default)]
pub struct JsonPath(pub Vec<PathElement>);

impl JsonPath {
    pub fn root() -> Self {
        JsonPath(Vec::new())
    }

    pub fn child_key(&self, key: &'static str) -> Self {
        let mut path = self.0.clone();
        path.push(PathElement::Key(key));
        JsonPath(path)
    }

    pub fn child_index(&self, index: usize) -> Self {
        let mut path = self.0.clone();
        path.push(PathElement::Index(index));
        JsonPath(path)
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("root")?;
        for element in &self.0 {
            match element {
                PathElement::Key(key) => write!(f, "[\"{}\"]", key)?,
                PathElement::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct ParseError {
    pub location: Location,
    pub path: JsonPath,
    pub message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: error: at {}: {}", self.location, self.path, self.message)
    }
}

impl std::error::Error for ParseError {}

#[derive(Debug)]
pub struct GenerateError {
    pub message: String,
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error: {}", self.message)
    }
}

impl std::error::Error for GenerateError {}

#[derive(Debug)]
pub struct FilesystemError {
    pub path: PathBuf,
    pub message: String,
}

impl fmt::Display for FilesystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error: {}: {}", self.path.display(), self.message)
    }
}

impl std::error::Error for FilesystemError {}

#[derive(Debug)]
pub enum GrammarError {
    Json(swvk_json::ParseError),
    Parse(ParseError),
    Generate(GenerateError),
    Filesystem(FilesystemError),
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::Json(e) => write!(f, "{}", e),
            GrammarError::Parse(e) => write!(f, "{}", e),
            GrammarError::Generate(e) => write!(f, "{}", e),
            GrammarError::Filesystem(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for GrammarError {}

impl From<swvk_json::ParseError> for GrammarError {
    fn from(e: swvk_json::ParseError) -> Self {
        GrammarError::Json(e)
    }
}

impl From<ParseError> for GrammarError {
    fn from(e: ParseError) -> Self {
        GrammarError::Parse(e)
    }
}

impl From<GenerateError> for GrammarError {
    fn from(e: GenerateError) -> Self {
        GrammarError::Generate(e)
    }
}

impl From<FilesystemError> for GrammarError {
    fn from(e: FilesystemError) -> Self {
        GrammarError::Filesystem(e)
    }
}
