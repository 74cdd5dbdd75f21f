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

//! `PipelineCore`'s fallible channel. Spec §4.8: "`make` may fail with
//! invalid-shader or invalid-state ... `run` does not fail; invalid inputs
//! are a precondition violation."

use std::fmt;

#[derive(Debug)]
pub enum PipelineError {
    InvalidShader(String),
    InvalidState(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::InvalidShader(m) => write!(f, "invalid shader: {}", m),
            PipelineError::InvalidState(m) => write!(f, "invalid pipeline state: {}", m),
        }
    }
}

impl std::error::Error for PipelineError {}
