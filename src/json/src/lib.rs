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

//! A JSON reader built for the grammar compiler: every value it produces
//! carries a [`Location`] precise enough to point a diagnostic at the byte
//! that caused it.

pub mod parser;
pub mod source;
pub mod value;

pub use parser::{parse, ParseError, ParseOptions};
pub use source::{Location, Source};
pub use value::{JsonValue, ValueKind};
