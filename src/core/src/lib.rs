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

//! Leaf utilities shared by the rest of `swvk`: an extended-precision float,
//! host-independent base-N number formatting built on it, and a lexical path
//! type. Nothing in this crate touches the filesystem or depends on any
//! other `swvk` crate.

pub mod number;
pub mod path;
pub mod soft_float;

pub use path::{Flavor, Path, PartKind, PathKind};
pub use soft_float::SoftFloat;
