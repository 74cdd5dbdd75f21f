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

//! The runtime half of the SPIR-V subsystem (spec §2): the data model that
//! `swvk-spirv-grammar`'s `GrammarCodegen` would emit from the grammar JSON,
//! plus `SpirvLoader`'s endian-aware binary reader.

pub mod loader;
pub mod model;

pub use loader::{InstructionCursor, InstructionIter, LiteralString, LoadError, SpirvModule, MAGIC_NUMBER};
pub use model::{BuiltIn, Decoration, ExecutionModel, Id, Op, StorageClass, Word};
