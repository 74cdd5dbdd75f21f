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

//! The SPIR-V grammar compiler: reads the machine-readable grammar JSON
//! (`SpirvGrammarAst` via `GrammarReader`), applies `GrammarPatches`, and
//! hands the result to `GrammarCodegen` to emit the SPIR-V data model and
//! parser support consumed at runtime by `swvk_spirv`.

pub mod ast;
pub mod codegen;
pub mod error;
pub mod patches;
pub mod reader;

pub use ast::{Category, Instruction, OperandKind, OperandKindPayload, TopLevel};
pub use codegen::{GeneratedFiles, GrammarCodegen};
pub use error::GrammarError;
pub use patches::{default_patches, run_all as apply_patches, AstPatch};
pub use reader::{GrammarFiles, GrammarReader};

/// Runs the whole pipeline spec §2 describes for build time: read the
/// grammar files from `directory`, parse them into a `TopLevel`, apply the
/// default patch list, and generate the two output files — without writing
/// them to disk (callers choose whether to via
/// `GrammarCodegen::write_to_directory`).
pub fn compile(directory: &std::path::Path) -> Result<GeneratedFiles, GrammarError> {
    let files = GrammarReader::read_required_files(directory)?;
    let mut top_level = GrammarReader::parse(&files)?;
    apply_patches(&default_patches(), &mut top_level);
    GrammarCodegen::generate(&top_level).map_err(GrammarError::from)
}
