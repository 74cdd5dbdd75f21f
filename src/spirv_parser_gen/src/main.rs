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

//! `generate_spirv_parser <input-directory> <output-directory>`: the
//! offline code-generator CLI (spec §6). Reads the SPIR-V grammar JSON from
//! the input directory, patches the AST, and writes the generated `spirv::`
//! model and `parser::` support into the output directory.

use std::path::PathBuf;
use std::process::ExitCode;

fn usage(program: &str) {
    eprintln!("usage: {} <input-directory> <output-directory>", program);
}

fn run(input_directory: &std::path::Path, output_directory: &std::path::Path) -> Result<(), swvk_spirv_grammar::GrammarError> {
    let files = swvk_spirv_grammar::GrammarReader::read_required_files(input_directory)
        .map_err(swvk_spirv_grammar::GrammarError::from)?;
    let mut top_level = swvk_spirv_grammar::GrammarReader::parse(&files)?;
    let patches = swvk_spirv_grammar::default_patches();
    swvk_spirv_grammar::apply_patches(&patches, &mut top_level);
    let generated = swvk_spirv_grammar::GrammarCodegen::generate(&top_level).map_err(swvk_spirv_grammar::GrammarError::from)?;
    swvk_spirv_grammar::GrammarCodegen::write_to_directory(&generated, output_directory).map_err(swvk_spirv_grammar::GrammarError::from)?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();
    let program = args.get(0).cloned().unwrap_or_else(|| "generate_spirv_parser".to_string());
    let input_directory = args.get(1).cloned().unwrap_or_default();
    let output_directory = args.get(2).cloned().unwrap_or_default();

    if args.len() != 3
        || input_directory.is_empty()
        || input_directory.starts_with('-')
        || output_directory.is_empty()
        || output_directory.starts_with('-')
    {
        usage(&program);
        return ExitCode::from(1);
    }

    match run(&PathBuf::from(input_directory), &PathBuf::from(output_directory)) {
        Ok(()) => ExitCode::from(0),
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::from(1)
        }
    }
}
