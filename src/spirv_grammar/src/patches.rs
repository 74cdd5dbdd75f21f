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

//! Named, ordered transforms applied to a [`TopLevel`] after it loads, for
//! the handful of places the upstream grammar is missing information the
//! generator needs (e.g. parameter names). Every patch MUST be deterministic
//! and idempotent: applying the list twice must produce the same AST as
//! applying it once.

use crate::ast::TopLevel;

pub trait AstPatch {
    fn name(&self) -> &'static str;

    /// Applies the patch, returning whether it changed anything. Calling
    /// this twice in a row must leave the second call returning `false`.
    fn apply(&self, top_level: &mut TopLevel) -> bool;
}

/// Runs every patch in order, logging "applied" or "not applicable" for each.
pub fn run_all(patches: &[Box<dyn AstPatch>], top_level: &mut TopLevel) {
    for patch in patches {
        if patch.apply(top_level) {
            log::info!("patch {}: applied", patch.name());
        } else {
            log::info!("patch {}: not applicable", patch.name());
        }
    }
}

/// `ImageOperands::Grad` carries two unnamed parameters in the upstream
/// grammar (the partial derivatives); name them `dx`/`dy` so the generated
/// struct fields aren't just `field0`/`field1`.
pub struct AddImageOperandsGradParameterNames;

impl AstPatch for AddImageOperandsGradParameterNames {
    fn name(&self) -> &'static str {
        "add_image_operands_grad_parameter_names"
    }

    fn apply(&self, top_level: &mut TopLevel) -> bool {
        let operand_kind = match top_level.operand_kind_mut("ImageOperands") {
            Some(k) => k,
            None => return false,
        };
        let enumerants = match operand_kind.payload.as_enumerants_mut() {
            Some(e) => e,
            None => return false,
        };
        for enumerant in enumerants {
            if enumerant.enumerant != "Grad" {
                continue;
            }
            if enumerant.parameters.len() != 2 {
                return false;
            }
            if enumerant.parameters[0].name.is_some() || enumerant.parameters[1].name.is_some() {
                return false;
            }
            enumerant.parameters[0].name = Some("dx".to_string());
            enumerant.parameters[1].name = Some("dy".to_string());
            return true;
        }
        false
    }
}

pub fn default_patches() -> Vec<Box<dyn AstPatch>> {
    vec![Box::new(AddImageOperandsGradParameterNames)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::*;

    fn grad_top_level(names: [Option<&str>; 2]) -> TopLevel {
        TopLevel {
            copyright: Copyright::default(),
            magic_number: 0,
            major_version: 1,
            minor_version: 0,
            revision: 0,
            instructions: Vec::new(),
            extension_instruction_sets: Vec::new(),
            operand_kinds: vec![OperandKind {
                category: Category::BitEnum,
                kind: "ImageOperands".to_string(),
                payload: OperandKindPayload::Enumerants(vec![Enumerant {
                    value: 0x4,
                    enumerant: "Grad".to_string(),
                    capabilities: Vec::new(),
                    extensions: Vec::new(),
                    parameters: vec![
                        Parameter { kind: "IdRef".to_string(), name: names[0].map(str::to_string) },
                        Parameter { kind: "IdRef".to_string(), name: names[1].map(str::to_string) },
                    ],
                }]),
            }],
        }
    }

    #[test]
    fn names_unnamed_grad_parameters() {
        let mut top_level = grad_top_level([None, None]);
        assert!(AddImageOperandsGradParameterNames.apply(&mut top_level));
        let enumerants = top_level.operand_kind("ImageOperands").unwrap().payload.as_enumerants().unwrap();
        assert_eq!(enumerants[0].parameters[0].name.as_deref(), Some("dx"));
        assert_eq!(enumerants[0].parameters[1].name.as_deref(), Some("dy"));
    }

    #[test]
    fn is_idempotent() {
        let mut top_level = grad_top_level([None, None]);
        assert!(AddImageOperandsGradParameterNames.apply(&mut top_level));
        assert!(!AddImageOperandsGradParameterNames.apply(&mut top_level));
    }

    #[test]
    fn leaves_already_named_parameters_alone() {
        let mut top_level = grad_top_level([Some("custom"), Some("other")]);
        assert!(!AddImageOperandsGradParameterNames.apply(&mut top_level));
    }
}
