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

//! `ShaderModule`: spec §4.8, "stores a copy of the SPIR-V words.
//! Validation is confined to magic-word check and word-count consistency;
//! semantic validation is deferred to pipeline creation."
//!
//! A single pass over the instruction stream (`reflect`) recovers the
//! handful of facts `GraphicsPipeline::make` and `run` need: entry points,
//! the `Location`/`BuiltIn` decorations on `Input`/`Output` variables, and a
//! flattened instruction list per function body for `Interpreter` to walk.

use std::collections::HashMap;
use std::sync::Arc;
use swvk_spirv::{BuiltIn, Decoration, ExecutionModel, Id, Op, SpirvModule, StorageClass};

use crate::error::PipelineError;

#[derive(Clone, Debug)]
pub enum TypeInfo {
    Void,
    Bool,
    Int { signed: bool },
    Float,
    Vector { component: Id, count: u32 },
    Matrix { column: Id, count: u32 },
    Pointer { storage: StorageClass, pointee: Id },
    Array { element: Id },
    Struct { members: Vec<Id> },
    Function,
}

#[derive(Clone, Debug)]
pub struct ParsedInstruction {
    pub op: Op,
    pub result_type: Option<Id>,
    pub result: Option<Id>,
    pub operands: Vec<Id>,
}

#[derive(Clone, Debug, Default)]
pub struct VariableInfo {
    pub type_id: Id,
    pub storage_class: Option<StorageClass>,
    pub location: Option<u32>,
    pub builtin: Option<BuiltIn>,
}

#[derive(Clone, Debug)]
pub struct EntryPointInfo {
    pub name: String,
    pub execution_model: ExecutionModel,
    pub function_id: Id,
    pub interface: Vec<Id>,
}

/// The result of reflecting over a module's instruction stream: everything
/// needed to resolve entry points and to interpret a function body.
pub struct Reflection {
    pub types: HashMap<Id, TypeInfo>,
    pub constants: HashMap<Id, crate::interp::Value>,
    pub variables: HashMap<Id, VariableInfo>,
    pub entry_points: Vec<EntryPointInfo>,
    pub functions: HashMap<Id, Vec<ParsedInstruction>>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ResultShape {
    None,
    IdOnly,
    TypeAndId,
}

/// Result-id / result-type shape for the scoped opcode set this crate
/// interprets. Real SPIR-V fixes this per-opcode in the grammar; since
/// nothing here runs the generator, it's hardcoded for exactly the
/// instructions `model::Op` names.
fn result_shape(op: Op) -> ResultShape {
    match op {
        Op::OpNop
        | Op::OpName
        | Op::OpMemberName
        | Op::OpMemoryModel
        | Op::OpEntryPoint
        | Op::OpExecutionMode
        | Op::OpCapability
        | Op::OpFunctionEnd
        | Op::OpStore
        | Op::OpDecorate
        | Op::OpMemberDecorate
        | Op::OpBranch
        | Op::OpBranchConditional
        | Op::OpReturn
        | Op::OpReturnValue
        | Op::Unknown => ResultShape::None,

        Op::OpExtInstImport
        | Op::OpLabel
        | Op::OpTypeVoid
        | Op::OpTypeBool
        | Op::OpTypeInt
        | Op::OpTypeFloat
        | Op::OpTypeVector
        | Op::OpTypeMatrix
        | Op::OpTypeArray
        | Op::OpTypeStruct
        | Op::OpTypePointer
        | Op::OpTypeFunction => ResultShape::IdOnly,

        _ => ResultShape::TypeAndId,
    }
}

/// Walks the whole instruction stream once, building type/constant/variable
/// tables and, for every `OpFunction`, a flat instruction list up to (and
/// including) its terminating `OpFunctionEnd`.
pub fn reflect(module: &SpirvModule) -> Reflection {
    let mut types = HashMap::new();
    let mut constants = HashMap::new();
    let mut variables: HashMap<Id, VariableInfo> = HashMap::new();
    let mut entry_points = Vec::new();
    let mut functions: HashMap<Id, Vec<ParsedInstruction>> = HashMap::new();

    let mut current_function: Option<Id> = None;
    let mut current_body: Vec<ParsedInstruction> = Vec::new();

    for mut instr in module.instructions() {
        let op = Op::from_word(instr.opcode as u32);
        let (result_type, result) = match result_shape(op) {
            ResultShape::IdOnly => (None, instr.next_word()),
            ResultShape::TypeAndId => (instr.next_word(), instr.next_word()),
            ResultShape::None => (None, None),
        };
        let mut operands = Vec::new();
        while let Some(word) = instr.next_word() {
            operands.push(word);
        }

        match op {
            Op::OpTypeVoid => {
                types.insert(result.unwrap(), TypeInfo::Void);
            }
            Op::OpTypeBool => {
                types.insert(result.unwrap(), TypeInfo::Bool);
            }
            Op::OpTypeInt => {
                let signed = operands.get(1).copied().unwrap_or(0) != 0;
                types.insert(result.unwrap(), TypeInfo::Int { signed });
            }
            Op::OpTypeFloat => {
                types.insert(result.unwrap(), TypeInfo::Float);
            }
            Op::OpTypeVector => {
                types.insert(result.unwrap(), TypeInfo::Vector { component: operands[0], count: operands[1] });
            }
            Op::OpTypeMatrix => {
                types.insert(result.unwrap(), TypeInfo::Matrix { column: operands[0], count: operands[1] });
            }
            Op::OpTypeArray => {
                types.insert(result.unwrap(), TypeInfo::Array { element: operands[0] });
            }
            Op::OpTypeStruct => {
                types.insert(result.unwrap(), TypeInfo::Struct { members: operands.clone() });
            }
            Op::OpTypePointer => {
                let storage = StorageClass::from_word(operands[0]);
                types.insert(result.unwrap(), TypeInfo::Pointer { storage: storage.unwrap_or(StorageClass::Function), pointee: operands[1] });
            }
            Op::OpTypeFunction => {
                types.insert(result.unwrap(), TypeInfo::Function);
            }
            Op::OpConstant => {
                let id = result.unwrap();
                let ty = types.get(&result_type.unwrap());
                let value = match ty {
                    Some(TypeInfo::Float) => crate::interp::Value::Float(f32::from_bits(operands[0])),
                    Some(TypeInfo::Int { signed: true }) => crate::interp::Value::Int(operands[0] as i32),
                    Some(TypeInfo::Int { signed: false }) => crate::interp::Value::Int(operands[0] as i32),
                    _ => crate::interp::Value::Int(operands.get(0).copied().unwrap_or(0) as i32),
                };
                constants.insert(id, value);
            }
            Op::OpConstantComposite => {
                let id = result.unwrap();
                let components: Vec<f32> = operands
                    .iter()
                    .filter_map(|component_id| match constants.get(component_id) {
                        Some(crate::interp::Value::Float(v)) => Some(*v),
                        Some(crate::interp::Value::Int(v)) => Some(*v as f32),
                        _ => None,
                    })
                    .collect();
                constants.insert(id, crate::interp::Value::Vector(components));
            }
            Op::OpVariable => {
                let id = result.unwrap();
                let storage_class = operands.get(0).and_then(|w| StorageClass::from_word(*w));
                variables.insert(
                    id,
                    VariableInfo { type_id: result_type.unwrap(), storage_class, location: None, builtin: None },
                );
            }
            Op::OpDecorate => {
                let target = operands[0];
                if let Some(decoration) = Decoration::from_word(operands[1]) {
                    let entry = variables.entry(target).or_default();
                    match decoration {
                        Decoration::Location => entry.location = operands.get(2).copied(),
                        Decoration::BuiltIn => entry.builtin = operands.get(2).and_then(|w| BuiltIn::from_word(*w)),
                        Decoration::Binding | Decoration::DescriptorSet => {}
                    }
                }
            }
            Op::OpEntryPoint => {
                let execution_model = ExecutionModel::from_word(operands[0]).unwrap_or(ExecutionModel::Vertex);
                let function_id = operands[1];
                let mut cursor_operands = operands[2..].to_vec();
                // The entry point name is a literal string; its word count
                // was already folded into `operands` above, so recover the
                // name by scanning for the first null byte ourselves.
                let name = literal_string_from_words(&mut cursor_operands);
                let interface = cursor_operands;
                entry_points.push(EntryPointInfo { name, execution_model, function_id, interface });
            }
            Op::OpFunction => {
                current_function = result;
                current_body = Vec::new();
            }
            Op::OpFunctionEnd => {
                if let Some(id) = current_function.take() {
                    functions.insert(id, std::mem::take(&mut current_body));
                }
            }
            _ => {}
        }

        if current_function.is_some() && !matches!(op, Op::OpFunction) {
            current_body.push(ParsedInstruction { op, result_type, result, operands });
        }
    }

    Reflection { types, constants, variables, entry_points, functions }
}

/// Recovers a null-terminated, four-bytes-per-word literal string from a
/// slice of words already read off the operand cursor (used for
/// `OpEntryPoint`, whose name sits between the function id and the
/// interface id list — spec §6's packing rule applies here same as
/// anywhere else a literal string appears).
fn literal_string_from_words(words: &mut Vec<Id>) -> String {
    let mut bytes = Vec::new();
    let mut consumed = 0;
    'outer: for word in words.iter() {
        consumed += 1;
        for b in word.to_ne_bytes() {
            if b == 0 {
                break 'outer;
            }
            bytes.push(b);
        }
    }
    words.drain(0..consumed);
    String::from_utf8_lossy(&bytes).into_owned()
}

pub struct ShaderModule {
    pub words: Vec<swvk_spirv::Word>,
    pub reflection: Reflection,
}

impl ShaderModule {
    /// Spec §4.8: validation here is confined to the magic word and
    /// word-count consistency; semantic validation (do the declared entry
    /// points actually exist, do interface variables resolve) is deferred to
    /// `GraphicsPipeline::make`.
    pub fn make(bytes: &[u8]) -> Result<Arc<ShaderModule>, PipelineError> {
        let module = SpirvModule::load(bytes).map_err(|e| PipelineError::InvalidShader(e.to_string()))?;
        let reflection = reflect(&module);
        Ok(Arc::new(ShaderModule { words: module.words, reflection }))
    }

    pub fn entry_point(&self, name: &str, execution_model: ExecutionModel) -> Option<&EntryPointInfo> {
        self.reflection.entry_points.iter().find(|e| e.name == name && e.execution_model == execution_model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_word(word_count: u16, opcode: u16) -> u32 {
        ((word_count as u32) << 16) | opcode as u32
    }

    /// A minimal module: `OpEntryPoint Vertex %4 "main"`, one `OpFunction`
    /// with a lone `OpReturn`, and nothing else.
    fn minimal_vertex_shader_words() -> Vec<u32> {
        let mut words = vec![swvk_spirv::MAGIC_NUMBER, 0x0001_0000, 0, 5, 0];
        // %1 = OpTypeVoid
        words.push(header_word(2, 19));
        words.push(1);
        // %2 = OpTypeFunction %1
        words.push(header_word(3, 33));
        words.push(2);
        words.push(1);
        // OpEntryPoint Vertex %4 "main"
        let mut name_bytes = [0u8; 4];
        name_bytes[..4].copy_from_slice(b"main");
        words.push(header_word(5, 15));
        words.push(0); // Vertex
        words.push(4); // entry point function id
        words.push(u32::from_ne_bytes(name_bytes));
        words.push(0); // null terminator word
        // %4 = OpFunction %1 None %2
        words.push(header_word(5, 54));
        words.push(1);
        words.push(4);
        words.push(0);
        words.push(2);
        // OpLabel %5
        words.push(header_word(2, 248));
        words.push(5);
        // OpReturn
        words.push(header_word(1, 253));
        // OpFunctionEnd
        words.push(header_word(1, 56));
        words
    }

    fn to_le_bytes(words: &[u32]) -> Vec<u8> {
        words.iter().flat_map(|w| w.to_le_bytes()).collect()
    }

    #[test]
    fn reflects_entry_point_name_and_function_body() {
        let bytes = to_le_bytes(&minimal_vertex_shader_words());
        let shader = ShaderModule::make(&bytes).unwrap();
        let entry = shader.entry_point("main", ExecutionModel::Vertex).unwrap();
        assert_eq!(entry.function_id, 4);
        let body = shader.reflection.functions.get(&4).unwrap();
        assert!(body.iter().any(|i| matches!(i.op, Op::OpReturn)));
    }
}
