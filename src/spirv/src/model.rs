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

//! The SPIR-V data model `GrammarCodegen` generates (spec §3, "Generated
//! SPIR-V model"). `swvk-spirv-grammar` emits this shape mechanically from
//! `spirv.core.grammar.json`; this crate carries a hand-authored instance of
//! that shape; scoped to the opcodes and enumerants `swvk_pipeline` actually
//! interprets, rather than the full instruction set, since nothing in this
//! workspace invokes the generator as a build step. Each type's doc comment
//! names the grammar enum it stands in for.

pub type Word = u32;
pub type Id = Word;

/// `spirv.core.grammar.json`'s `SourceLanguage` `ValueEnum`, trimmed to the
/// enumerants this crate's loader ever has to recognize.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum Op {
    OpNop = 0,
    OpName = 5,
    OpMemberName = 6,
    OpExtInstImport = 11,
    OpExtInst = 12,
    OpMemoryModel = 14,
    OpEntryPoint = 15,
    OpExecutionMode = 16,
    OpCapability = 17,
    OpTypeVoid = 19,
    OpTypeBool = 20,
    OpTypeInt = 21,
    OpTypeFloat = 22,
    OpTypeVector = 23,
    OpTypeMatrix = 24,
    OpTypeArray = 28,
    OpTypeStruct = 30,
    OpTypePointer = 32,
    OpTypeFunction = 33,
    OpConstantTrue = 41,
    OpConstantFalse = 42,
    OpConstant = 43,
    OpConstantComposite = 44,
    OpFunction = 54,
    OpFunctionParameter = 55,
    OpFunctionEnd = 56,
    OpFunctionCall = 57,
    OpVariable = 59,
    OpLoad = 61,
    OpStore = 62,
    OpAccessChain = 65,
    OpDecorate = 71,
    OpMemberDecorate = 72,
    OpVectorShuffle = 79,
    OpCompositeConstruct = 80,
    OpCompositeExtract = 81,
    OpCompositeInsert = 82,
    OpTranspose = 84,
    OpFNegate = 127,
    OpIAdd = 128,
    OpFAdd = 129,
    OpISub = 130,
    OpFSub = 131,
    OpIMul = 132,
    OpFMul = 133,
    OpFDiv = 136,
    OpDot = 148,
    OpVectorTimesScalar = 142,
    OpMatrixTimesScalar = 143,
    OpVectorTimesMatrix = 144,
    OpMatrixTimesVector = 145,
    OpMatrixTimesMatrix = 146,
    OpLabel = 248,
    OpBranch = 249,
    OpBranchConditional = 250,
    OpReturn = 253,
    OpReturnValue = 254,
    Unknown = 0xffff,
}

impl Op {
    pub fn from_word(word: Word) -> Op {
        match word {
            0 => Op::OpNop,
            5 => Op::OpName,
            6 => Op::OpMemberName,
            11 => Op::OpExtInstImport,
            12 => Op::OpExtInst,
            14 => Op::OpMemoryModel,
            15 => Op::OpEntryPoint,
            16 => Op::OpExecutionMode,
            17 => Op::OpCapability,
            19 => Op::OpTypeVoid,
            20 => Op::OpTypeBool,
            21 => Op::OpTypeInt,
            22 => Op::OpTypeFloat,
            23 => Op::OpTypeVector,
            24 => Op::OpTypeMatrix,
            28 => Op::OpTypeArray,
            30 => Op::OpTypeStruct,
            32 => Op::OpTypePointer,
            33 => Op::OpTypeFunction,
            41 => Op::OpConstantTrue,
            42 => Op::OpConstantFalse,
            43 => Op::OpConstant,
            44 => Op::OpConstantComposite,
            54 => Op::OpFunction,
            55 => Op::OpFunctionParameter,
            56 => Op::OpFunctionEnd,
            57 => Op::OpFunctionCall,
            59 => Op::OpVariable,
            61 => Op::OpLoad,
            62 => Op::OpStore,
            65 => Op::OpAccessChain,
            71 => Op::OpDecorate,
            72 => Op::OpMemberDecorate,
            79 => Op::OpVectorShuffle,
            80 => Op::OpCompositeConstruct,
            81 => Op::OpCompositeExtract,
            82 => Op::OpCompositeInsert,
            84 => Op::OpTranspose,
            127 => Op::OpFNegate,
            128 => Op::OpIAdd,
            129 => Op::OpFAdd,
            130 => Op::OpISub,
            131 => Op::OpFSub,
            132 => Op::OpIMul,
            133 => Op::OpFMul,
            136 => Op::OpFDiv,
            142 => Op::OpVectorTimesScalar,
            143 => Op::OpMatrixTimesScalar,
            144 => Op::OpVectorTimesMatrix,
            145 => Op::OpMatrixTimesVector,
            146 => Op::OpMatrixTimesMatrix,
            148 => Op::OpDot,
            248 => Op::OpLabel,
            249 => Op::OpBranch,
            250 => Op::OpBranchConditional,
            253 => Op::OpReturn,
            254 => Op::OpReturnValue,
            _ => Op::Unknown,
        }
    }
}

/// `ExecutionModel` `ValueEnum`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ExecutionModel {
    Vertex = 0,
    TessellationControl = 1,
    TessellationEvaluation = 2,
    Geometry = 3,
    Fragment = 4,
    GlCompute = 5,
    Kernel = 6,
}

impl ExecutionModel {
    pub fn from_word(word: Word) -> Option<ExecutionModel> {
        match word {
            0 => Some(ExecutionModel::Vertex),
            1 => Some(ExecutionModel::TessellationControl),
            2 => Some(ExecutionModel::TessellationEvaluation),
            3 => Some(ExecutionModel::Geometry),
            4 => Some(ExecutionModel::Fragment),
            5 => Some(ExecutionModel::GlCompute),
            6 => Some(ExecutionModel::Kernel),
            _ => None,
        }
    }
}

/// `StorageClass` `ValueEnum`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum StorageClass {
    UniformConstant = 0,
    Input = 1,
    Uniform = 2,
    Output = 3,
    Function = 7,
    PushConstant = 9,
}

impl StorageClass {
    pub fn from_word(word: Word) -> Option<StorageClass> {
        match word {
            0 => Some(StorageClass::UniformConstant),
            1 => Some(StorageClass::Input),
            2 => Some(StorageClass::Uniform),
            3 => Some(StorageClass::Output),
            7 => Some(StorageClass::Function),
            9 => Some(StorageClass::PushConstant),
            _ => None,
        }
    }
}

/// `Decoration` `ValueEnum`, trimmed to the decorations the pipeline looks at
/// to resolve vertex attribute locations and the clip-space `BuiltIn`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Decoration {
    BuiltIn = 11,
    Location = 30,
    Binding = 33,
    DescriptorSet = 34,
}

impl Decoration {
    pub fn from_word(word: Word) -> Option<Decoration> {
        match word {
            11 => Some(Decoration::BuiltIn),
            30 => Some(Decoration::Location),
            33 => Some(Decoration::Binding),
            34 => Some(Decoration::DescriptorSet),
            _ => None,
        }
    }
}

/// `BuiltIn` `ValueEnum`, trimmed to `Position` which `run`'s vertex stage
/// must locate to drive clipping and the viewport transform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum BuiltIn {
    Position = 0,
    FragCoord = 15,
}

impl BuiltIn {
    pub fn from_word(word: Word) -> Option<BuiltIn> {
        match word {
            0 => Some(BuiltIn::Position),
            15 => Some(BuiltIn::FragCoord),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_known_opcodes() {
        assert_eq!(Op::from_word(15), Op::OpEntryPoint);
        assert_eq!(Op::from_word(253), Op::OpReturn);
    }

    #[test]
    fn unknown_opcode_decodes_to_unknown_rather_than_panicking() {
        assert_eq!(Op::from_word(0xdead), Op::Unknown);
    }
}
