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

//! The typed representation of a SPIR-V grammar file: everything
//! `GrammarReader` validates into and `GrammarCodegen` reads back out of.

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Copyright {
    pub lines: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    BitEnum,
    ValueEnum,
    Id,
    Literal,
    Composite,
}

impl Category {
    pub fn json_name(self) -> &'static str {
        match self {
            Category::BitEnum => "BitEnum",
            Category::ValueEnum => "ValueEnum",
            Category::Id => "Id",
            Category::Literal => "Literal",
            Category::Composite => "Composite",
        }
    }

    pub fn from_json_name(name: &str) -> Option<Category> {
        match name {
            "BitEnum" => Some(Category::BitEnum),
            "ValueEnum" => Some(Category::ValueEnum),
            "Id" => Some(Category::Id),
            "Literal" => Some(Category::Literal),
            "Composite" => Some(Category::Composite),
            _ => None,
        }
    }

    pub fn is_enum(self) -> bool {
        matches!(self, Category::BitEnum | Category::ValueEnum)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parameter {
    pub kind: String,
    pub name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Enumerant {
    pub value: u32,
    pub enumerant: String,
    pub capabilities: Vec<String>,
    pub extensions: Vec<String>,
    pub parameters: Vec<Parameter>,
}

/// The payload carried by an [`OperandKind`], tagged by its [`Category`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OperandKindPayload {
    Enumerants(Vec<Enumerant>),
    Doc(String),
    Bases(Vec<String>),
}

impl OperandKindPayload {
    pub fn matches_category(&self, category: Category) -> bool {
        match (category, self) {
            (Category::BitEnum, OperandKindPayload::Enumerants(_))
            | (Category::ValueEnum, OperandKindPayload::Enumerants(_)) => true,
            (Category::Id, OperandKindPayload::Doc(_)) | (Category::Literal, OperandKindPayload::Doc(_)) => true,
            (Category::Composite, OperandKindPayload::Bases(_)) => true,
            _ => false,
        }
    }

    pub fn as_enumerants(&self) -> Option<&[Enumerant]> {
        match self {
            OperandKindPayload::Enumerants(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_enumerants_mut(&mut self) -> Option<&mut Vec<Enumerant>> {
        match self {
            OperandKindPayload::Enumerants(v) => Some(v),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperandKind {
    pub category: Category,
    pub kind: String,
    pub payload: OperandKindPayload,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quantifier {
    One,
    Optional,
    Variadic,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstructionOperand {
    pub kind: String,
    pub name: Option<String>,
    pub quantifier: Quantifier,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instruction {
    pub opname: String,
    pub opcode: u32,
    pub operands: Vec<InstructionOperand>,
    pub capabilities: Vec<String>,
    pub extensions: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtensionInstructionSet {
    pub import_name: String,
    pub version: Option<u32>,
    pub revision: u32,
    pub instructions: Vec<Instruction>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopLevel {
    pub copyright: Copyright,
    pub magic_number: u32,
    pub major_version: u32,
    pub minor_version: u32,
    pub revision: u32,
    pub instructions: Vec<Instruction>,
    pub operand_kinds: Vec<OperandKind>,
    pub extension_instruction_sets: Vec<ExtensionInstructionSet>,
}

impl TopLevel {
    pub fn operand_kind(&self, kind: &str) -> Option<&OperandKind> {
        self.operand_kinds.iter().find(|k| k.kind == kind)
    }

    pub fn operand_kind_mut(&mut self, kind: &str) -> Option<&mut OperandKind> {
        self.operand_kinds.iter_mut().find(|k| k.kind == kind)
    }
}
