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

//! The shader "executable" spec §4.8 treats as a black box: "Compilation is
//! a black box from this spec's perspective; what must hold is the
//! behavioral contract of `run`." This interpreter walks a reflected
//! function body over a value table keyed by SPIR-V result id, covering the
//! scoped arithmetic/memory opcodes `shader::reflect` recognizes. Control
//! flow is intentionally not modeled: entry points are assumed straight-line
//! (one block, no branches), which covers the vertex/fragment shaders the
//! demo ships.

use std::collections::HashMap;
use swvk_spirv::{Id, Op};

use crate::shader::{ParsedInstruction, ShaderModule};

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Float(f32),
    Int(i32),
    Vector(Vec<f32>),
    Matrix(Vec<Vec<f32>>),
}

impl Value {
    pub fn as_vector(&self) -> Vec<f32> {
        match self {
            Value::Float(v) => vec![*v],
            Value::Int(v) => vec![*v as f32],
            Value::Vector(v) => v.clone(),
            Value::Matrix(_) => Vec::new(),
        }
    }

    pub fn as_scalar(&self) -> f32 {
        match self {
            Value::Float(v) => *v,
            Value::Int(v) => *v as f32,
            Value::Vector(v) => v.first().copied().unwrap_or(0.0),
            Value::Matrix(_) => 0.0,
        }
    }
}

fn component_wise(a: &[f32], b: &[f32], f: impl Fn(f32, f32) -> f32) -> Vec<f32> {
    a.iter().zip(b.iter()).map(|(x, y)| f(*x, *y)).collect()
}

/// Multiplies a column-major matrix (a `Vec` of columns) by a vector.
fn matrix_times_vector(matrix: &[Vec<f32>], vector: &[f32]) -> Vec<f32> {
    let rows = matrix.first().map(|c| c.len()).unwrap_or(0);
    let mut out = vec![0.0; rows];
    for (col, scalar) in matrix.iter().zip(vector.iter()) {
        for (r, c) in col.iter().enumerate() {
            out[r] += c * scalar;
        }
    }
    out
}

fn matrix_times_matrix(lhs: &[Vec<f32>], rhs: &[Vec<f32>]) -> Vec<Vec<f32>> {
    rhs.iter().map(|column| matrix_times_vector(lhs, column)).collect()
}

/// Executes one entry point's function body. `inputs` supplies the initial
/// contents of every `Input`-storage-class `OpVariable` by its id (e.g. a
/// vertex attribute value, or an interpolated varying for the fragment
/// stage); `constants` come from the module's reflected constant table.
/// Returns the final contents of every variable touched, so the caller can
/// read back `Output`-storage-class variables (`gl_Position`, varyings, the
/// fragment color).
pub fn execute(
    shader: &ShaderModule,
    body: &[ParsedInstruction],
    inputs: &HashMap<Id, Value>,
) -> HashMap<Id, Value> {
    let mut variables: HashMap<Id, Value> = inputs.clone();
    let mut values: HashMap<Id, Value> = HashMap::new();

    for instr in body {
        match instr.op {
            Op::OpVariable => {
                let id = instr.result.unwrap();
                variables.entry(id).or_insert(Value::Float(0.0));
            }
            Op::OpLoad => {
                let pointer = instr.operands[0];
                let value = variables.get(&pointer).cloned().unwrap_or(Value::Float(0.0));
                values.insert(instr.result.unwrap(), value);
            }
            Op::OpStore => {
                let pointer = instr.operands[0];
                let object = instr.operands[1];
                let value = values.get(&object).or_else(|| shader.reflection.constants.get(&object)).cloned().unwrap_or(Value::Float(0.0));
                variables.insert(pointer, value);
            }
            Op::OpAccessChain => {
                // Struct/array indexing is not modeled: the base pointer's
                // value is forwarded unchanged, which is exact for the
                // common "one flat `in`/`out` variable per location" shape
                // the demo's shaders use.
                let base = instr.operands[0];
                let value = variables.get(&base).cloned().unwrap_or(Value::Float(0.0));
                values.insert(instr.result.unwrap(), value);
            }
            Op::OpCompositeConstruct => {
                let components: Vec<f32> = instr
                    .operands
                    .iter()
                    .flat_map(|id| lookup(&values, &variables, &shader.reflection.constants, *id).as_vector())
                    .collect();
                values.insert(instr.result.unwrap(), Value::Vector(components));
            }
            Op::OpCompositeExtract => {
                let composite = lookup(&values, &variables, &shader.reflection.constants, instr.operands[0]);
                let index = instr.operands[1] as usize;
                let component = composite.as_vector().get(index).copied().unwrap_or(0.0);
                values.insert(instr.result.unwrap(), Value::Float(component));
            }
            Op::OpVectorShuffle => {
                let a = lookup(&values, &variables, &shader.reflection.constants, instr.operands[0]).as_vector();
                let b = lookup(&values, &variables, &shader.reflection.constants, instr.operands[1]).as_vector();
                let combined: Vec<f32> = a.iter().chain(b.iter()).copied().collect();
                let shuffled: Vec<f32> = instr.operands[2..].iter().map(|i| combined.get(*i as usize).copied().unwrap_or(0.0)).collect();
                values.insert(instr.result.unwrap(), Value::Vector(shuffled));
            }
            Op::OpFAdd | Op::OpIAdd => {
                let (a, b) = binary_operands(instr, &values, &variables, &shader.reflection.constants);
                values.insert(instr.result.unwrap(), Value::Vector(component_wise(&a, &b, |x, y| x + y)));
            }
            Op::OpFSub | Op::OpISub => {
                let (a, b) = binary_operands(instr, &values, &variables, &shader.reflection.constants);
                values.insert(instr.result.unwrap(), Value::Vector(component_wise(&a, &b, |x, y| x - y)));
            }
            Op::OpFMul | Op::OpIMul => {
                let (a, b) = binary_operands(instr, &values, &variables, &shader.reflection.constants);
                values.insert(instr.result.unwrap(), Value::Vector(component_wise(&a, &b, |x, y| x * y)));
            }
            Op::OpFDiv => {
                let (a, b) = binary_operands(instr, &values, &variables, &shader.reflection.constants);
                values.insert(instr.result.unwrap(), Value::Vector(component_wise(&a, &b, |x, y| x / y)));
            }
            Op::OpFNegate => {
                let a = lookup(&values, &variables, &shader.reflection.constants, instr.operands[0]).as_vector();
                values.insert(instr.result.unwrap(), Value::Vector(a.iter().map(|x| -x).collect()));
            }
            Op::OpDot => {
                let a = lookup(&values, &variables, &shader.reflection.constants, instr.operands[0]).as_vector();
                let b = lookup(&values, &variables, &shader.reflection.constants, instr.operands[1]).as_vector();
                let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
                values.insert(instr.result.unwrap(), Value::Float(dot));
            }
            Op::OpVectorTimesScalar => {
                let vector = lookup(&values, &variables, &shader.reflection.constants, instr.operands[0]).as_vector();
                let scalar = lookup(&values, &variables, &shader.reflection.constants, instr.operands[1]).as_scalar();
                values.insert(instr.result.unwrap(), Value::Vector(vector.iter().map(|x| x * scalar).collect()));
            }
            Op::OpMatrixTimesVector => {
                let matrix = match lookup(&values, &variables, &shader.reflection.constants, instr.operands[0]) {
                    Value::Matrix(m) => m,
                    other => vec![other.as_vector()],
                };
                let vector = lookup(&values, &variables, &shader.reflection.constants, instr.operands[1]).as_vector();
                values.insert(instr.result.unwrap(), Value::Vector(matrix_times_vector(&matrix, &vector)));
            }
            Op::OpMatrixTimesMatrix => {
                let lhs = match lookup(&values, &variables, &shader.reflection.constants, instr.operands[0]) {
                    Value::Matrix(m) => m,
                    other => vec![other.as_vector()],
                };
                let rhs = match lookup(&values, &variables, &shader.reflection.constants, instr.operands[1]) {
                    Value::Matrix(m) => m,
                    other => vec![other.as_vector()],
                };
                values.insert(instr.result.unwrap(), Value::Matrix(matrix_times_matrix(&lhs, &rhs)));
            }
            Op::OpReturn | Op::OpReturnValue | Op::OpLabel => {}
            _ => {}
        }
    }

    variables
}

fn lookup(values: &HashMap<Id, Value>, variables: &HashMap<Id, Value>, constants: &HashMap<Id, Value>, id: Id) -> Value {
    values.get(&id).or_else(|| variables.get(&id)).or_else(|| constants.get(&id)).cloned().unwrap_or(Value::Float(0.0))
}

fn binary_operands(
    instr: &ParsedInstruction,
    values: &HashMap<Id, Value>,
    variables: &HashMap<Id, Value>,
    constants: &HashMap<Id, Value>,
) -> (Vec<f32>, Vec<f32>) {
    let a = lookup(values, variables, constants, instr.operands[0]).as_vector();
    let b = lookup(values, variables, constants, instr.operands[1]).as_vector();
    (a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_times_vector_applies_column_major_matrix() {
        // Identity matrix times (1, 2, 3) is (1, 2, 3).
        let identity = vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0], vec![0.0, 0.0, 1.0]];
        let result = matrix_times_vector(&identity, &[1.0, 2.0, 3.0]);
        assert_eq!(result, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn component_wise_add_matches_elementwise_sum() {
        let result = component_wise(&[1.0, 2.0], &[10.0, 20.0], |a, b| a + b);
        assert_eq!(result, vec![11.0, 22.0]);
    }
}
