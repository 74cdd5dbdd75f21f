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

//! `GrammarReader`: loads the grammar JSON files from a directory and
//! validates them into a [`TopLevel`] AST, attaching a walked-JSON-path
//! breadcrumb to every error so a diagnostic can point at e.g.
//! `root["operand_kinds"][7]["enumerants"][3]["parameters"]`.

use crate::ast::*;
use crate::error::{FilesystemError, JsonPath, ParseError};
use std::path::Path;
use swvk_json::{JsonValue, Location};

const CORE_GRAMMAR_FILE_NAME: &str = "spirv.core.grammar.json";

pub struct GrammarFiles {
    pub core: std::sync::Arc<swvk_json::Source>,
    pub extension_instruction_sets: Vec<std::sync::Arc<swvk_json::Source>>,
}

pub struct GrammarReader;

impl GrammarReader {
    /// Opens the core grammar file plus every `extinst.*.grammar.json` file
    /// in `directory`.
    pub fn read_required_files(directory: &Path) -> Result<GrammarFiles, FilesystemError> {
        let core_path = directory.join(CORE_GRAMMAR_FILE_NAME);
        let core = swvk_json::Source::load_file(&core_path).map_err(|e| FilesystemError {
            path: core_path.clone(),
            message: e.to_string(),
        })?;

        let mut extension_instruction_sets = Vec::new();
        let read_dir = std::fs::read_dir(directory).map_err(|e| FilesystemError {
            path: directory.to_path_buf(),
            message: e.to_string(),
        })?;
        let mut extinst_paths = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| FilesystemError { path: directory.to_path_buf(), message: e.to_string() })?;
            let file_name = entry.file_name();
            let file_name = file_name.to_string_lossy();
            if file_name.starts_with("extinst.") && file_name.ends_with(".grammar.json") {
                extinst_paths.push(entry.path());
            }
        }
        extinst_paths.sort();
        for path in extinst_paths {
            let source = swvk_json::Source::load_file(&path).map_err(|e| FilesystemError { path: path.clone(), message: e.to_string() })?;
            extension_instruction_sets.push(source);
        }
        Ok(GrammarFiles { core, extension_instruction_sets })
    }

    /// Parses the core grammar together with any extension instruction set
    /// grammars into one [`TopLevel`].
    pub fn parse(files: &GrammarFiles) -> Result<TopLevel, crate::error::GrammarError> {
        let core_value = swvk_json::parse(&files.core, swvk_json::ParseOptions::strict())?;
        let mut top_level = parse_core_grammar(&core_value)?;
        for source in &files.extension_instruction_sets {
            let value = swvk_json::parse(source, swvk_json::ParseOptions::strict())?;
            let import_name = source
                .file_name()
                .rsplit('/')
                .next()
                .unwrap_or(source.file_name())
                .trim_start_matches("extinst.")
                .trim_end_matches(".grammar.json")
                .to_string();
            let ext_set = parse_extension_instruction_set(&value, import_name)?;
            top_level.extension_instruction_sets.push(ext_set);
        }
        Ok(top_level)
    }
}

fn err(location: &Location, path: &JsonPath, message: impl Into<String>) -> ParseError {
    ParseError { location: location.clone(), path: path.clone(), message: message.into() }
}

fn get_object<'a>(value: &'a JsonValue, path: &JsonPath) -> Result<&'a [(String, JsonValue)], ParseError> {
    value.as_object().ok_or_else(|| err(&value.location, path, "expected a JSON object"))
}

fn get_array<'a>(value: &'a JsonValue, path: &JsonPath) -> Result<&'a [JsonValue], ParseError> {
    value.as_array().ok_or_else(|| err(&value.location, path, "expected a JSON array"))
}

fn get_str<'a>(value: &'a JsonValue, path: &JsonPath) -> Result<&'a str, ParseError> {
    value.as_str().ok_or_else(|| err(&value.location, path, "expected a JSON string"))
}

fn get_u32(value: &JsonValue, path: &JsonPath) -> Result<u32, ParseError> {
    let n = value.as_number().ok_or_else(|| err(&value.location, path, "expected a JSON number"))?;
    Ok(n as u32)
}

fn get_key<'a>(entries: &'a [(String, JsonValue)], key: &'static str, on: &JsonValue, path: &JsonPath) -> Result<&'a JsonValue, ParseError> {
    entries
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v)
        .ok_or_else(|| err(&on.location, path, format!("missing required key \"{}\"", key)))
}

fn get_key_opt<'a>(entries: &'a [(String, JsonValue)], key: &str) -> Option<&'a JsonValue> {
    entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
}

fn check_unknown_keys(entries: &[(String, JsonValue)], allowed: &[&str], on: &JsonValue, path: &JsonPath) -> Result<(), ParseError> {
    for (key, _) in entries {
        if !allowed.contains(&key.as_str()) {
            return Err(err(&on.location, path, format!("unknown key \"{}\"", key)));
        }
    }
    Ok(())
}

fn parse_core_grammar(value: &JsonValue) -> Result<TopLevel, ParseError> {
    let path = JsonPath::root();
    let entries = get_object(value, &path)?;
    check_unknown_keys(
        entries,
        &["copyright", "magic_number", "major_version", "minor_version", "revision", "instructions", "operand_kinds"],
        value,
        &path,
    )?;

    let copyright = parse_copyright(get_key(entries, "copyright", value, &path)?, &path.child_key("copyright"))?;
    let magic_number = parse_magic_number(get_key(entries, "magic_number", value, &path)?, &path.child_key("magic_number"))?;
    let major_version = get_u32(get_key(entries, "major_version", value, &path)?, &path.child_key("major_version"))?;
    let minor_version = get_u32(get_key(entries, "minor_version", value, &path)?, &path.child_key("minor_version"))?;
    let revision = get_u32(get_key(entries, "revision", value, &path)?, &path.child_key("revision"))?;

    let instructions_path = path.child_key("instructions");
    let instructions_value = get_key(entries, "instructions", value, &path)?;
    let mut instructions = Vec::new();
    for (i, item) in get_array(instructions_value, &instructions_path)?.iter().enumerate() {
        instructions.push(parse_instruction(item, &instructions_path.child_index(i))?);
    }

    let operand_kinds_path = path.child_key("operand_kinds");
    let operand_kinds_value = get_key(entries, "operand_kinds", value, &path)?;
    let mut operand_kinds = Vec::new();
    for (i, item) in get_array(operand_kinds_value, &operand_kinds_path)?.iter().enumerate() {
        operand_kinds.push(parse_operand_kind(item, &operand_kinds_path.child_index(i))?);
    }

    Ok(TopLevel {
        copyright,
        magic_number,
        major_version,
        minor_version,
        revision,
        instructions,
        operand_kinds,
        extension_instruction_sets: Vec::new(),
    })
}

fn parse_copyright(value: &JsonValue, path: &JsonPath) -> Result<Copyright, ParseError> {
    let mut lines = Vec::new();
    for (i, item) in get_array(value, path)?.iter().enumerate() {
        lines.push(get_str(item, &path.child_index(i))?.to_string());
    }
    Ok(Copyright { lines })
}

fn parse_magic_number(value: &JsonValue, path: &JsonPath) -> Result<u32, ParseError> {
    let text = get_str(value, path)?;
    let digits = text.trim_start_matches("0x").trim_start_matches("0X");
    u32::from_str_radix(digits, 16).map_err(|_| err(&value.location, path, "magic_number is not a valid hex literal"))
}

fn parse_quantifier_suffix(kind: &str) -> (String, Quantifier) {
    if let Some(base) = kind.strip_suffix('*') {
        (base.to_string(), Quantifier::Variadic)
    } else if let Some(base) = kind.strip_suffix('?') {
        (base.to_string(), Quantifier::Optional)
    } else {
        (kind.to_string(), Quantifier::One)
    }
}

fn parse_instruction(value: &JsonValue, path: &JsonPath) -> Result<Instruction, ParseError> {
    let entries = get_object(value, path)?;
    let opname = get_str(get_key(entries, "opname", value, path)?, &path.child_key("opname"))?.to_string();
    let opcode = get_u32(get_key(entries, "opcode", value, path)?, &path.child_key("opcode"))?;

    let mut operands = Vec::new();
    if let Some(operands_value) = get_key_opt(entries, "operands") {
        let operands_path = path.child_key("operands");
        for (i, item) in get_array(operands_value, &operands_path)?.iter().enumerate() {
            let item_path = operands_path.child_index(i);
            let item_entries = get_object(item, &item_path)?;
            let raw_kind = get_str(get_key(item_entries, "kind", item, &item_path)?, &item_path.child_key("kind"))?;
            let (kind, quantifier) = parse_quantifier_suffix(raw_kind);
            let name = get_key_opt(item_entries, "name").map(|v| get_str(v, &item_path.child_key("name")).map(str::to_string)).transpose()?;
            operands.push(InstructionOperand { kind, name, quantifier });
        }
    }

    let capabilities = parse_string_list_opt(entries, "capabilities", path)?;
    let extensions = parse_string_list_opt(entries, "extensions", path)?;

    Ok(Instruction { opname, opcode, operands, capabilities, extensions })
}

fn parse_string_list_opt(entries: &[(String, JsonValue)], key: &'static str, path: &JsonPath) -> Result<Vec<String>, ParseError> {
    match get_key_opt(entries, key) {
        None => Ok(Vec::new()),
        Some(value) => {
            let list_path = path.child_key(key);
            let mut out = Vec::new();
            for (i, item) in get_array(value, &list_path)?.iter().enumerate() {
                out.push(get_str(item, &list_path.child_index(i))?.to_string());
            }
            Ok(out)
        }
    }
}

fn parse_operand_kind(value: &JsonValue, path: &JsonPath) -> Result<OperandKind, ParseError> {
    let entries = get_object(value, path)?;
    let category_text = get_str(get_key(entries, "category", value, path)?, &path.child_key("category"))?;
    let category = Category::from_json_name(category_text)
        .ok_or_else(|| err(&value.location, &path.child_key("category"), format!("unknown operand kind category \"{}\"", category_text)))?;
    let kind = get_str(get_key(entries, "kind", value, path)?, &path.child_key("kind"))?.to_string();

    let payload = if category.is_enum() {
        let enumerants_value = get_key(entries, "enumerants", value, path)?;
        let enumerants_path = path.child_key("enumerants");
        let mut enumerants = Vec::new();
        for (i, item) in get_array(enumerants_value, &enumerants_path)?.iter().enumerate() {
            enumerants.push(parse_enumerant(item, &enumerants_path.child_index(i))?);
        }
        OperandKindPayload::Enumerants(enumerants)
    } else if matches!(category, Category::Id | Category::Literal) {
        let doc = get_key_opt(entries, "doc").map(|v| get_str(v, &path.child_key("doc")).map(str::to_string)).transpose()?.unwrap_or_default();
        OperandKindPayload::Doc(doc)
    } else {
        let bases_value = get_key(entries, "bases", value, path)?;
        let bases_path = path.child_key("bases");
        let mut bases = Vec::new();
        for (i, item) in get_array(bases_value, &bases_path)?.iter().enumerate() {
            bases.push(get_str(item, &bases_path.child_index(i))?.to_string());
        }
        OperandKindPayload::Bases(bases)
    };

    Ok(OperandKind { category, kind, payload })
}

fn parse_enumerant(value: &JsonValue, path: &JsonPath) -> Result<Enumerant, ParseError> {
    let entries = get_object(value, path)?;
    let enumerant = get_str(get_key(entries, "enumerant", value, path)?, &path.child_key("enumerant"))?.to_string();
    let value_field = get_key(entries, "value", value, path)?;
    let parsed_value = match &value_field.kind {
        swvk_json::ValueKind::Number(n) => *n as u32,
        swvk_json::ValueKind::String(s) => {
            let digits = s.trim_start_matches("0x").trim_start_matches("0X");
            u32::from_str_radix(digits, 16).map_err(|_| err(&value_field.location, &path.child_key("value"), "value is not a valid hex literal"))?
        }
        _ => return Err(err(&value_field.location, &path.child_key("value"), "expected a number or hex string")),
    };

    let capabilities = parse_string_list_opt(entries, "capabilities", path)?;
    let extensions = parse_string_list_opt(entries, "extensions", path)?;

    let mut parameters = Vec::new();
    if let Some(parameters_value) = get_key_opt(entries, "parameters") {
        let parameters_path = path.child_key("parameters");
        for (i, item) in get_array(parameters_value, &parameters_path)?.iter().enumerate() {
            let item_path = parameters_path.child_index(i);
            let item_entries = get_object(item, &item_path)?;
            let kind = get_str(get_key(item_entries, "kind", item, &item_path)?, &item_path.child_key("kind"))?.to_string();
            let name = get_key_opt(item_entries, "name").map(|v| get_str(v, &item_path.child_key("name")).map(str::to_string)).transpose()?;
            parameters.push(Parameter { kind, name });
        }
    }

    Ok(Enumerant { value: parsed_value, enumerant, capabilities, extensions, parameters })
}

fn parse_extension_instruction_set(value: &JsonValue, import_name: String) -> Result<ExtensionInstructionSet, ParseError> {
    let path = JsonPath::root();
    let entries = get_object(value, &path)?;
    let revision = get_u32(get_key(entries, "revision", value, &path)?, &path.child_key("revision"))?;
    let version = get_key_opt(entries, "version").map(|v| get_u32(v, &path.child_key("version"))).transpose()?;

    let instructions_path = path.child_key("instructions");
    let instructions_value = get_key(entries, "instructions", value, &path)?;
    let mut instructions = Vec::new();
    for (i, item) in get_array(instructions_value, &instructions_path)?.iter().enumerate() {
        instructions.push(parse_instruction(item, &instructions_path.child_index(i))?);
    }

    Ok(ExtensionInstructionSet { import_name, version, revision, instructions })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_str(text: &str) -> Result<TopLevel, ParseError> {
        let source = swvk_json::Source::from_str("t", text);
        let value = swvk_json::parse(&source, swvk_json::ParseOptions::strict()).unwrap();
        parse_core_grammar(&value)
    }

    #[test]
    fn parses_minimal_grammar() {
        let top_level = parse_str(
            r#"{
                "copyright": ["c1"],
                "magic_number": "0x07230203",
                "major_version": 1,
                "minor_version": 2,
                "revision": 3,
                "instructions": [
                    {"opname": "OpNop", "opcode": 0}
                ],
                "operand_kinds": [
                    {"category": "ValueEnum", "kind": "K", "enumerants": [
                        {"enumerant": "A", "value": 0},
                        {"enumerant": "B", "value": 1}
                    ]},
                    {"category": "Literal", "kind": "Lit", "doc": "a literal"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(top_level.magic_number, 0x0723_0203);
        assert_eq!(top_level.instructions.len(), 1);
        assert_eq!(top_level.operand_kinds.len(), 2);
    }

    #[test]
    fn rejects_unknown_top_level_key() {
        let result = parse_str(
            r#"{
                "copyright": [], "magic_number": "0x1", "major_version": 1,
                "minor_version": 0, "revision": 0, "instructions": [], "operand_kinds": [],
                "bogus": true
            }"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn error_path_points_at_the_failing_enumerant() {
        let err = parse_str(
            r#"{
                "copyright": [], "magic_number": "0x1", "major_version": 1,
                "minor_version": 0, "revision": 0, "instructions": [],
                "operand_kinds": [
                    {"category": "ValueEnum", "kind": "K", "enumerants": [
                        {"enumerant": "A", "value": "not hex and not number"}
                    ]}
                ]
            }"#,
        )
        .unwrap_err();
        assert_eq!(err.path.to_string(), "root[\"operand_kinds\"][0][\"enumerants\"][0][\"value\"]");
    }
}
