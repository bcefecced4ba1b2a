use blockduino_core::cli::Args;
use blockduino_core::error::CodegenError;
use blockduino_core::rules::math::PRIME_HELPER;
use blockduino_core::{generate_file, generate_source, run_cli};
use std::fs;

const COUNTER_WORKSPACE: &str = r#"{
    "blocks": {
        "languageVersion": 0,
        "blocks": [
            {
                "type": "math_change",
                "id": "change",
                "fields": {"VAR": {"id": "v1"}},
                "inputs": {
                    "DELTA": {
                        "shadow": {"type": "math_number", "fields": {"NUM": 1}},
                        "block": {
                            "type": "math_arithmetic",
                            "fields": {"OP": "POWER"},
                            "inputs": {
                                "A": {"shadow": {"type": "math_number", "fields": {"NUM": 2}}},
                                "B": {"shadow": {"type": "math_number", "fields": {"NUM": 3}}}
                            }
                        }
                    }
                },
                "next": {
                    "block": {
                        "type": "math_number_property",
                        "fields": {"PROPERTY": "PRIME"},
                        "inputs": {
                            "NUMBER_TO_CHECK": {"block": {"type": "math_number", "fields": {"NUM": 7}}}
                        }
                    }
                }
            },
            {
                "type": "text_append",
                "fields": {"VAR": {"id": "v2"}},
                "inputs": {
                    "TEXT": {
                        "block": {
                            "type": "text_indexOf",
                            "fields": {"END": "FIRST"},
                            "inputs": {
                                "VALUE": {"block": {"type": "text", "fields": {"TEXT": "ab"}}},
                                "FIND": {"block": {"type": "text", "fields": {"TEXT": "b"}}}
                            }
                        }
                    }
                }
            }
        ]
    },
    "variables": [
        {"name": "count", "id": "v1"},
        {"name": "label", "id": "v2", "type": "String"}
    ]
}"#;

fn expected_counter_sketch(index_suffix: &str, indent: &str) -> String {
    format!(
        "#define _USE_MATH_DEFINES\n#include \"math.h\"\n\n\
         int count;\nString label;\n\n\
         {helper}\n\
         void setup() {{\n}}\n\n\
         void loop() {{\n\
         {indent}count += pow(2, 3);\n\
         {indent}mathIsPrime(7);\n\
         {indent}label = String(label) + String(String(\"ab\").indexOf(String(\"b\")){suffix});\n\
         }}\n",
        helper = PRIME_HELPER,
        indent = indent,
        suffix = index_suffix,
    )
}

#[test]
fn whole_workspace_becomes_a_sketch() {
    let sketch = generate_source(COUNTER_WORKSPACE).unwrap();
    assert_eq!(sketch, expected_counter_sketch(" + 1", "  "));
}

#[test]
fn workspace_option_turns_off_one_based_indices() {
    let source = COUNTER_WORKSPACE.replacen(
        "\"variables\"",
        "\"options\": {\"oneBasedIndex\": false},\n    \"variables\"",
        1,
    );
    let sketch = generate_source(&source).unwrap();
    assert_eq!(sketch, expected_counter_sketch("", "  "));
}

#[test]
fn empty_workspace_still_has_setup_and_loop() {
    assert_eq!(
        generate_source("{}").unwrap(),
        "void setup() {\n}\n\nvoid loop() {\n}\n"
    );
}

#[test]
fn generate_file_reads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("counter.json");
    fs::write(&path, COUNTER_WORKSPACE).unwrap();
    assert_eq!(
        generate_file(&path).unwrap(),
        expected_counter_sketch(" + 1", "  ")
    );
}

#[test]
fn missing_input_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let err = generate_file(&dir.path().join("absent.json")).unwrap_err();
    assert!(err.to_string().starts_with("Input file not found"));
}

#[test]
fn cli_writes_sketch_with_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("counter.json");
    let output = dir.path().join("build").join("counter.ino");
    fs::write(&input, COUNTER_WORKSPACE).unwrap();

    let args = Args {
        input,
        output: Some(output.clone()),
        zero_based_index: true,
        indent: 4,
    };
    run_cli(&args).unwrap();
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        expected_counter_sketch("", "    ")
    );
}

#[test]
fn nested_unknown_operator_aborts_the_pass() {
    let source = r#"{"blocks": {"blocks": [
        {"type": "math_change", "fields": {"VAR": "x"}, "inputs": {
            "DELTA": {"block": {"type": "math_single", "fields": {"OP": "CBRT"}}}
        }}
    ]}}"#;
    let err = generate_source(source).unwrap_err();
    assert_eq!(
        err.downcast_ref::<CodegenError>(),
        Some(&CodegenError::UnknownOperator {
            block_type: "math_single".to_string(),
            operator: "CBRT".to_string(),
        })
    );
}

#[test]
fn unhandled_char_at_position_aborts_the_pass() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("char.json");
    fs::write(
        &path,
        r#"{"blocks": {"blocks": [{"type": "text_charAt", "fields": {"WHERE": "RANDOM"}}]}}"#,
    )
    .unwrap();
    let err = generate_file(&path).unwrap_err();
    assert_eq!(
        err.downcast_ref::<CodegenError>(),
        Some(&CodegenError::UnhandledOption {
            block_type: "text_charAt".to_string(),
            option: "RANDOM".to_string(),
        })
    );
    assert!(err.to_string().starts_with("Code generation failed for"));
}

#[test]
fn unsupported_block_category_is_rejected() {
    let source = r#"{"blocks": {"blocks": [{"type": "controls_if"}]}}"#;
    let err = generate_source(source).unwrap_err();
    assert_eq!(
        err.downcast_ref::<CodegenError>(),
        Some(&CodegenError::UnknownBlockType("controls_if".to_string()))
    );
}
