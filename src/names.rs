use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

const RESERVED_WORDS: &[&str] = &[
    // C/C++
    "asm", "auto", "bool", "break", "case", "catch", "char", "class", "const", "const_cast",
    "continue", "default", "delete", "do", "double", "dynamic_cast", "else", "enum", "explicit",
    "export", "extern", "false", "float", "for", "friend", "goto", "if", "inline", "int", "long",
    "mutable", "namespace", "new", "operator", "private", "protected", "public", "register",
    "reinterpret_cast", "return", "short", "signed", "sizeof", "static", "static_cast", "struct",
    "switch", "template", "this", "throw", "true", "try", "typedef", "typeid", "typename",
    "union", "unsigned", "using", "virtual", "void", "volatile", "wchar_t", "while",
    // Arduino
    "setup", "loop", "HIGH", "LOW", "INPUT", "OUTPUT", "INPUT_PULLUP", "LED_BUILTIN", "boolean",
    "byte", "word", "String", "array", "pinMode", "digitalWrite", "digitalRead", "analogRead",
    "analogReference", "analogWrite", "tone", "noTone", "shiftOut", "shiftIn", "pulseIn",
    "millis", "micros", "delay", "delayMicroseconds", "min", "max", "abs", "constrain", "map",
    "pow", "sqrt", "sin", "cos", "tan", "random", "randomSeed", "lowByte", "highByte", "bitRead",
    "bitWrite", "bitSet", "bitClear", "bit", "attachInterrupt", "detachInterrupt", "interrupts",
    "noInterrupts", "Serial", "PROGMEM",
    // emitted by the math rules
    "log", "exp", "round", "ceil", "floor", "asin", "acos", "atan", "mathIsPrime",
];

#[derive(Debug, Clone)]
pub struct NameDb {
    reserved: HashSet<String>,
    assigned: HashMap<String, String>,
    taken: HashSet<String>,
}

impl Default for NameDb {
    fn default() -> Self {
        Self::new()
    }
}

impl NameDb {
    pub fn new() -> Self {
        Self {
            reserved: RESERVED_WORDS.iter().map(|w| w.to_string()).collect(),
            assigned: HashMap::new(),
            taken: HashSet::new(),
        }
    }

    /// Identifier for `name`; the same (case-insensitive) name always maps
    /// to the same identifier within one registry.
    pub fn get_name(&mut self, name: &str) -> String {
        let key = name.to_lowercase();
        if let Some(existing) = self.assigned.get(&key) {
            return existing.clone();
        }
        let distinct = self.get_distinct_name(name);
        self.assigned.insert(key, distinct.clone());
        distinct
    }

    pub fn get_distinct_name(&mut self, name: &str) -> String {
        let base = safe_name(name);
        let mut candidate = base.clone();
        let mut suffix = 2usize;
        while self.taken.contains(&candidate) || self.reserved.contains(&candidate) {
            candidate = format!("{}{}", base, suffix);
            suffix += 1;
        }
        self.taken.insert(candidate.clone());
        candidate
    }
}

fn identifier_filter() -> &'static Regex {
    static FILTER: OnceLock<Regex> = OnceLock::new();
    FILTER.get_or_init(|| Regex::new(r"[^A-Za-z0-9_]").expect("identifier filter pattern is valid"))
}

fn safe_name(name: &str) -> String {
    if name.is_empty() {
        return "unnamed".to_string();
    }
    let cleaned = identifier_filter().replace_all(name, "_").into_owned();
    if cleaned.starts_with(|c: char| c.is_ascii_digit()) {
        format!("my_{}", cleaned)
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn illegal_characters_become_underscores() {
        let mut names = NameDb::new();
        assert_eq!(names.get_name("my var!"), "my_var_");
        assert_eq!(names.get_name("héllo"), "h_llo");
    }

    #[test]
    fn leading_digit_and_empty_names() {
        let mut names = NameDb::new();
        assert_eq!(names.get_name("2nd"), "my_2nd");
        assert_eq!(names.get_name(""), "unnamed");
    }

    #[test]
    fn reserved_words_get_a_suffix() {
        let mut names = NameDb::new();
        assert_eq!(names.get_name("loop"), "loop2");
        assert_eq!(names.get_name("int"), "int2");
    }

    #[test]
    fn same_name_is_stable_and_case_insensitive() {
        let mut names = NameDb::new();
        let first = names.get_name("Count");
        assert_eq!(names.get_name("count"), first);
        assert_eq!(first, "Count");
    }

    #[test]
    fn colliding_legalized_names_stay_distinct() {
        let mut names = NameDb::new();
        assert_eq!(names.get_name("a b"), "a_b");
        assert_eq!(names.get_name("a_b"), "a_b2");
        assert_eq!(names.get_name("a-b"), "a_b3");
    }

    #[test]
    fn distinct_names_are_always_fresh() {
        let mut names = NameDb::new();
        let a = names.get_distinct_name("tmp");
        let b = names.get_distinct_name("tmp");
        assert_eq!(a, "tmp");
        assert_eq!(b, "tmp2");
    }
}
