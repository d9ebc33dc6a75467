//! Typed, named command parameters.
//!
//! A [`Parameter`] starts out empty and is assigned at most once from the raw
//! text that followed its switch on the command line. The parser used for the
//! raw text is picked by the parameter's [`ValueKind`] when it is declared.

use std::fmt::Display;

use thiserror::Error;

/// The kinds of value a parameter can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Bool,
    Int,
}

impl ValueKind {
    /// Parses raw command-line text into a value of this kind.
    ///
    /// Strings are trimmed and an empty or absent string becomes `None`.
    /// Booleans accept `true`/`false` in any case, integers a signed 32-bit
    /// literal; anything else, including an absent value, is rejected.
    pub fn parse(self, raw: Option<&str>) -> Option<Value> {
        let trimmed = raw.map(str::trim);
        match self {
            ValueKind::String => Some(Value::String(
                trimmed.filter(|s| !s.is_empty()).map(str::to_string),
            )),
            ValueKind::Bool => match trimmed? {
                t if t.eq_ignore_ascii_case("true") => Some(Value::Bool(true)),
                t if t.eq_ignore_ascii_case("false") => Some(Value::Bool(false)),
                _ => None,
            },
            ValueKind::Int => trimmed?.parse().ok().map(Value::Int),
        }
    }
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueKind::String => write!(f, "string"),
            ValueKind::Bool => write!(f, "bool"),
            ValueKind::Int => write!(f, "int"),
        }
    }
}

/// A parsed parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    String(Option<String>),
    Bool(bool),
    Int(i32),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => s.as_deref(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// An assigned string with no content.
    pub fn is_blank(&self) -> bool {
        matches!(self, Value::String(None))
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterError {
    #[error("parameter already has a value")]
    AlreadySet,

    #[error("value is not a valid {0}")]
    InvalidValue(ValueKind),
}

/// A named command parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    name: &'static str,
    alternate_name: &'static str,
    kind: ValueKind,
    required: bool,
    value: Option<Value>,
}

impl Parameter {
    pub fn new(
        name: &'static str,
        alternate_name: &'static str,
        kind: ValueKind,
        required: bool,
    ) -> Self {
        Parameter {
            name,
            alternate_name,
            kind,
            required,
            value: None,
        }
    }

    pub fn string(name: &'static str, alternate_name: &'static str, required: bool) -> Self {
        Self::new(name, alternate_name, ValueKind::String, required)
    }

    pub fn bool(name: &'static str, alternate_name: &'static str, required: bool) -> Self {
        Self::new(name, alternate_name, ValueKind::Bool, required)
    }

    pub fn int(name: &'static str, alternate_name: &'static str, required: bool) -> Self {
        Self::new(name, alternate_name, ValueKind::Int, required)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn alternate_name(&self) -> &'static str {
        self.alternate_name
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Whether a value has been assigned, even an empty one.
    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Whether a required parameter counts as provided: assigned and not blank.
    pub fn is_satisfied(&self) -> bool {
        self.value.as_ref().is_some_and(|v| !v.is_blank())
    }

    /// Case-insensitive match against the name or the alternate name.
    pub fn matches(&self, switch_name: &str) -> bool {
        self.name.eq_ignore_ascii_case(switch_name)
            || (!self.alternate_name.is_empty()
                && self.alternate_name.eq_ignore_ascii_case(switch_name))
    }

    /// Stores an already parsed value.
    pub fn assign(&mut self, value: Value) -> Result<(), ParameterError> {
        if self.has_value() {
            return Err(ParameterError::AlreadySet);
        }
        self.value = Some(value);
        Ok(())
    }

    /// Parses `raw` according to the parameter's kind, without storing it.
    ///
    /// Fails if the parameter already has a value, so a duplicate switch is
    /// reported before its value is looked at.
    pub fn parse_value(&self, raw: Option<&str>) -> Result<Value, ParameterError> {
        if self.has_value() {
            return Err(ParameterError::AlreadySet);
        }
        self.kind
            .parse(raw)
            .ok_or(ParameterError::InvalidValue(self.kind))
    }
}

/// The ordered parameter set of one command. Names are unique within a set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters {
    parameters: Vec<Parameter>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter, builder style.
    pub fn with(mut self, parameter: Parameter) -> Self {
        debug_assert!(
            self.get(parameter.name()).is_none(),
            "duplicate parameter name {}",
            parameter.name()
        );
        self.parameters.push(parameter);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter()
    }

    /// Looks up a parameter by exact name.
    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name() == name)
    }

    /// Looks up the parameter a command-line switch refers to.
    pub fn find(&self, switch_name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.matches(switch_name))
    }

    pub fn find_mut(&mut self, switch_name: &str) -> Option<&mut Parameter> {
        self.parameters.iter_mut().find(|p| p.matches(switch_name))
    }

    pub fn str_value(&self, name: &str) -> Option<&str> {
        self.get(name)?.value()?.as_str()
    }

    pub fn bool_value(&self, name: &str) -> Option<bool> {
        self.get(name)?.value()?.as_bool()
    }

    pub fn int_value(&self, name: &str) -> Option<i32> {
        self.get(name)?.value()?.as_int()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(parameter: &mut Parameter, raw: Option<&str>) -> Result<(), ParameterError> {
        let value = parameter.parse_value(raw)?;
        parameter.assign(value)
    }

    #[test]
    fn test_string_values_are_trimmed() {
        let mut parameter = Parameter::string("Target", "T", true);
        set(&mut parameter, Some("  out/dir  ")).unwrap();
        assert_eq!(parameter.value().unwrap().as_str(), Some("out/dir"));
        assert!(parameter.is_satisfied());
    }

    #[test]
    fn test_empty_string_is_assigned_but_blank() {
        let mut parameter = Parameter::string("Target", "T", true);
        set(&mut parameter, None).unwrap();
        assert!(parameter.has_value());
        assert!(!parameter.is_satisfied());

        let mut parameter = Parameter::string("Target", "T", true);
        set(&mut parameter, Some("   ")).unwrap();
        assert_eq!(parameter.value(), Some(&Value::String(None)));
    }

    #[test]
    fn test_bool_parsing_is_strict() {
        assert_eq!(ValueKind::Bool.parse(Some("true")), Some(Value::Bool(true)));
        assert_eq!(ValueKind::Bool.parse(Some("FALSE")), Some(Value::Bool(false)));
        assert_eq!(ValueKind::Bool.parse(Some(" True ")), Some(Value::Bool(true)));
        assert_eq!(ValueKind::Bool.parse(Some("yes")), None);
        assert_eq!(ValueKind::Bool.parse(Some("1")), None);
        assert_eq!(ValueKind::Bool.parse(None), None);
    }

    #[test]
    fn test_int_parsing_is_strict() {
        assert_eq!(ValueKind::Int.parse(Some("42")), Some(Value::Int(42)));
        assert_eq!(ValueKind::Int.parse(Some("-7")), Some(Value::Int(-7)));
        assert_eq!(ValueKind::Int.parse(Some("4.2")), None);
        assert_eq!(ValueKind::Int.parse(Some("ten")), None);
        assert_eq!(ValueKind::Int.parse(Some("99999999999")), None);
        assert_eq!(ValueKind::Int.parse(None), None);
    }

    #[test]
    fn test_invalid_value_leaves_parameter_unset() {
        let mut parameter = Parameter::int("Count", "N", false);
        assert_eq!(
            set(&mut parameter, Some("many")),
            Err(ParameterError::InvalidValue(ValueKind::Int))
        );
        assert!(!parameter.has_value());
    }

    #[test]
    fn test_second_assignment_is_rejected() {
        let mut parameter = Parameter::bool("Clean", "C", false);
        set(&mut parameter, Some("true")).unwrap();
        assert_eq!(
            set(&mut parameter, Some("false")),
            Err(ParameterError::AlreadySet)
        );
        assert_eq!(parameter.value(), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_matches_name_and_alternate_case_insensitively() {
        let parameter = Parameter::string("CultureCode", "CC", true);
        assert!(parameter.matches("culturecode"));
        assert!(parameter.matches("cc"));
        assert!(!parameter.matches("Culture"));

        let no_alias = Parameter::string("Report", "", false);
        assert!(!no_alias.matches(""));
    }

    #[test]
    fn test_parameter_set_lookup() {
        let mut parameters = Parameters::new()
            .with(Parameter::string("Source", "S", true))
            .with(Parameter::int("Depth", "D", false));

        assert_eq!(parameters.find("s").map(Parameter::name), Some("Source"));
        assert!(parameters.get("source").is_none());

        set(parameters.find_mut("d").unwrap(), Some("3")).unwrap();
        assert_eq!(parameters.int_value("Depth"), Some(3));
        assert_eq!(parameters.str_value("Source"), None);
        assert_eq!(parameters.bool_value("Depth"), None);
    }
}
