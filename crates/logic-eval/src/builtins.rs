//! Native implementations of the prelude functions.

use tracing::debug;

use crate::color;
use crate::value::{BuiltinFunction, LogicValue};

/// Pick the argument for each parameter of `builtin`: by label first, then
/// an unlabeled argument in the same position.
fn match_arguments<'v>(
    builtin: BuiltinFunction,
    given: &'v [(Option<String>, LogicValue)],
) -> Option<Vec<&'v LogicValue>> {
    builtin
        .parameters()
        .iter()
        .enumerate()
        .map(|(position, parameter)| {
            given
                .iter()
                .find(|(label, _)| label.as_deref() == Some(*parameter))
                .or_else(|| given.get(position).filter(|(label, _)| label.is_none()))
                .map(|(_, value)| value)
        })
        .collect()
}

impl BuiltinFunction {
    /// Call the builtin. `None` when an argument is missing or has the wrong
    /// shape.
    pub fn call(self, given: &[(Option<String>, LogicValue)]) -> Option<LogicValue> {
        let arguments = match_arguments(self, given)?;
        match (self, arguments.as_slice()) {
            (BuiltinFunction::StringConcat, [a, b]) => {
                let joined = format!("{}{}", a.as_str()?, b.as_str()?);
                Some(LogicValue::string(joined))
            }
            (BuiltinFunction::ColorSaturate, [color, factor]) => {
                match color::saturate(color.as_color()?, factor.as_number()?) {
                    Ok(hex) => Some(LogicValue::color(hex)),
                    Err(err) => {
                        debug!(%err, "cannot saturate");
                        None
                    }
                }
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labeled(label: &str, value: LogicValue) -> (Option<String>, LogicValue) {
        (Some(label.to_string()), value)
    }

    #[test]
    fn concat_by_label_and_position() {
        let by_label = [
            labeled("b", LogicValue::string("world")),
            labeled("a", LogicValue::string("hello ")),
        ];
        assert_eq!(
            BuiltinFunction::StringConcat.call(&by_label),
            Some(LogicValue::string("hello world"))
        );

        let by_position = [
            (None, LogicValue::string("a")),
            (None, LogicValue::string("b")),
        ];
        assert_eq!(
            BuiltinFunction::StringConcat.call(&by_position),
            Some(LogicValue::string("ab"))
        );
    }

    #[test]
    fn saturate_color_record() {
        let arguments = [
            labeled("color", LogicValue::color("#ff0000")),
            labeled("factor", LogicValue::number(0.0)),
        ];
        assert_eq!(
            BuiltinFunction::ColorSaturate.call(&arguments),
            Some(LogicValue::color("#808080"))
        );
    }

    #[test]
    fn missing_or_mistyped_arguments_give_nothing() {
        let missing = [labeled("a", LogicValue::string("x"))];
        assert_eq!(BuiltinFunction::StringConcat.call(&missing), None);

        let mistyped = [
            labeled("a", LogicValue::string("x")),
            labeled("b", LogicValue::number(1.0)),
        ];
        assert_eq!(BuiltinFunction::StringConcat.call(&mistyped), None);

        let bad_hex = [
            labeled("color", LogicValue::color("red")),
            labeled("factor", LogicValue::number(1.0)),
        ];
        assert_eq!(BuiltinFunction::ColorSaturate.call(&bad_hex), None);
    }
}
