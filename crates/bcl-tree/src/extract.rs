//! Decoding values into Rust types.
//!
//! [`ReadValue`] decodes a single value and is the extension point for
//! caller-defined types. [`ReadValues`] decodes all the values of an entry,
//! either into a tuple (exact arity) or into a `Vec` (any arity).

use regex::Regex;

use crate::{
    Content, Element, Symbol, ValidationErrorKind, Value, ValueContent, ValueError, ValueType,
};

/// A type which can be decoded from a single value.
///
/// ```ignore
/// enum Protocol { Http, Https }
///
/// impl ReadValue for Protocol {
///     fn read_value(value: &Value) -> Result<Self, ValueError> {
///         match Symbol::read_value(value)?.as_str() {
///             "http" => Ok(Protocol::Http),
///             "https" => Ok(Protocol::Https),
///             _ => Err(ValueError::NotOneOf { allowed: vec!["http".into(), "https".into()] }),
///         }
///     }
/// }
/// ```
pub trait ReadValue: Sized {
    fn read_value(value: &Value) -> Result<Self, ValueError>;
}

impl ReadValue for Value {
    fn read_value(value: &Value) -> Result<Self, ValueError> {
        Ok(value.clone())
    }
}

impl ReadValue for bool {
    fn read_value(value: &Value) -> Result<Self, ValueError> {
        match value.content {
            ValueContent::Bool(b) => Ok(b),
            _ => Err(ValueError::invalid_type(value.value_type(), &[ValueType::Bool])),
        }
    }
}

impl ReadValue for String {
    fn read_value(value: &Value) -> Result<Self, ValueError> {
        match &value.content {
            ValueContent::String { text, .. } | ValueContent::Symbol(text) => Ok(text.clone()),
            _ => Err(ValueError::invalid_type(
                value.value_type(),
                &[ValueType::String, ValueType::Symbol],
            )),
        }
    }
}

impl ReadValue for Symbol {
    fn read_value(value: &Value) -> Result<Self, ValueError> {
        match &value.content {
            ValueContent::Symbol(text) => Ok(Symbol(text.clone())),
            _ => Err(ValueError::invalid_type(value.value_type(), &[ValueType::Symbol])),
        }
    }
}

macro_rules! impl_read_value_integer {
    ($($ty:ty),*) => {
        $(
            impl ReadValue for $ty {
                fn read_value(value: &Value) -> Result<Self, ValueError> {
                    match value.content {
                        ValueContent::Integer(i) => <$ty>::try_from(i).map_err(|_| {
                            ValueError::MinMaxInteger {
                                min: i64::try_from(<$ty>::MIN).unwrap_or(i64::MIN),
                                max: i64::try_from(<$ty>::MAX).unwrap_or(i64::MAX),
                            }
                        }),
                        _ => Err(ValueError::invalid_type(
                            value.value_type(),
                            &[ValueType::Integer],
                        )),
                    }
                }
            }
        )*
    };
}

impl_read_value_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// Largest integer magnitude converted to a float without loss.
const MAX_EXACT_FLOAT_INTEGER: i64 = 1 << 53;

impl ReadValue for f64 {
    fn read_value(value: &Value) -> Result<Self, ValueError> {
        match value.content {
            ValueContent::Float(x) => Ok(x),
            ValueContent::Integer(i) => {
                if (-MAX_EXACT_FLOAT_INTEGER..=MAX_EXACT_FLOAT_INTEGER).contains(&i) {
                    Ok(i as f64)
                } else {
                    Err(ValueError::MinMaxInteger {
                        min: -MAX_EXACT_FLOAT_INTEGER,
                        max: MAX_EXACT_FLOAT_INTEGER,
                    })
                }
            }
            _ => Err(ValueError::invalid_type(
                value.value_type(),
                &[ValueType::Float, ValueType::Integer],
            )),
        }
    }
}

impl ReadValue for Regex {
    fn read_value(value: &Value) -> Result<Self, ValueError> {
        match &value.content {
            ValueContent::String { text, .. } => Regex::new(text)
                .map_err(|e| ValueError::custom(format!("invalid regular expression: {e}"))),
            _ => Err(ValueError::invalid_type(value.value_type(), &[ValueType::String])),
        }
    }
}

/// `null` decodes to `None`.
impl<T: ReadValue> ReadValue for Option<T> {
    fn read_value(value: &Value) -> Result<Self, ValueError> {
        if value.is_null() {
            Ok(None)
        } else {
            T::read_value(value).map(Some)
        }
    }
}

impl<T: ReadValue> ReadValue for Box<T> {
    fn read_value(value: &Value) -> Result<Self, ValueError> {
        T::read_value(value).map(Box::new)
    }
}

/// A type which can be decoded from all the values of an entry.
pub trait ReadValues: Sized {
    /// Decode `values`, returning every problem found on failure.
    fn read_values(values: &[Value]) -> Result<Self, Vec<ValidationErrorKind>>;
}

fn read_one<T: ReadValue>(value: &Value, errors: &mut Vec<ValidationErrorKind>) -> Option<T> {
    match T::read_value(value) {
        Ok(decoded) => Some(decoded),
        Err(cause) => {
            errors.push(ValidationErrorKind::InvalidValue {
                span: value.span,
                cause,
            });
            None
        }
    }
}

/// Decodes every value; fails if any value fails.
impl<T: ReadValue> ReadValues for Vec<T> {
    fn read_values(values: &[Value]) -> Result<Self, Vec<ValidationErrorKind>> {
        let mut errors = Vec::new();
        let decoded: Vec<Option<T>> = values
            .iter()
            .map(|value| read_one(value, &mut errors))
            .collect();
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(decoded.into_iter().flatten().collect())
    }
}

macro_rules! impl_read_values_tuple {
    ($n:expr; $($ty:ident $var:ident $index:tt),+) => {
        impl<$($ty: ReadValue),+> ReadValues for ($($ty,)+) {
            fn read_values(values: &[Value]) -> Result<Self, Vec<ValidationErrorKind>> {
                if values.len() != $n {
                    return Err(vec![ValidationErrorKind::InvalidEntryNbValues {
                        nb_values: values.len(),
                        expected: vec![$n],
                    }]);
                }
                let mut errors = Vec::new();
                $( let $var = read_one::<$ty>(&values[$index], &mut errors); )+
                match ($($var,)+) {
                    ($(Some($var),)+) => Ok(($($var,)+)),
                    _ => Err(errors),
                }
            }
        }
    };
}

impl_read_values_tuple!(1; A a 0);
impl_read_values_tuple!(2; A a 0, B b 1);
impl_read_values_tuple!(3; A a 0, B b 1, C c 2);
impl_read_values_tuple!(4; A a 0, B b 1, C c 2, D d 3);
impl_read_values_tuple!(5; A a 0, B b 1, C c 2, D d 3, E e 4);
impl_read_values_tuple!(6; A a 0, B b 1, C c 2, D d 3, E e 4, F f 5);
impl_read_values_tuple!(7; A a 0, B b 1, C c 2, D d 3, E e 4, F f 5, G g 6);
impl_read_values_tuple!(8; A a 0, B b 1, C c 2, D d 3, E e 4, F f 5, G g 6, H h 7);

impl Value {
    /// Decode this value.
    pub fn extract<T: ReadValue>(&self) -> Result<T, ValueError> {
        T::read_value(self)
    }

    /// Check that this value is one of `allowed`.
    pub fn check_one_of(&self, allowed: &[ValueContent]) -> Result<(), ValueError> {
        if allowed.iter().any(|candidate| self.content.matches(candidate)) {
            Ok(())
        } else {
            Err(ValueError::NotOneOf {
                allowed: allowed.to_vec(),
            })
        }
    }
}

impl Element {
    fn record_value_errors(&mut self, errors: Vec<ValidationErrorKind>) {
        for error in errors {
            self.add_validation_error(error);
        }
    }

    /// Decode the only value of this entry.
    pub fn value<T: ReadValue>(&mut self) -> Option<T> {
        if !self.check_nb_values(1) {
            return None;
        }
        self.value_at(0)
    }

    /// Decode the value at `index`.
    pub fn value_at<T: ReadValue>(&mut self, index: usize) -> Option<T> {
        if !self.check_entry() {
            return None;
        }
        let Content::Entry(entry) = &self.content else {
            return None;
        };
        let Some(value) = entry.values.get(index) else {
            let nb_values = entry.values.len();
            self.add_validation_error(ValidationErrorKind::InvalidEntryMinNbValues {
                nb_values,
                min: index + 1,
            });
            return None;
        };
        match T::read_value(value) {
            Ok(decoded) => Some(decoded),
            Err(cause) => {
                let span = value.span;
                self.add_validation_error(ValidationErrorKind::InvalidValue { span, cause });
                None
            }
        }
    }

    /// Decode all the values of this entry.
    ///
    /// ```ignore
    /// let (x, y): (i32, i32) = element.values()?;
    /// let ports: Vec<u16> = element.values()?;
    /// ```
    pub fn values<T: ReadValues>(&mut self) -> Option<T> {
        if !self.check_entry() {
            return None;
        }
        let result = match &self.content {
            Content::Entry(entry) => T::read_values(&entry.values),
            Content::Block(_) => return None,
        };
        match result {
            Ok(decoded) => Some(decoded),
            Err(errors) => {
                self.record_value_errors(errors);
                None
            }
        }
    }

    /// Decode the only value of this entry, then run `check` on it.
    pub fn value_with<T, F>(&mut self, check: F) -> Option<T>
    where
        T: ReadValue,
        F: FnOnce(&T) -> Result<(), ValueError>,
    {
        let decoded = self.value::<T>()?;
        match check(&decoded) {
            Ok(()) => Some(decoded),
            Err(cause) => {
                let span = self.as_entry()?.values.first()?.span;
                self.add_validation_error(ValidationErrorKind::InvalidValue { span, cause });
                None
            }
        }
    }

    /// Check that the value at `index` is one of `allowed`.
    pub fn check_value_one_of(&mut self, index: usize, allowed: &[ValueContent]) -> bool {
        let Some(value) = self.value_at::<Value>(index) else {
            return false;
        };
        match value.check_one_of(allowed) {
            Ok(()) => true,
            Err(cause) => {
                self.add_validation_error(ValidationErrorKind::InvalidValue {
                    span: value.span,
                    cause,
                });
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bcl_tokenizer::{Point, Span};

    fn value(content: impl Into<ValueContent>) -> Value {
        Value::new(content)
    }

    fn at(content: impl Into<ValueContent>, column: usize) -> Value {
        Value::with_span(content, Span::point(Point::new(column - 1, 1, column)))
    }

    #[test]
    fn test_read_bool() {
        assert_eq!(value(true).extract::<bool>(), Ok(true));
        assert_eq!(
            value("true").extract::<bool>().unwrap_err().to_string(),
            "value is a string but should be a boolean"
        );
    }

    #[test]
    fn test_read_string() {
        assert_eq!(value("a").extract::<String>(), Ok("a".to_string()));
        assert_eq!(
            value(ValueContent::symbol("a")).extract::<String>(),
            Ok("a".to_string())
        );
        assert_eq!(
            value(ValueContent::symbol("a")).extract::<Symbol>(),
            Ok(Symbol("a".to_string()))
        );
        assert!(value("a").extract::<Symbol>().is_err());
        assert!(value(1i64).extract::<String>().is_err());
    }

    #[test]
    fn test_read_integers() {
        assert_eq!(value(-5i64).extract::<i64>(), Ok(-5));
        assert_eq!(value(200i64).extract::<u8>(), Ok(200));
        assert_eq!(
            value(300i64).extract::<i8>(),
            Err(ValueError::MinMaxInteger {
                min: -128,
                max: 127
            })
        );
        assert_eq!(
            value(-1i64).extract::<u64>(),
            Err(ValueError::MinMaxInteger {
                min: 0,
                max: i64::MAX
            })
        );
        assert_eq!(
            value(1.5).extract::<i32>().unwrap_err().to_string(),
            "value is a float but should be an integer"
        );
    }

    #[test]
    fn test_read_float() {
        assert_eq!(value(1.5).extract::<f64>(), Ok(1.5));
        assert_eq!(value(3i64).extract::<f64>(), Ok(3.0));
        assert_eq!(value(1i64 << 53).extract::<f64>(), Ok(9007199254740992.0));
        assert_eq!(
            value((1i64 << 53) + 1).extract::<f64>(),
            Err(ValueError::MinMaxInteger {
                min: -(1 << 53),
                max: 1 << 53
            })
        );
        assert_eq!(
            value("x").extract::<f64>().unwrap_err().to_string(),
            "value is a string but should be a float or an integer"
        );
    }

    #[test]
    fn test_read_option_and_box() {
        assert_eq!(value(ValueContent::Null).extract::<Option<i64>>(), Ok(None));
        assert_eq!(value(4i64).extract::<Option<i64>>(), Ok(Some(4)));
        assert_eq!(value(4i64).extract::<Box<i64>>(), Ok(Box::new(4)));
        assert_eq!(
            value(ValueContent::Null).extract::<i64>().unwrap_err().to_string(),
            "value is null but should be an integer"
        );
    }

    #[test]
    fn test_read_regex() {
        let re = value("^a+$").extract::<Regex>().unwrap();
        assert!(re.is_match("aaa"));

        let err = value("(").extract::<Regex>().unwrap_err();
        assert!(err.to_string().starts_with("invalid regular expression"));
    }

    #[derive(Debug, PartialEq)]
    enum Protocol {
        Http,
        Https,
    }

    impl ReadValue for Protocol {
        fn read_value(value: &Value) -> Result<Self, ValueError> {
            value.check_one_of(&["http".into(), "https".into()])?;
            match value.extract::<String>()?.as_str() {
                "http" => Ok(Protocol::Http),
                _ => Ok(Protocol::Https),
            }
        }
    }

    #[test]
    fn test_custom_read_value() {
        let mut elt = Element::new_entry("protocol", vec![at(ValueContent::symbol("https"), 10)]);
        assert_eq!(elt.value::<Protocol>(), Some(Protocol::Https));
        assert_eq!(elt.value::<Option<Protocol>>(), Some(Some(Protocol::Https)));

        let mut elt = Element::new_entry("protocol", vec![at(ValueContent::symbol("ftp"), 10)]);
        assert_eq!(elt.value::<Protocol>(), None);
        assert_eq!(
            elt.validation_errors()[0].to_string(),
            r#"value must be "http" or "https""#
        );
    }

    #[test]
    fn test_value_requires_one_value() {
        let mut elt = Element::new_entry("point", vec![value(1i64), value(2i64)]);
        assert_eq!(elt.value::<i64>(), None);
        assert_eq!(
            elt.validation_errors()[0].to_string(),
            "entry has 2 values but should have 1 value"
        );
    }

    #[test]
    fn test_value_at() {
        let mut elt = Element::new_entry("point", vec![value(1i64), value(2i64)]);
        assert_eq!(elt.value_at::<i64>(1), Some(2));
        assert_eq!(elt.value_at::<i64>(2), None);
        assert_eq!(
            elt.validation_errors()[0].to_string(),
            "entry has 2 values but should have at least 3 values"
        );
    }

    #[test]
    fn test_tuple_values() {
        let mut elt = Element::new_entry("point", vec![value(1i64), value("a"), value(2.5)]);
        assert_eq!(
            elt.values::<(i64, String, f64)>(),
            Some((1, "a".to_string(), 2.5))
        );
        assert!(elt.validation_errors().is_empty());

        assert_eq!(elt.values::<(i64, String)>(), None);
        assert_eq!(
            elt.validation_errors(),
            &[ValidationErrorKind::InvalidEntryNbValues {
                nb_values: 3,
                expected: vec![2]
            }]
        );
    }

    #[test]
    fn test_tuple_collects_every_failure() {
        let mut elt = Element::new_entry(
            "point",
            vec![at("x", 7), at(2i64, 11), at(ValueContent::symbol("y"), 13)],
        );
        assert_eq!(elt.values::<(i64, i64, i64)>(), None);

        let errors = elt.validation_errors();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].span().map(|s| s.start.column), Some(7));
        assert_eq!(errors[1].span().map(|s| s.start.column), Some(13));
    }

    #[test]
    fn test_vec_values_are_all_or_nothing() {
        let mut elt = Element::new_entry("ports", vec![value(80i64), value(443i64)]);
        assert_eq!(elt.values::<Vec<u16>>(), Some(vec![80, 443]));

        let mut elt = Element::new_entry("ports", vec![value(80i64)]);
        assert_eq!(elt.values::<Vec<u16>>(), Some(vec![80]));

        let mut elt = Element::new_entry(
            "ports",
            vec![at(80i64, 7), at(70000i64, 10), at("x", 16)],
        );
        assert_eq!(elt.values::<Vec<u16>>(), None);
        let messages: Vec<String> = elt
            .validation_errors()
            .iter()
            .map(|e| e.to_string())
            .collect();
        assert_eq!(
            messages,
            vec![
                "integer must be between 0 and 65535",
                "value is a string but should be an integer",
            ]
        );
    }

    #[test]
    fn test_value_with() {
        let mut elt = Element::new_entry("workers", vec![at(0i64, 9)]);
        let workers = elt.value_with::<u32, _>(|n| {
            if *n == 0 {
                Err(ValueError::MinInteger { min: 1 })
            } else {
                Ok(())
            }
        });
        assert_eq!(workers, None);
        assert_eq!(
            elt.validation_errors(),
            &[ValidationErrorKind::InvalidValue {
                span: Span::point(Point::new(8, 1, 9)),
                cause: ValueError::MinInteger { min: 1 },
            }]
        );
        assert_eq!(
            elt.validation_errors()[0].to_string(),
            "integer must be greater or equal to 1"
        );
    }

    #[test]
    fn test_check_value_one_of() {
        let mut elt = Element::new_entry("mode", vec![value(ValueContent::symbol("fast")), value(3i64)]);
        assert!(elt.check_value_one_of(0, &["fast".into(), "slow".into()]));
        assert!(elt.check_value_one_of(1, &[1i64.into(), 3i64.into()]));
        assert!(!elt.check_value_one_of(1, &[1i64.into(), 2i64.into()]));
        assert_eq!(
            elt.validation_errors()[0].to_string(),
            "value must be 1 or 2"
        );
    }

    #[test]
    fn test_extraction_on_block() {
        let mut elt = Element::new_block("server", "", vec![]);
        assert_eq!(elt.values::<Vec<String>>(), None);
        assert_eq!(
            elt.validation_errors()[0].to_string(),
            "element should be an entry"
        );
    }
}
