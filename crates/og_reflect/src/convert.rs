use alloc::string::String;
use alloc::vec::Vec;

use og_utils::OrderedMap;

use crate::{ObjectId, ReflectError, Value};

// -----------------------------------------------------------------------------
// Traits

/// Conversion of a field into a [`Value`].
pub trait ToValue {
    fn to_value(&self) -> Value;
}

/// Conversion of a decoded [`Value`] into a field.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, ReflectError>;
}

#[inline]
fn mismatch(expected: &'static str, found: &Value) -> ReflectError {
    ReflectError::TypeMismatch {
        expected,
        found: found.kind_name(),
    }
}

// -----------------------------------------------------------------------------
// Identity

impl ToValue for Value {
    #[inline]
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl FromValue for Value {
    #[inline]
    fn from_value(value: Value) -> Result<Self, ReflectError> {
        Ok(value)
    }
}

// -----------------------------------------------------------------------------
// Scalars

impl ToValue for bool {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, ReflectError> {
        match value {
            Value::Bool(v) => Ok(v),
            other => Err(mismatch("boolean", &other)),
        }
    }
}

macro_rules! impl_integer {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ToValue for $ty {
                #[inline]
                fn to_value(&self) -> Value {
                    Value::Integer(i64::from(*self))
                }
            }

            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self, ReflectError> {
                    match value {
                        Value::Integer(v) => <$ty>::try_from(v).map_err(|_| {
                            ReflectError::IntegerOverflow {
                                value: v,
                                target: core::any::type_name::<$ty>(),
                            }
                        }),
                        other => Err(mismatch("integer", &other)),
                    }
                }
            }
        )*
    };
}

impl_integer!(i8, i16, i32, i64, u8, u16, u32);

impl ToValue for f64 {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, ReflectError> {
        match value {
            Value::Float(v) => Ok(v),
            Value::Integer(v) => Ok(v as f64),
            other => Err(mismatch("float", &other)),
        }
    }
}

impl ToValue for f32 {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Float(f64::from(*self))
    }
}

impl FromValue for f32 {
    #[inline]
    fn from_value(value: Value) -> Result<Self, ReflectError> {
        f64::from_value(value).map(|v| v as f32)
    }
}

impl ToValue for String {
    #[inline]
    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, ReflectError> {
        match value {
            Value::String(v) => Ok(v),
            other => Err(mismatch("string", &other)),
        }
    }
}

impl ToValue for ObjectId {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Object(*self)
    }
}

impl FromValue for ObjectId {
    fn from_value(value: Value) -> Result<Self, ReflectError> {
        match value {
            Value::Object(id) => Ok(id),
            other => Err(mismatch("object", &other)),
        }
    }
}

// -----------------------------------------------------------------------------
// Containers

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, ReflectError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value {
        Value::Sequence(self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self, ReflectError> {
        match value {
            Value::Sequence(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(mismatch("sequence", &other)),
        }
    }
}

impl<T: ToValue> ToValue for OrderedMap<String, T> {
    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.clone(), v.to_value()))
                .collect(),
        )
    }
}

impl<T: FromValue> FromValue for OrderedMap<String, T> {
    fn from_value(value: Value) -> Result<Self, ReflectError> {
        match value {
            Value::Map(entries) => entries
                .into_iter()
                .map(|(k, v)| T::from_value(v).map(|v| (k, v)))
                .collect(),
            other => Err(mismatch("map", &other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use super::{FromValue, ToValue};
    use crate::{ObjectId, ReflectError, Value};

    #[test]
    fn integers_check_range() {
        assert_eq!(u8::from_value(Value::Integer(255)), Ok(255));
        assert_eq!(
            u8::from_value(Value::Integer(256)),
            Err(ReflectError::IntegerOverflow {
                value: 256,
                target: "u8"
            })
        );
    }

    #[test]
    fn float_accepts_integer() {
        assert_eq!(f64::from_value(Value::Integer(17)), Ok(17.0));
    }

    #[test]
    fn option_maps_null() {
        assert_eq!(Option::<String>::from_value(Value::Null), Ok(None));
        assert_eq!(None::<ObjectId>.to_value(), Value::Null);

        let id = ObjectId::from_index(3);
        assert_eq!(Option::<ObjectId>::from_value(Value::Object(id)), Ok(Some(id)));
    }

    #[test]
    fn sequence_round_trip() {
        let items = vec![1_i64, 2, 3];
        let value = items.to_value();
        assert_eq!(Vec::<i64>::from_value(value), Ok(items));
    }

    #[test]
    fn mismatch_names_both_kinds() {
        assert_eq!(
            bool::from_value(Value::from("yes")),
            Err(ReflectError::TypeMismatch {
                expected: "boolean",
                found: "string"
            })
        );
    }
}
