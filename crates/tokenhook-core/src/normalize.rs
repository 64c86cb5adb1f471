//! Error normalization.
//!
//! Turns any failure value into a [`NormalizedError`] so that write outcomes
//! carry one error type regardless of where the failure came from.

use std::any::Any;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// The original failure value carried by a [`NormalizedError`].
#[derive(Debug, Clone)]
pub enum Payload {
    /// A wrapped error value, also exposed through [`Error::source`].
    Error(Arc<dyn Error + Send + Sync>),
    /// A string failure value.
    Message(String),
    /// An integer failure value.
    Integer(i128),
    /// A floating point failure value.
    Float(f64),
    /// The unit value: a failure that carried nothing.
    Unit,
    /// A value of a type the normalizer does not recognise.
    Opaque,
}

impl PartialEq for Payload {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Error(a), Self::Error(b)) => Arc::ptr_eq(a, b) || same_error(&**a, &**b),
            (Self::Message(a), Self::Message(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Unit, Self::Unit) | (Self::Opaque, Self::Opaque) => true,
            _ => false,
        }
    }
}

/// Two distinct error values are equal when both their display and debug
/// renderings match. Derived `Debug` output names the type, so values of
/// different types with the same message stay apart.
fn same_error(a: &(dyn Error + Send + Sync), b: &(dyn Error + Send + Sync)) -> bool {
    a.to_string() == b.to_string() && format!("{a:?}") == format!("{b:?}")
}

/// Uniform error type for captured write failures.
///
/// Cloning is cheap; clones share the wrapped error allocation.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedError {
    message: String,
    payload: Payload,
}

impl NormalizedError {
    /// Creates an error from a plain message.
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            payload: Payload::Message(message.clone()),
            message,
        }
    }

    fn from_payload(payload: Payload) -> Self {
        let message = match &payload {
            Payload::Error(e) => e.to_string(),
            Payload::Message(m) => m.clone(),
            Payload::Integer(n) => n.to_string(),
            Payload::Float(f) => f.to_string(),
            Payload::Unit => "failure without a value".to_string(),
            Payload::Opaque => "failure value of an unrecognised type".to_string(),
        };
        Self { message, payload }
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The original failure value.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }
}

impl fmt::Display for NormalizedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for NormalizedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.payload {
            Payload::Error(inner) => Some(&**inner as &(dyn Error + 'static)),
            _ => None,
        }
    }
}

/// Normalizes an error value.
///
/// A `NormalizedError` passes through unchanged. Strings become
/// [`Payload::Message`]. Anything else is wrapped, keeping the original as
/// the payload and source.
pub fn normalize<E>(err: E) -> NormalizedError
where
    E: Into<Box<dyn Error + Send + Sync>> + 'static,
{
    let value: &dyn Any = &err;
    if let Some(message) = value.downcast_ref::<String>() {
        return NormalizedError::from_payload(Payload::Message(message.clone()));
    }
    if let Some(message) = value.downcast_ref::<&'static str>() {
        return NormalizedError::from_payload(Payload::Message((*message).to_string()));
    }
    normalize_boxed(err.into())
}

fn normalize_boxed(boxed: Box<dyn Error + Send + Sync>) -> NormalizedError {
    let boxed = match boxed.downcast::<NormalizedError>() {
        Ok(normalized) => return *normalized,
        Err(other) => other,
    };
    // `From<String>` and `From<&str>` box a private error type that debug
    // prints as the quoted message and has no source.
    if boxed.source().is_none() {
        let message = boxed.to_string();
        if format!("{boxed:?}") == format!("{message:?}") {
            return NormalizedError::from_payload(Payload::Message(message));
        }
    }
    NormalizedError::from_payload(Payload::Error(Arc::from(boxed)))
}

macro_rules! downcast_integer {
    ($value:ident, $($ty:ty),+ $(,)?) => {
        $(
            let $value = match $value.downcast::<$ty>() {
                Ok(n) => return NormalizedError::from_payload(Payload::Integer(*n as i128)),
                Err(other) => other,
            };
        )+
    };
}

/// Normalizes an arbitrary value, such as a panic payload.
///
/// Recognises `NormalizedError` (identity), boxed errors, strings, integers,
/// floats and `()`. Any other type becomes [`Payload::Opaque`].
pub fn normalize_any(value: Box<dyn Any + Send>) -> NormalizedError {
    let value = match value.downcast::<NormalizedError>() {
        Ok(normalized) => return *normalized,
        Err(other) => other,
    };
    let value = match value.downcast::<Box<dyn Error + Send + Sync>>() {
        Ok(err) => return normalize_boxed(*err),
        Err(other) => other,
    };
    let value = match value.downcast::<String>() {
        Ok(s) => return NormalizedError::from_payload(Payload::Message(*s)),
        Err(other) => other,
    };
    let value = match value.downcast::<&'static str>() {
        Ok(s) => return NormalizedError::from_payload(Payload::Message((*s).to_string())),
        Err(other) => other,
    };
    downcast_integer!(value, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, usize);
    let value = match value.downcast::<f64>() {
        Ok(f) => return NormalizedError::from_payload(Payload::Float(*f)),
        Err(other) => other,
    };
    let value = match value.downcast::<f32>() {
        Ok(f) => return NormalizedError::from_payload(Payload::Float(f64::from(*f))),
        Err(other) => other,
    };
    if value.downcast::<()>().is_ok() {
        return NormalizedError::from_payload(Payload::Unit);
    }
    NormalizedError::from_payload(Payload::Opaque)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("rpc unavailable")]
    struct RpcDown;

    #[test]
    fn wraps_foreign_error_as_source() {
        let err = normalize(RpcDown);
        assert_eq!(err.message(), "rpc unavailable");
        assert!(matches!(err.payload(), Payload::Error(_)));
        let source = err.source().unwrap();
        assert!(source.downcast_ref::<RpcDown>().is_some());
    }

    #[test]
    fn normalized_error_is_identity() {
        let original = normalize(RpcDown);
        let again = normalize(original.clone());
        assert_eq!(again, original);
        match (again.payload(), original.payload()) {
            (Payload::Error(a), Payload::Error(b)) => assert!(Arc::ptr_eq(a, b)),
            _ => panic!("expected wrapped error payloads"),
        }
    }

    #[test]
    fn strings_normalize_to_message_payloads() {
        assert_eq!(normalize("reverted"), normalize("reverted"));
        assert_eq!(
            normalize("reverted").payload(),
            &Payload::Message("reverted".into())
        );
        assert_eq!(
            normalize(String::from("nonce too low")).payload(),
            &Payload::Message("nonce too low".into())
        );
        let boxed: Box<dyn Error + Send + Sync> = "gas too low".into();
        assert_eq!(normalize(boxed), normalize("gas too low"));
    }

    #[test]
    fn separate_normalizations_of_one_error_are_equal() {
        assert_eq!(normalize(RpcDown), normalize(RpcDown));
        assert_ne!(normalize(RpcDown), normalize("rpc unavailable"));
    }

    #[test]
    fn identity_through_any() {
        let original = NormalizedError::new("user rejected");
        let again = normalize_any(Box::new(original.clone()));
        assert_eq!(again, original);
    }

    #[test]
    fn string_payloads_keep_value() {
        let err = normalize_any(Box::new("execution reverted".to_string()));
        assert_eq!(err.payload(), &Payload::Message("execution reverted".into()));
        assert_eq!(err.to_string(), "execution reverted");

        let err = normalize_any(Box::new("static reason"));
        assert_eq!(err.payload(), &Payload::Message("static reason".into()));
    }

    #[test]
    fn numeric_payloads_keep_value() {
        assert_eq!(normalize_any(Box::new(-32000i64)).payload(), &Payload::Integer(-32000));
        assert_eq!(normalize_any(Box::new(7u8)).payload(), &Payload::Integer(7));
        assert_eq!(normalize_any(Box::new(4001usize)).message(), "4001");
        assert_eq!(normalize_any(Box::new(1.5f64)).payload(), &Payload::Float(1.5));
    }

    #[test]
    fn unit_and_unknown_values_do_not_panic() {
        assert_eq!(normalize_any(Box::new(())).payload(), &Payload::Unit);

        #[allow(dead_code)]
        struct Nested {
            inner: Vec<Option<u8>>,
        }
        let err = normalize_any(Box::new(Nested {
            inner: vec![None, Some(1)],
        }));
        assert_eq!(err.payload(), &Payload::Opaque);
        assert!(!err.message().is_empty());
    }

    #[test]
    fn boxed_error_through_any() {
        let boxed: Box<dyn Error + Send + Sync> = Box::new(RpcDown);
        let err = normalize_any(Box::new(boxed));
        assert_eq!(err.message(), "rpc unavailable");
    }

    #[test]
    fn caught_panic_payload_normalizes() {
        let payload = std::panic::catch_unwind(|| panic!("boom {}", 1)).unwrap_err();
        let err = normalize_any(payload);
        assert_eq!(err.payload(), &Payload::Message("boom 1".into()));
    }
}
