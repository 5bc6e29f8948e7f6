//! Request binding: path/query string values into typed RPC request
//! fields.
//!
//! Binders are pure transforms. Coercion failures and missing required
//! variables surface as `InvalidArgument` carrying the field name, in
//! the same shape the transcoding runtime reports them.

use serde::de::DeserializeOwned;
use tonic::Status;

use crate::pattern::Binding;

/// Query parameters in request order.
pub type QueryParams = Vec<(String, String)>;

/// Conversion from a raw path/query string value into a request field.
pub trait FromParam: Sized {
    fn from_param(raw: &str) -> Result<Self, String>;
}

impl FromParam for String {
    fn from_param(raw: &str) -> Result<Self, String> {
        Ok(raw.to_string())
    }
}

impl FromParam for bool {
    fn from_param(raw: &str) -> Result<Self, String> {
        raw.parse::<bool>().map_err(|e| e.to_string())
    }
}

macro_rules! from_param_via_parse {
    ($($ty:ty),*) => {
        $(impl FromParam for $ty {
            fn from_param(raw: &str) -> Result<Self, String> {
                raw.parse::<$ty>().map_err(|e| e.to_string())
            }
        })*
    };
}

from_param_via_parse!(i32, i64, u32, u64, f32, f64);

/// Implement [`FromParam`] for a prost enumeration.
///
/// Accepts the proto value name first, then the numeric form; anything
/// else is a coercion failure. Unknown numbers are rejected rather
/// than passed through as open enum values.
#[macro_export]
macro_rules! from_param_enum {
    ($($ty:ty),*) => {
        $(impl $crate::bind::FromParam for $ty {
            fn from_param(raw: &str) -> Result<Self, String> {
                if let Some(value) = <$ty>::from_str_name(raw) {
                    return Ok(value);
                }
                if let Ok(number) = raw.parse::<i32>() {
                    if let Ok(value) = <$ty>::try_from(number) {
                        return Ok(value);
                    }
                }
                Err(format!("invalid enum value {raw:?}"))
            }
        })*
    };
}

/// Extract a required path variable, coercing it to the field type.
pub fn required<T: FromParam>(binding: &Binding, name: &str) -> Result<T, Status> {
    let raw = binding
        .get(name)
        .ok_or_else(|| Status::invalid_argument(format!("missing parameter {name}")))?;
    T::from_param(raw).map_err(|e| {
        Status::invalid_argument(format!("type mismatch, parameter: {name}, error: {e}"))
    })
}

/// Extract an optional field from the query string.
///
/// Absent keys yield `None`; a present key that fails coercion is an
/// error, not a silent default.
pub fn query<T: FromParam>(params: &[(String, String)], name: &str) -> Result<Option<T>, Status> {
    match params.iter().find(|(k, _)| k == name) {
        Some((_, raw)) => T::from_param(raw)
            .map(Some)
            .map_err(|e| {
                Status::invalid_argument(format!("type mismatch, parameter: {name}, error: {e}"))
            }),
        None => Ok(None),
    }
}

/// Decode a JSON request body into the typed request message.
pub fn json_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, Status> {
    serde_json::from_slice(body)
        .map_err(|e| Status::invalid_argument(format!("invalid request body: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::RoutePattern;
    use http::Method;

    fn binding_for(template: &str, path: &str) -> Binding {
        RoutePattern::parse(Method::GET, template)
            .unwrap()
            .match_path(path)
            .unwrap()
    }

    #[test]
    fn string_passthrough() {
        let binding = binding_for("/e/{short_name}", "/e/Tom");
        let value: String = required(&binding, "short_name").unwrap();
        assert_eq!(value, "Tom");
    }

    #[test]
    fn integer_coercion() {
        let binding = binding_for("/e/{id}", "/e/42");
        let value: i64 = required(&binding, "id").unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn coercion_failure_names_the_field() {
        let binding = binding_for("/e/{id}", "/e/forty-two");
        let err = required::<i64>(&binding, "id").unwrap_err();
        assert_eq!(err.code(), tonic::Code::InvalidArgument);
        assert!(err.message().contains("parameter: id"));
    }

    #[test]
    fn missing_variable_names_the_field() {
        let binding = binding_for("/e/{id}", "/e/1");
        let err = required::<String>(&binding, "short_name").unwrap_err();
        assert_eq!(err.code(), tonic::Code::InvalidArgument);
        assert_eq!(err.message(), "missing parameter short_name");
    }

    #[derive(Clone, Copy, Debug, PartialEq, ::prost::Enumeration)]
    #[repr(i32)]
    enum Shift {
        Unspecified = 0,
        Day = 1,
        Night = 2,
    }

    impl Shift {
        fn from_str_name(value: &str) -> Option<Self> {
            match value {
                "SHIFT_UNSPECIFIED" => Some(Self::Unspecified),
                "SHIFT_DAY" => Some(Self::Day),
                "SHIFT_NIGHT" => Some(Self::Night),
                _ => None,
            }
        }
    }

    crate::from_param_enum!(Shift);

    #[test]
    fn enum_lookup_by_name_or_number() {
        let binding = binding_for("/e/{shift}", "/e/SHIFT_NIGHT");
        let value: Shift = required(&binding, "shift").unwrap();
        assert_eq!(value, Shift::Night);

        let binding = binding_for("/e/{shift}", "/e/1");
        let value: Shift = required(&binding, "shift").unwrap();
        assert_eq!(value, Shift::Day);
    }

    #[test]
    fn unknown_enum_value_names_the_field() {
        for raw in ["/e/SHIFT_SWING", "/e/9"] {
            let binding = binding_for("/e/{shift}", raw);
            let err = required::<Shift>(&binding, "shift").unwrap_err();
            assert_eq!(err.code(), tonic::Code::InvalidArgument);
            assert!(err.message().contains("parameter: shift"));
        }
    }

    #[test]
    fn query_params_are_optional() {
        let params: QueryParams = vec![("page_size".to_string(), "25".to_string())];
        assert_eq!(query::<u32>(&params, "page_size").unwrap(), Some(25));
        assert_eq!(query::<u32>(&params, "page_token").unwrap(), None);
        assert!(query::<u32>(&[("page_size".to_string(), "x".to_string())], "page_size").is_err());
    }

    #[test]
    fn json_body_decodes() {
        #[derive(serde::Deserialize)]
        struct Msg {
            msg: String,
        }
        let decoded: Msg = json_body(br#"{"msg":"hello"}"#).unwrap();
        assert_eq!(decoded.msg, "hello");
        assert!(json_body::<Msg>(b"not json").is_err());
    }
}
