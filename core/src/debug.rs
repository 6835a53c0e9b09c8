//! Human-readable rendering of a `RequestContext` for logs and bug reports.

use std::fmt;

use serde_json::Value;

use crate::context::RequestContext;

const SEPARATOR: &str = "--------------------------------------------------";

impl RequestContext {
    /// Fixed-layout dump of method, URI, headers, data and request
    /// parameters. Empty sections show a placeholder line instead.
    pub fn to_debug_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Method: {}", self.method())?;
        writeln!(f, "URI: {}", self.uri())?;

        writeln!(f, "{SEPARATOR}")?;
        writeln!(f, "Headers:")?;
        if self.headers().is_empty() {
            writeln!(f, "No headers were set")?;
        } else {
            for line in self.headers().lines() {
                writeln!(f, "{line}")?;
            }
        }

        writeln!(f, "{SEPARATOR}")?;
        writeln!(f, "Data:")?;
        if self.data().is_null() {
            writeln!(f, "No data was set")?;
        } else {
            writeln!(f, "{}", dump(self.data()))?;
        }

        writeln!(f, "{SEPARATOR}")?;
        writeln!(f, "Request parameters:")?;
        if self.request_parameters().is_empty() {
            write!(f, "No request parameters were set")
        } else {
            let params = Value::Object(self.request_parameters().clone());
            write!(f, "{}", dump(&params))
        }
    }
}

fn dump(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_context_shows_placeholders() {
        let c = RequestContext::new("http://example.com");
        let expected = "\
Method: GET
URI: http://example.com
--------------------------------------------------
Headers:
No headers were set
--------------------------------------------------
Data:
No data was set
--------------------------------------------------
Request parameters:
No request parameters were set";
        assert_eq!(c.to_debug_string(), expected);
    }

    #[test]
    fn populated_context_interpolates_values() {
        let mut c = RequestContext::new("http://example.com");
        c.set_header("foo", "bar")
            .set_data(json!({"a": 1, "b": "c"}))
            .set_request_parameter("page", 2);
        let expected = "\
Method: GET
URI: http://example.com
--------------------------------------------------
Headers:
foo: bar
--------------------------------------------------
Data:
{
  \"a\": 1,
  \"b\": \"c\"
}
--------------------------------------------------
Request parameters:
{
  \"page\": 2
}";
        let out = c.to_debug_string();
        assert_eq!(out, expected);
        assert!(!out.contains("were set"));
        assert!(!out.contains("was set"));
    }

    #[test]
    fn string_data_is_not_quoted() {
        let mut c = RequestContext::new("http://example.com");
        c.set_data("hello");
        assert!(c.to_debug_string().contains("Data:\nhello\n"));
    }
}
