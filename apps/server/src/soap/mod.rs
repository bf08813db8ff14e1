//! SOAP envelope codec for the product service.
//!
//! Three operations are understood: GetProduct, CreateProduct and
//! DeleteProduct. Operation elements live in [`SERVICE_NS`]; their input
//! fields are unqualified children.

pub mod xml;

use std::fmt::Write as _;

pub use xml::{Element, XmlError};

/// SOAP 1.1 envelope namespace.
pub const ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// Product service namespace.
pub const SERVICE_NS: &str = "http://example.com/soap";

/// Content type for request and response envelopes.
pub const CONTENT_TYPE: &str = "text/xml";

/// Errors decoding a SOAP request envelope.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SoapError {
    #[error("Malformed envelope: {0}")]
    Xml(#[from] XmlError),

    #[error("Envelope has no Body")]
    MissingBody,

    #[error("Unsupported SOAP operation: {0}")]
    UnsupportedOperation(String),

    #[error("Missing field '{0}'")]
    MissingField(&'static str),

    #[error("Invalid value for '{field}': {value}")]
    InvalidField { field: &'static str, value: String },
}

/// Supported operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    GetProduct,
    CreateProduct,
    DeleteProduct,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GetProduct => "GetProduct",
            Self::CreateProduct => "CreateProduct",
            Self::DeleteProduct => "DeleteProduct",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "GetProduct" => Some(Self::GetProduct),
            "CreateProduct" => Some(Self::CreateProduct),
            "DeleteProduct" => Some(Self::DeleteProduct),
            _ => None,
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An operation call together with its input fields.
#[derive(Debug, Clone, PartialEq)]
pub enum SoapRequest {
    GetProduct {
        id: i64,
    },
    CreateProduct {
        name: String,
        description: String,
        price: f64,
    },
    DeleteProduct {
        id: i64,
    },
}

impl SoapRequest {
    pub fn operation(&self) -> Operation {
        match self {
            Self::GetProduct { .. } => Operation::GetProduct,
            Self::CreateProduct { .. } => Operation::CreateProduct,
            Self::DeleteProduct { .. } => Operation::DeleteProduct,
        }
    }

    /// Input fields as `(name, value)` pairs, in envelope order.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::GetProduct { id } | Self::DeleteProduct { id } => vec![("id", id.to_string())],
            Self::CreateProduct {
                name,
                description,
                price,
            } => vec![
                ("name", name.clone()),
                ("description", description.clone()),
                ("price", price.to_string()),
            ],
        }
    }

    /// Build the request envelope. Field values are XML-escaped.
    pub fn to_envelope(&self) -> String {
        let operation = self.operation();
        let mut fields = String::new();
        for (name, value) in self.fields() {
            let _ = writeln!(fields, "      <{name}>{}</{name}>", xml::escape(&value));
        }

        format!(
            "<soap:Envelope xmlns:soap=\"{ENVELOPE_NS}\" xmlns:ns=\"{SERVICE_NS}\">\n  \
             <soap:Body>\n    <ns:{operation}>\n{fields}    </ns:{operation}>\n  \
             </soap:Body>\n</soap:Envelope>\n"
        )
    }

    /// Decode a request envelope received by the service.
    pub fn from_envelope(body: &str) -> Result<Self, SoapError> {
        let root = xml::parse(body)?;
        let soap_body = if root.is(Some(ENVELOPE_NS), "Body") {
            &root
        } else {
            root.find(Some(ENVELOPE_NS), "Body")
                .ok_or(SoapError::MissingBody)?
        };

        let call = soap_body
            .children
            .first()
            .ok_or_else(|| SoapError::UnsupportedOperation(String::new()))?;
        let operation = Operation::parse(&call.name)
            .ok_or_else(|| SoapError::UnsupportedOperation(call.name.clone()))?;

        Ok(match operation {
            Operation::GetProduct => Self::GetProduct {
                id: parse_field(call, "id")?,
            },
            Operation::DeleteProduct => Self::DeleteProduct {
                id: parse_field(call, "id")?,
            },
            Operation::CreateProduct => Self::CreateProduct {
                name: text_field(call, "name")?.to_string(),
                description: text_field(call, "description")?.to_string(),
                price: parse_field(call, "price")?,
            },
        })
    }
}

fn text_field<'a>(call: &'a Element, field: &'static str) -> Result<&'a str, SoapError> {
    call.find(None, field)
        .or_else(|| call.child(field))
        .map(Element::text)
        .ok_or(SoapError::MissingField(field))
}

fn parse_field<T: std::str::FromStr>(call: &Element, field: &'static str) -> Result<T, SoapError> {
    let raw = text_field(call, field)?;
    raw.parse().map_err(|_| SoapError::InvalidField {
        field,
        value: raw.to_string(),
    })
}

/// Build a response envelope carrying `result` for `operation`.
pub fn response_envelope(operation: Operation, result: &str) -> String {
    format!(
        "<soap:Envelope xmlns:soap=\"{ENVELOPE_NS}\">\n  <soap:Body>\n    \
         <{operation}Response xmlns=\"{SERVICE_NS}\">\n      <result>{}</result>\n    \
         </{operation}Response>\n  </soap:Body>\n</soap:Envelope>\n",
        xml::escape(result)
    )
}

/// Build a SOAP fault envelope.
pub fn fault_envelope(code: &str, message: &str) -> String {
    format!(
        "<soap:Envelope xmlns:soap=\"{ENVELOPE_NS}\">\n  <soap:Body>\n    <soap:Fault>\n      \
         <faultcode>{}</faultcode>\n      <faultstring>{}</faultstring>\n    </soap:Fault>\n  \
         </soap:Body>\n</soap:Envelope>\n",
        xml::escape(code),
        xml::escape(message)
    )
}

/// Inner text of the first `{SERVICE_NS}result` element, if any.
pub fn result_text(body: &str) -> Result<Option<String>, XmlError> {
    let root = xml::parse(body)?;
    if root.is(Some(SERVICE_NS), "result") {
        return Ok(Some(root.text().to_string()));
    }
    Ok(root
        .find(Some(SERVICE_NS), "result")
        .map(|el| el.text().to_string()))
}
