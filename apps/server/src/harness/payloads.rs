//! Per-case request inputs.
//!
//! REST bodies and SOAP operation inputs are looked up by `test_id` in the
//! tables below instead of being decided inside the dispatch loop.

use serde_json::{Value, json};

use crate::soap::{Operation, SoapRequest};

pub const BASE_NAME: &str = "Test Product";
pub const BASE_DESCRIPTION: &str = "Test Description";
pub const BASE_PRICE: f64 = 99.99;

/// Shape of a REST request body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RestPayload {
    /// Complete valid product
    BaseProduct,
    /// Complete product with the price replaced
    BaseWithPrice(f64),
    /// Name, description and the given price only
    Minimal { price: f64 },
    /// Name of the given length, otherwise minimal
    LongName { length: usize },
    /// No name field at all
    MissingName,
}

impl RestPayload {
    pub fn to_json(self) -> Value {
        match self {
            Self::BaseProduct => base_product(),
            Self::BaseWithPrice(price) => {
                let mut body = base_product();
                body["price"] = json!(price);
                body
            }
            Self::Minimal { price } => json!({
                "name": BASE_NAME,
                "description": BASE_DESCRIPTION,
                "price": price,
            }),
            Self::LongName { length } => json!({
                "name": "A".repeat(length),
                "description": BASE_DESCRIPTION,
                "price": BASE_PRICE,
            }),
            Self::MissingName => json!({
                "description": BASE_DESCRIPTION,
                "price": BASE_PRICE,
            }),
        }
    }
}

/// Bodies sent with POST/PUT cases. Other cases send no body.
pub const REST_PAYLOADS: &[(&str, RestPayload)] = &[
    ("TC_007", RestPayload::BaseProduct),
    ("TC_008", RestPayload::MissingName),
    ("TC_009", RestPayload::BaseProduct),
    ("TC_015", RestPayload::BaseWithPrice(0.0)),
    ("TC_016", RestPayload::Minimal { price: -10.0 }),
    ("TC_017", RestPayload::BaseWithPrice(9_999_999.99)),
    ("TC_018", RestPayload::LongName { length: 101 }),
    ("TC_020", RestPayload::BaseProduct),
];

/// Operation inputs for SOAP cases.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SoapInput {
    Id(i64),
    BaseProduct,
}

pub const SOAP_INPUTS: &[(&str, SoapInput)] = &[
    ("SOAP_TC_001", SoapInput::Id(1)),
    ("SOAP_TC_002", SoapInput::BaseProduct),
    ("SOAP_TC_003", SoapInput::Id(1)),
];

const DEFAULT_SOAP_ID: i64 = 1;

/// The valid product used by most creation cases.
pub fn base_product() -> Value {
    json!({
        "name": BASE_NAME,
        "description": BASE_DESCRIPTION,
        "price": BASE_PRICE,
        "available": true,
        "stock": 10,
    })
}

/// JSON body for a REST case, if it has one.
pub fn rest_payload(test_id: &str) -> Option<Value> {
    REST_PAYLOADS
        .iter()
        .find(|(id, _)| *id == test_id)
        .map(|(_, payload)| payload.to_json())
}

/// Build the SOAP call for `operation`, filling inputs from the table or defaults.
pub fn soap_request(test_id: &str, operation: Operation) -> SoapRequest {
    let input = SOAP_INPUTS
        .iter()
        .find(|(id, _)| *id == test_id)
        .map(|(_, input)| *input);

    let id = match input {
        Some(SoapInput::Id(id)) => id,
        _ => DEFAULT_SOAP_ID,
    };

    match operation {
        Operation::GetProduct => SoapRequest::GetProduct { id },
        Operation::DeleteProduct => SoapRequest::DeleteProduct { id },
        Operation::CreateProduct => SoapRequest::CreateProduct {
            name: BASE_NAME.to_string(),
            description: BASE_DESCRIPTION.to_string(),
            price: BASE_PRICE,
        },
    }
}
