//! 产品载荷校验
//!
//! 规则按顺序检查，第一个失败的规则决定错误信息。

use axum::{
    async_trait,
    body::Bytes,
    extract::{rejection::BytesRejection, FromRequest, FromRequestParts, Path, Request},
    http::{request::Parts, StatusCode},
};
use serde_json::{Map, Value};

use super::model::ProductDraft;
use crate::core::error::CoreError;

pub const MISSING_FIELDS_MESSAGE: &str =
    "Missing required fields: name, description, price, and category are required.";
pub const INVALID_PRICE_MESSAGE: &str = "Price must be a positive number.";
pub const NON_STRING_FIELDS_MESSAGE: &str =
    "Fields name, description, and category must be strings.";
pub const INVALID_IN_STOCK_MESSAGE: &str = "inStock must be a boolean.";
pub const MALFORMED_BODY_MESSAGE: &str = "Malformed JSON body.";

const REQUIRED_FIELDS: [&str; 4] = ["name", "description", "price", "category"];

/// 缺失、null、false、0、NaN 和空字符串都视为缺失
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map_or(false, |f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

fn string_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key).and_then(Value::as_str).map(str::to_string)
}

/// 校验创建/更新载荷，成功时返回可写入存储的草稿
pub fn validate_product_payload(payload: &Value) -> Result<ProductDraft, CoreError> {
    let empty = Map::new();
    let fields = payload.as_object().unwrap_or(&empty);

    if !REQUIRED_FIELDS.iter().all(|key| is_truthy(fields.get(*key))) {
        return Err(CoreError::BadRequest(MISSING_FIELDS_MESSAGE.to_string()));
    }

    let price = fields
        .get("price")
        .and_then(Value::as_f64)
        .filter(|p| *p > 0.0)
        .ok_or_else(|| CoreError::BadRequest(INVALID_PRICE_MESSAGE.to_string()))?;

    let (Some(name), Some(description), Some(category)) = (
        string_field(fields, "name"),
        string_field(fields, "description"),
        string_field(fields, "category"),
    ) else {
        return Err(CoreError::BadRequest(NON_STRING_FIELDS_MESSAGE.to_string()));
    };

    let in_stock = match fields.get("inStock") {
        None | Some(Value::Null) => None,
        Some(Value::Bool(b)) => Some(*b),
        Some(_) => return Err(CoreError::BadRequest(INVALID_IN_STOCK_MESSAGE.to_string())),
    };

    Ok(ProductDraft {
        name,
        description,
        price,
        category,
        in_stock,
    })
}

/// 超出请求体大小限制保留 413，其余读取失败按 400 处理
fn body_rejection(rejection: BytesRejection) -> CoreError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        CoreError::PayloadTooLarge(rejection.body_text())
    } else {
        CoreError::BadRequest(rejection.body_text())
    }
}

/// 请求体解析 + 校验提取器，失败时直接短路为错误信封
#[derive(Debug)]
pub struct ValidatedProduct(pub ProductDraft);

#[async_trait]
impl<S> FromRequest<S> for ValidatedProduct
where
    S: Send + Sync,
{
    type Rejection = CoreError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(body_rejection)?;

        let payload = if bytes.iter().all(u8::is_ascii_whitespace) {
            Value::Object(Map::new())
        } else {
            serde_json::from_slice(&bytes)
                .map_err(|_| CoreError::BadRequest(MALFORMED_BODY_MESSAGE.to_string()))?
        };

        validate_product_payload(&payload).map(ValidatedProduct)
    }
}

/// 路径中的产品 id，解码失败同样走统一错误信封
#[derive(Debug)]
pub struct ProductId(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for ProductId
where
    S: Send + Sync,
{
    type Rejection = CoreError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| CoreError::BadRequest(rejection.body_text()))?;
        Ok(ProductId(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(result: Result<ProductDraft, CoreError>) -> String {
        match result {
            Err(CoreError::BadRequest(msg)) => msg,
            other => panic!("expected bad request, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_payload() {
        let draft = validate_product_payload(&json!({
            "name": "Kettle",
            "description": "Electric kettle",
            "price": 30,
            "category": "kitchen"
        }))
        .unwrap();

        assert_eq!(draft.name, "Kettle");
        assert_eq!(draft.price, 30.0);
        assert_eq!(draft.in_stock, None);
    }

    #[test]
    fn test_missing_field() {
        let result = validate_product_payload(&json!({
            "name": "Kettle",
            "price": 30,
            "category": "kitchen"
        }));
        assert_eq!(message(result), MISSING_FIELDS_MESSAGE);
    }

    #[test]
    fn test_falsy_values_count_as_missing() {
        for value in [json!(""), json!(null), json!(0), json!(false)] {
            let result = validate_product_payload(&json!({
                "name": "Kettle",
                "description": "Electric kettle",
                "price": value,
                "category": "kitchen"
            }));
            assert_eq!(message(result), MISSING_FIELDS_MESSAGE);
        }
    }

    #[test]
    fn test_missing_check_runs_before_price_check() {
        let result = validate_product_payload(&json!({ "price": -5 }));
        assert_eq!(message(result), MISSING_FIELDS_MESSAGE);
    }

    #[test]
    fn test_non_positive_or_non_numeric_price() {
        for value in [json!(-5), json!("100"), json!(true)] {
            let result = validate_product_payload(&json!({
                "name": "Kettle",
                "description": "Electric kettle",
                "price": value,
                "category": "kitchen"
            }));
            assert_eq!(message(result), INVALID_PRICE_MESSAGE);
        }
    }

    #[test]
    fn test_non_string_name() {
        let result = validate_product_payload(&json!({
            "name": 7,
            "description": "Electric kettle",
            "price": 30,
            "category": "kitchen"
        }));
        assert_eq!(message(result), NON_STRING_FIELDS_MESSAGE);
    }

    #[test]
    fn test_in_stock_must_be_boolean() {
        let result = validate_product_payload(&json!({
            "name": "Kettle",
            "description": "Electric kettle",
            "price": 30,
            "category": "kitchen",
            "inStock": "yes"
        }));
        assert_eq!(message(result), INVALID_IN_STOCK_MESSAGE);
    }

    #[test]
    fn test_non_object_payload() {
        let result = validate_product_payload(&json!([1, 2, 3]));
        assert_eq!(message(result), MISSING_FIELDS_MESSAGE);
    }
}
