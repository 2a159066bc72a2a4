//! 产品业务服务

use std::{collections::HashMap, sync::Arc};

use tracing::info;

use super::{
    model::{Product, ProductDraft},
    store::{ProductStore, StoreError},
};
use crate::core::{error::CoreError, response::PageResponse};

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 10;

/// 列表查询参数
///
/// 所有值都是原始字符串，非法的 page/limit 静默回退到默认值。
#[derive(Debug, Default, Clone)]
pub struct ListParams {
    pub category: Option<String>,
    pub search: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl From<HashMap<String, String>> for ListParams {
    fn from(mut query: HashMap<String, String>) -> Self {
        Self {
            category: query.remove("category"),
            search: query.remove("search"),
            page: query.remove("page"),
            limit: query.remove("limit"),
        }
    }
}

/// 按整数前缀解析：跳过前导空白，可带符号，取开头的数字
///
/// `"2abc"` 得到 2，`"1.5"` 得到 1；无数字、零或负数回退到 `default`。
pub fn parse_positive(raw: Option<&str>, default: usize) -> usize {
    let Some(raw) = raw else {
        return default;
    };

    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if negative || digits_len == 0 {
        return default;
    }

    let digits = &rest[..digits_len];
    match digits.parse::<usize>() {
        Ok(0) => default,
        Ok(n) => n,
        // 位数超出 usize 视为极大值
        Err(_) => usize::MAX,
    }
}

/// 分类精确匹配（忽略大小写）→ 关键字搜索 → 分页
pub fn query_products(products: Vec<Product>, params: &ListParams) -> PageResponse<Product> {
    let category = params
        .category
        .as_deref()
        .filter(|c| !c.is_empty())
        .map(str::to_lowercase);
    let search = params
        .search
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let filtered: Vec<Product> = products
        .into_iter()
        .filter(|p| {
            category
                .as_ref()
                .map_or(true, |c| p.category.to_lowercase() == *c)
        })
        .filter(|p| {
            search.as_ref().map_or(true, |term| {
                p.name.to_lowercase().contains(term.as_str())
                    || p.description.to_lowercase().contains(term.as_str())
            })
        })
        .collect();

    let page = parse_positive(params.page.as_deref(), DEFAULT_PAGE);
    let limit = parse_positive(params.limit.as_deref(), DEFAULT_LIMIT);
    let total = filtered.len();
    let start = (page - 1).saturating_mul(limit);

    let data = filtered.into_iter().skip(start).take(limit).collect();

    PageResponse::new(total, page, limit, data)
}

#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn ProductStore>,
}

impl ProductService {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }

    pub fn list_products(&self, params: &ListParams) -> Result<PageResponse<Product>, CoreError> {
        let products = self.store.list()?;
        Ok(query_products(products, params))
    }

    pub fn get_product(&self, id: &str) -> Result<Product, CoreError> {
        self.store
            .find_by_id(id)?
            .ok_or_else(|| CoreError::NotFound(format!("Product with ID {} not found.", id)))
    }

    pub fn create_product(&self, draft: ProductDraft) -> Result<Product, CoreError> {
        let product = draft.into_product();
        self.store.insert(product.clone())?;
        info!("创建产品 {} ({})", product.id, product.name);
        Ok(product)
    }

    pub fn update_product(&self, id: &str, draft: ProductDraft) -> Result<Product, CoreError> {
        self.store.replace(id, draft).map_err(|err| match err {
            StoreError::NotFound { id } => CoreError::NotFound(format!(
                "Product with ID {} not found and cannot be updated.",
                id
            )),
            other => other.into(),
        })
    }

    pub fn delete_product(&self, id: &str) -> Result<(), CoreError> {
        self.store.remove(id).map_err(|err| match err {
            StoreError::NotFound { id } => CoreError::NotFound(format!(
                "Product with ID {} not found and cannot be deleted.",
                id
            )),
            other => other.into(),
        })?;
        info!("删除产品 {}", id);
        Ok(())
    }

    pub fn product_count(&self) -> Result<usize, CoreError> {
        Ok(self.store.count()?)
    }
}
